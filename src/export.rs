//! Serialized views of a [`RoutePlan`]: the JSON document consumed by
//! downstream tools, an HTML summary and an SVG diagram of the routes.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::info;

use crate::error::RoutingError;
use crate::geometry::{DeliveryPoint, PointLike};
use crate::routing::{PipelineConfig, RoutePlan};

pub const JSON_FILE: &str = "routes.json";
pub const HTML_FILE: &str = "routes_report.html";
pub const SVG_FILE: &str = "routes_diagram.svg";

const COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#9467bd", "#bcbd22", "#8c564b", "#e377c2", "#7f7f7f", "#17becf",
];

pub fn to_json(plan: &RoutePlan) -> serde_json::Value {
    let mut clusters = serde_json::Map::new();
    for (cluster_id, record) in &plan.clusters {
        let route_points: Vec<serde_json::Value> =
            record.route_points.iter().map(|stop| json!([stop.x(), stop.y()])).collect();
        clusters.insert(
            cluster_id.to_string(),
            json!({
                "size": record.cluster_size,
                "route_points": route_points,
                "path_nodes": record.path_nodes,
                "stop_order": record.stop_order(),
                "demand": record.demand(),
                "fallback_jumps": record.fallback_jumps,
            }),
        );
    }

    json!({
        "k": plan.k,
        "clusters": clusters,
    })
}

pub fn summary_html(plan: &RoutePlan) -> String {
    let mut html = String::new();
    html.push_str("<html><head><meta charset='utf-8'><title>Delivery routes</title></head><body>\n");
    html.push_str("<h1>Delivery routes</h1>\n");
    let _ = writeln!(html, "<p>Clusters (vehicles): {}</p>", plan.k);
    let _ = writeln!(html, "<img src='{}' alt='route diagram' style='max-width:100%;height:auto' />", SVG_FILE);
    html.push_str("<h2>Per vehicle</h2>\n<ul>\n");
    for (cluster_id, record) in &plan.clusters {
        let order: Vec<String> = record.stop_order().iter().map(i64::to_string).collect();
        let _ = write!(
            html,
            "<li>Vehicle {}: deliveries = {}, demand = {}, path nodes = {}, order = {}",
            cluster_id,
            record.cluster_size,
            record.demand(),
            record.path_nodes.len(),
            order.join(" &rarr; ")
        );
        if !record.fallback_jumps.is_empty() {
            let _ = write!(html, " ({} unconnected legs)", record.fallback_jumps.len());
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul></body></html>\n");
    html
}

/// Routes, deliveries, centroids and the depot drawn in grid units.
pub fn diagram_svg(plan: &RoutePlan, points: &[DeliveryPoint], config: &PipelineConfig) -> String {
    const SCALE: f64 = 15.0;
    const MARGIN: f64 = 20.0;

    let world_w = (config.width.saturating_sub(1)) as f64 * config.cell_size;
    let world_h = (config.height.saturating_sub(1)) as f64 * config.cell_size;
    let to_px = |x: f64, y: f64| -> (f64, f64) {
        // SVG y grows downwards.
        (MARGIN + x / config.cell_size * SCALE, MARGIN + (world_h - y) / config.cell_size * SCALE)
    };
    let width_px = 2.0 * MARGIN + world_w / config.cell_size * SCALE;
    let height_px = 2.0 * MARGIN + world_h / config.cell_size * SCALE;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}'>",
        width_px, height_px, width_px, height_px
    );
    let _ = writeln!(svg, "<rect width='100%' height='100%' fill='white'/>");

    for (cluster_id, record) in &plan.clusters {
        let color = COLORS[cluster_id % COLORS.len()];
        let mut line = String::new();
        for node in &record.path_nodes {
            let centre = node.to_coord(config.cell_size);
            let (x, y) = to_px(centre.x, centre.y);
            let _ = write!(line, "{:.1},{:.1} ", x, y);
        }
        let _ = writeln!(
            svg,
            "<polyline points='{}' fill='none' stroke='{}' stroke-width='2' opacity='0.7'><title>Vehicle {} ({} deliveries)</title></polyline>",
            line.trim_end(),
            color,
            cluster_id,
            record.cluster_size
        );
    }

    for point in points {
        let (x, y) = to_px(point.x, point.y);
        let _ = writeln!(
            svg,
            "<circle cx='{:.1}' cy='{:.1}' r='3' fill='black'><title>Order {}</title></circle>",
            x, y, point.id
        );
    }

    for centroid in &plan.centroids {
        let (x, y) = to_px(centroid.x, centroid.y);
        let _ = writeln!(
            svg,
            "<path d='M{:.1},{:.1} l8,8 m0,-8 l-8,8' stroke='red' stroke-width='2'/>",
            x - 4.0,
            y - 4.0
        );
    }

    let (x, y) = to_px(config.depot.x, config.depot.y);
    let _ = writeln!(
        svg,
        "<rect x='{:.1}' y='{:.1}' width='10' height='10' fill='green'><title>Depot</title></rect>",
        x - 5.0,
        y - 5.0
    );
    svg.push_str("</svg>\n");
    svg
}

/// Writes the JSON document, HTML report and SVG diagram into `dir`,
/// creating it when missing. Returns the written paths.
pub fn write_outputs<P: AsRef<Path>>(
    plan: &RoutePlan,
    points: &[DeliveryPoint],
    config: &PipelineConfig,
    dir: P,
) -> Result<Vec<PathBuf>, RoutingError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let json_path = dir.join(JSON_FILE);
    fs::write(&json_path, serde_json::to_string_pretty(&to_json(plan))?)?;

    let html_path = dir.join(HTML_FILE);
    fs::write(&html_path, summary_html(plan))?;

    let svg_path = dir.join(SVG_FILE);
    fs::write(&svg_path, diagram_svg(plan, points, config))?;

    info!(dir = %dir.display(), "wrote route outputs");
    Ok(vec![json_path, html_path, svg_path])
}
