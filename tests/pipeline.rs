use std::collections::HashSet;

use delivery_router::export::{to_json, write_outputs, JSON_FILE};
use delivery_router::io::{load_points, random_points};
use delivery_router::routing::GridGraph;
use delivery_router::{run_pipeline, PipelineConfig, RoutingError, Stop};
use rand::rngs::StdRng;
use rand::SeedableRng;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/orders_sample.csv");

#[test]
fn sample_orders_are_planned_end_to_end() {
    let points = load_points(SAMPLE).unwrap();
    assert_eq!(points.len(), 30);

    let config = PipelineConfig {
        seed: 2024,
        ..PipelineConfig::default()
    };
    let plan = run_pipeline(&points, &config).unwrap();
    assert_eq!(plan.k, 3);

    let graph = GridGraph::new(config.width, config.height).unwrap();
    let mut seen = HashSet::new();
    for record in plan.clusters.values() {
        assert_eq!(record.route_points[0], Stop::Depot(config.depot));
        for id in record.stop_order() {
            assert!(seen.insert(id), "order {} routed twice", id);
        }
        for (i, pair) in record.path_nodes.windows(2).enumerate() {
            assert!(graph.is_adjacent(pair[0], pair[1]) || record.fallback_jumps.contains(&i));
        }
    }
    assert_eq!(seen.len(), points.len());
}

#[test]
fn fixed_seed_runs_export_identical_documents() {
    let mut rng = StdRng::seed_from_u64(77);
    let points = random_points(40, 41, 41, 1.0, &mut rng);
    let config = PipelineConfig {
        k: Some(4),
        seed: 5,
        ..PipelineConfig::default()
    };

    let first = to_json(&run_pipeline(&points, &config).unwrap());
    let second = to_json(&run_pipeline(&points, &config).unwrap());
    assert_eq!(first, second);
}

#[test]
fn reports_are_written_for_a_run() {
    let points = load_points(SAMPLE).unwrap();
    let config = PipelineConfig::default();
    let plan = run_pipeline(&points, &config).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    write_outputs(&plan, &points, &config, tmp.path()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(tmp.path().join(JSON_FILE)).unwrap()).unwrap();
    assert_eq!(json["k"], plan.k);
    let sizes: u64 = json["clusters"]
        .as_object()
        .unwrap()
        .values()
        .map(|cluster| cluster["size"].as_u64().unwrap())
        .sum();
    assert_eq!(sizes, points.len() as u64);
}

#[test]
fn configuration_errors_name_the_constraint() {
    let points = load_points(SAMPLE).unwrap();
    let config = PipelineConfig {
        k: Some(31),
        ..PipelineConfig::default()
    };
    let err = run_pipeline(&points, &config).unwrap_err();
    assert!(matches!(err, RoutingError::TooManyClusters { .. }));
    assert!(err.to_string().starts_with("k exceeds point count"));
}
