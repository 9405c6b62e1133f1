//! Loading delivery points from CSV and generating demo orders.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rand::Rng;
use tracing::info;

use crate::error::RoutingError;
use crate::geometry::DeliveryPoint;

/// Reads `id,x,y[,demand]` rows; a missing demand column or empty cell means 1.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<DeliveryPoint>, RoutingError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = vec![];

    for entry in reader.deserialize::<CsvPoint>() {
        points.push(entry?.into());
    }

    Ok(points)
}

pub fn load_points<P: AsRef<Path>>(path: P) -> Result<Vec<DeliveryPoint>, RoutingError> {
    let path = path.as_ref();
    let points = read_points(BufReader::new(File::open(path)?))?;
    info!(path = %path.display(), count = points.len(), "loaded delivery points");
    Ok(points)
}

#[derive(serde::Deserialize)]
struct CsvPoint {
    id: i64,
    x: f64,
    y: f64,
    #[serde(default)]
    demand: Option<u32>,
}

impl From<CsvPoint> for DeliveryPoint {
    fn from(row: CsvPoint) -> Self {
        DeliveryPoint::new(row.id, row.x, row.y).with_demand(row.demand.unwrap_or(1))
    }
}

/// `count` demo orders spread uniformly over a `width x height` grid of
/// `cell_size` cells, with ids `1..=count` and unit demand.
pub fn random_points<R>(count: usize, width: u32, height: u32, cell_size: f64, rng: &mut R) -> Vec<DeliveryPoint>
where
    R: Rng + ?Sized,
{
    let max_x = (width.saturating_sub(1)) as f64 * cell_size;
    let max_y = (height.saturating_sub(1)) as f64 * cell_size;
    (1..=count)
        .map(|id| {
            let x = if max_x > 0.0 { rng.gen_range(0.0..=max_x) } else { 0.0 };
            let y = if max_y > 0.0 { rng.gen_range(0.0..=max_y) } else { 0.0 };
            DeliveryPoint::new(id as i64, x, y)
        })
        .collect()
}
