use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::error::RoutingError;
use crate::export::to_json;
use crate::geometry::DeliveryPoint;
use crate::routing::{run_pipeline, PipelineConfig};

impl From<RoutingError> for PyErr {
    fn from(err: RoutingError) -> PyErr {
        match err {
            RoutingError::Io(_) => PyIOError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Plans routes for `(id, x, y, demand)` tuples and returns the JSON document.
#[pyfunction]
#[pyo3(signature = (points, k=None, seed=None, config=None))]
fn route_deliveries(
    points: Vec<(i64, f64, f64, u32)>,
    k: Option<usize>,
    seed: Option<u64>,
    config: Option<String>,
) -> PyResult<String> {
    let config = match config {
        Some(json) => PipelineConfig::from_json(&json)?,
        None => PipelineConfig::default(),
    }
    .with_overrides(k, seed);

    let points: Vec<DeliveryPoint> = points
        .into_iter()
        .map(|(id, x, y, demand)| DeliveryPoint::new(id, x, y).with_demand(demand))
        .collect();
    let plan = run_pipeline(&points, &config)?;
    Ok(to_json(&plan).to_string())
}

// A module to wrap the Python functions
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(route_deliveries, m)?)?;
    Ok(())
}
