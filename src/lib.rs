//! Delivery routing on a grid map: k-means partitioning of orders into
//! vehicles, greedy nearest-neighbour tours from a shared depot, and A*
//! lattice paths stitched between consecutive stops.

pub mod clustering;
pub mod error;
pub mod export;
pub mod geometry;
pub mod io;
mod lib_tracing;
#[cfg(feature = "py_bindings")]
mod python;
pub mod routing;

pub use error::RoutingError;
pub use geometry::{Coord, DeliveryPoint, PointLike, Stop};
pub use lib_tracing::LibTracer;
pub use routing::{run_pipeline, DeliveryPlanner, PipelineConfig, RoutePlan, RouteRecord};
