pub mod astar;
pub mod grid;
mod planner;
pub mod route_builder;
mod types;

pub use astar::find_path;
pub use grid::{GridGraph, GridNode};
pub use planner::{run_pipeline, DeliveryPlanner};
pub use route_builder::{build_route, stitch_path, StitchedPath};
pub use types::{PipelineConfig, RoutePlan, RouteRecord};
