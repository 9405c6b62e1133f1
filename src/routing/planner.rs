use indexmap::IndexMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, info_span};

use crate::clustering::kmeans::{cluster, validate_k};
use crate::error::RoutingError;
use crate::geometry::DeliveryPoint;

use super::grid::GridGraph;
use super::route_builder::{build_route, stitch_path};
use super::types::{PipelineConfig, RoutePlan, RouteRecord};

/// Assigns deliveries to vehicles and routes each vehicle over the grid.
#[derive(Clone, Debug, Default)]
pub struct DeliveryPlanner {
    pub config: PipelineConfig,
}

impl DeliveryPlanner {
    pub fn new(config: PipelineConfig) -> Self {
        DeliveryPlanner { config }
    }

    /// Plans with a random source seeded from `config.seed`.
    pub fn plan(&self, points: &[DeliveryPoint]) -> Result<RoutePlan, RoutingError> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.plan_with_rng(points, &mut rng)
    }

    pub fn plan_with_rng<R>(&self, points: &[DeliveryPoint], rng: &mut R) -> Result<RoutePlan, RoutingError>
    where
        R: Rng + ?Sized,
    {
        let config = &self.config;
        config.validate()?;
        let k = config.resolve_k(points.len());
        validate_k(k, points.len())?;

        let _span = info_span!("plan", points = points.len(), k).entered();

        let clustering = cluster(points, k, config.max_iterations, rng)?;
        info!(
            iterations = clustering.iterations,
            converged = clustering.converged,
            "clustered deliveries"
        );

        // One lattice per run, shared by every search.
        let graph = GridGraph::new(config.width, config.height)?;

        let mut clusters = IndexMap::new();
        for (cluster_id, members) in clustering.group(points).into_iter().enumerate() {
            if members.is_empty() {
                debug!(cluster_id, "cluster has no members, skipping");
                continue;
            }

            let route_points = build_route(config.depot, members.iter().copied());
            let stitched = stitch_path(&route_points, config.cell_size, &graph);
            debug!(
                cluster_id,
                stops = route_points.len(),
                path_nodes = stitched.nodes.len(),
                fallbacks = stitched.fallback_jumps.len(),
                "routed cluster"
            );

            clusters.insert(
                cluster_id,
                RouteRecord {
                    route_points,
                    path_nodes: stitched.nodes,
                    fallback_jumps: stitched.fallback_jumps,
                    cluster_size: members.len(),
                },
            );
        }

        let plan = RoutePlan {
            k,
            labels: clustering.labels,
            centroids: clustering.centroids,
            clusters,
        };
        info!(
            routes = plan.clusters.len(),
            fallbacks = plan.total_fallback_jumps(),
            "planning finished"
        );
        Ok(plan)
    }
}

/// Runs the whole pipeline: cluster, order each cluster, stitch lattice paths.
pub fn run_pipeline(points: &[DeliveryPoint], config: &PipelineConfig) -> Result<RoutePlan, RoutingError> {
    DeliveryPlanner::new(config.clone()).plan(points)
}
