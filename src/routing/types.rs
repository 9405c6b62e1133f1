use indexmap::IndexMap;
use serde::Deserialize;

use crate::clustering::DEFAULT_MAX_ITERATIONS;
use crate::error::RoutingError;
use crate::geometry::{Coord, PointLike, Stop};

use super::grid::{validate_extent, GridNode};

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_depot() -> Coord {
    Coord::new(20.0, 20.0)
}

fn default_cell_size() -> f64 {
    1.0
}

fn default_grid_extent() -> u32 {
    41
}

/// Parameters of a planning run. Every field has a default, so `{}` is a
/// valid JSON configuration.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Number of vehicles. `None` picks `max(1, points / 10)`.
    #[serde(default)]
    pub k: Option<usize>,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_depot")]
    pub depot: Coord,
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
    #[serde(default = "default_grid_extent")]
    pub width: u32,
    #[serde(default = "default_grid_extent")]
    pub height: u32,
    #[serde(default)]
    pub seed: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            k: None,
            max_iterations: default_max_iterations(),
            depot: default_depot(),
            cell_size: default_cell_size(),
            width: default_grid_extent(),
            height: default_grid_extent(),
            seed: 0,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, RoutingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replaces `k` and `seed` with the values a caller supplied, keeping the
    /// configured ones where none was given.
    pub fn with_overrides(mut self, k: Option<usize>, seed: Option<u64>) -> Self {
        if k.is_some() {
            self.k = k;
        }
        if let Some(seed) = seed {
            self.seed = seed;
        }
        self
    }

    /// Cluster count for `num_points` deliveries.
    pub fn resolve_k(&self, num_points: usize) -> usize {
        self.k.unwrap_or_else(|| (num_points / 10).max(1))
    }

    /// Rejects settings no run could succeed with. `k` is checked against the
    /// point count separately, once the points are known.
    pub fn validate(&self) -> Result<(), RoutingError> {
        validate_extent(self.width, self.height)?;
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(RoutingError::InvalidCellSize(self.cell_size));
        }
        if !self.depot.is_finite() {
            return Err(RoutingError::InvalidDepot(self.depot.x, self.depot.y));
        }
        if self.max_iterations == 0 {
            return Err(RoutingError::ZeroIterations);
        }
        if self.k == Some(0) {
            return Err(RoutingError::ZeroClusters);
        }
        Ok(())
    }
}

/// One vehicle's tour: the visiting order and the lattice walk through it.
#[derive(Clone, PartialEq, Debug)]
pub struct RouteRecord {
    pub route_points: Vec<Stop>,
    pub path_nodes: Vec<GridNode>,
    pub fallback_jumps: Vec<usize>,
    pub cluster_size: usize,
}

impl RouteRecord {
    /// Delivery ids in visiting order.
    pub fn stop_order(&self) -> Vec<i64> {
        self.route_points.iter().filter_map(Stop::delivery_id).collect()
    }

    pub fn demand(&self) -> u64 {
        self.route_points
            .iter()
            .map(|stop| match stop {
                Stop::Depot(_) => 0,
                Stop::Delivery(point) => point.demand as u64,
            })
            .sum()
    }

    /// Euclidean length of the tour through its stops.
    pub fn tour_length(&self) -> f64 {
        self.route_points.windows(2).map(|leg| leg[0].distance(&leg[1])).sum()
    }

    /// Number of lattice moves, counting each fallback jump as one.
    pub fn path_steps(&self) -> usize {
        self.path_nodes.len().saturating_sub(1)
    }
}

/// Result of a planning run, keyed by cluster id in ascending order.
/// Clusters left without members have no record.
#[derive(Clone, PartialEq, Debug)]
pub struct RoutePlan {
    pub k: usize,
    pub labels: Vec<usize>,
    pub centroids: Vec<Coord>,
    pub clusters: IndexMap<usize, RouteRecord>,
}

impl RoutePlan {
    pub fn total_fallback_jumps(&self) -> usize {
        self.clusters.values().map(|record| record.fallback_jumps.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DeliveryPoint;

    #[test]
    fn empty_json_uses_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.width, 41);
        assert_eq!(config.depot, Coord::new(20.0, 20.0));
    }

    #[test]
    fn json_overrides_fields() {
        let config = PipelineConfig::from_json(r#"{"k": 3, "depot": {"x": 5.0, "y": 6.0}, "seed": 9}"#).unwrap();
        assert_eq!(config.k, Some(3));
        assert_eq!(config.depot, Coord::new(5.0, 6.0));
        assert_eq!(config.seed, 9);
        assert_eq!(config.max_iterations, 100);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(PipelineConfig::from_json(r#"{"vehicles": 3}"#), Err(RoutingError::Json(_))));
    }

    #[test]
    fn overrides_apply_only_when_given() {
        let config = PipelineConfig::from_json(r#"{"k": 3, "seed": 9}"#).unwrap();

        let kept = config.clone().with_overrides(None, None);
        assert_eq!(kept.k, Some(3));
        assert_eq!(kept.seed, 9);

        let replaced = config.with_overrides(Some(5), Some(0));
        assert_eq!(replaced.k, Some(5));
        assert_eq!(replaced.seed, 0);
    }

    #[test]
    fn default_k_scales_with_points() {
        let config = PipelineConfig::default();
        assert_eq!(config.resolve_k(0), 1);
        assert_eq!(config.resolve_k(9), 1);
        assert_eq!(config.resolve_k(20), 2);
        assert_eq!(config.resolve_k(35), 3);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut config = PipelineConfig {
            cell_size: 0.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(config.validate(), Err(RoutingError::InvalidCellSize(_))));
        config.cell_size = 1.0;
        config.width = 0;
        assert!(matches!(config.validate(), Err(RoutingError::EmptyGrid { .. })));
        config.width = 70_000;
        config.height = 70_000;
        assert!(matches!(config.validate(), Err(RoutingError::GridTooLarge { .. })));
        config.width = 41;
        config.height = 41;
        config.k = Some(0);
        assert!(matches!(config.validate(), Err(RoutingError::ZeroClusters)));
        config.k = None;
        config.depot = Coord::new(f64::NAN, 1.0);
        assert!(matches!(config.validate(), Err(RoutingError::InvalidDepot(..))));
    }

    #[test]
    fn record_summaries() {
        let record = RouteRecord {
            route_points: vec![
                Stop::Depot(Coord::new(0.0, 0.0)),
                Stop::Delivery(DeliveryPoint::new(4, 3.0, 4.0).with_demand(2)),
                Stop::Delivery(DeliveryPoint::new(2, 3.0, 0.0)),
            ],
            path_nodes: vec![GridNode(0, 0), GridNode(1, 0)],
            fallback_jumps: vec![],
            cluster_size: 2,
        };
        assert_eq!(record.stop_order(), vec![4, 2]);
        assert_eq!(record.demand(), 3);
        assert_eq!(record.tour_length(), 9.0);
        assert_eq!(record.path_steps(), 1);
    }
}
