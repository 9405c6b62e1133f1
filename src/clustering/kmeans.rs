use rand::seq::index;
use rand::Rng;
use tracing::debug;

use crate::error::RoutingError;
use crate::geometry::{Coord, PointLike};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Outcome of a clustering run. `labels[i]` is the cluster of the i-th input point.
#[derive(Clone, Debug, PartialEq)]
pub struct Clustering {
    pub labels: Vec<usize>,
    pub centroids: Vec<Coord>,
    pub iterations: usize,
    pub converged: bool,
}

impl Clustering {
    pub fn k(&self) -> usize {
        self.centroids.len()
    }

    /// Splits `points` into one member list per cluster, keeping input order.
    pub fn group<'a, P>(&self, points: &'a [P]) -> Vec<Vec<&'a P>> {
        let mut groups: Vec<Vec<&P>> = vec![Vec::new(); self.k()];
        for (point, &label) in points.iter().zip(self.labels.iter()) {
            groups[label].push(point);
        }
        groups
    }
}

/// Checks that `k` clusters can be seeded from `num_points` distinct points.
pub fn validate_k(k: usize, num_points: usize) -> Result<(), RoutingError> {
    if k == 0 {
        return Err(RoutingError::ZeroClusters);
    }
    if k > num_points {
        return Err(RoutingError::TooManyClusters { k, points: num_points });
    }
    Ok(())
}

fn nearest_centroid(point: Coord, centroids: &[Coord]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = point.distance(centroid);
        // Strict comparison keeps the lowest index on ties.
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Lloyd-style k-means over planar points.
///
/// Initial centroids are `k` distinct input points drawn from `rng`. Each pass
/// assigns every point to its nearest centroid and then moves every non-empty
/// cluster's centroid to the mean of its members. A cluster that loses all of
/// its members keeps its previous centroid. The run stops when a pass changes
/// no label or after `max_iterations` passes.
pub fn cluster<P, R>(points: &[P], k: usize, max_iterations: usize, rng: &mut R) -> Result<Clustering, RoutingError>
where
    P: PointLike,
    R: Rng + ?Sized,
{
    validate_k(k, points.len())?;
    if max_iterations == 0 {
        return Err(RoutingError::ZeroIterations);
    }

    let coords: Vec<Coord> = points.iter().map(|p| p.as_coord()).collect();
    let mut centroids: Vec<Coord> = index::sample(rng, coords.len(), k)
        .iter()
        .map(|i| coords[i])
        .collect();
    let mut labels: Vec<Option<usize>> = vec![None; coords.len()];

    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        iterations += 1;

        let mut changed = 0usize;
        for (label, coord) in labels.iter_mut().zip(coords.iter()) {
            let best = nearest_centroid(*coord, &centroids);
            if *label != Some(best) {
                *label = Some(best);
                changed += 1;
            }
        }

        for (cluster_id, centroid) in centroids.iter_mut().enumerate() {
            let members = coords
                .iter()
                .zip(labels.iter())
                .filter(|(_, label)| **label == Some(cluster_id))
                .map(|(coord, _)| coord);
            // Empty clusters keep their previous centroid.
            if let Some(mean) = Coord::mean(members) {
                *centroid = mean;
            }
        }

        debug!(iteration = iterations, changed, "k-means pass");

        if changed == 0 {
            converged = true;
            break;
        }
    }

    Ok(Clustering {
        labels: labels.into_iter().map(|label| label.unwrap_or_default()).collect(),
        centroids,
        iterations,
        converged,
    })
}
