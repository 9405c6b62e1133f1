use tracing::warn;

use crate::geometry::{Coord, DeliveryPoint, PointLike, Stop};

use super::astar::find_path;
use super::grid::{GridGraph, GridNode};

/// Lattice walk through a tour's stops.
///
/// `fallback_jumps` holds every index `i` where `nodes[i] -> nodes[i + 1]` is a
/// direct jump between two stops that the search could not connect.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StitchedPath {
    pub nodes: Vec<GridNode>,
    pub fallback_jumps: Vec<usize>,
}

impl StitchedPath {
    fn append(&mut self, segment: &[GridNode]) {
        let skip = match (self.nodes.last(), segment.first()) {
            (Some(last), Some(first)) if last == first => 1,
            _ => 0,
        };
        self.nodes.extend_from_slice(&segment[skip..]);
    }
}

/// Greedy nearest-neighbour tour starting at `depot`.
///
/// From the current end of the tour, the closest unvisited point is appended
/// next; among equally close points the one listed first wins. This is a fast
/// approximation and does not minimise the tour length.
pub fn build_route<'a, I>(depot: Coord, cluster_points: I) -> Vec<Stop>
where
    I: IntoIterator<Item = &'a DeliveryPoint>,
{
    let mut remaining: Vec<&DeliveryPoint> = cluster_points.into_iter().collect();
    let mut route = Vec::with_capacity(remaining.len() + 1);
    route.push(Stop::Depot(depot));
    let mut current = depot;

    while !remaining.is_empty() {
        let mut nearest = 0;
        let mut nearest_distance = f64::INFINITY;
        for (index, point) in remaining.iter().enumerate() {
            let distance = current.distance(*point);
            if distance < nearest_distance {
                nearest = index;
                nearest_distance = distance;
            }
        }
        let next = remaining.remove(nearest);
        current = next.as_coord();
        route.push(Stop::Delivery(next.clone()));
    }

    route
}

/// Connects consecutive stops of `route` with shortest lattice paths.
///
/// Stops are snapped to their nearest cell. When two stops cannot be
/// connected, the two-node jump `[from, to]` is used instead and recorded.
pub fn stitch_path<P: PointLike>(route: &[P], cell_size: f64, graph: &GridGraph) -> StitchedPath {
    let mut stitched = StitchedPath::default();

    for leg in route.windows(2) {
        let from = graph.snap(&leg[0], cell_size);
        let to = graph.snap(&leg[1], cell_size);
        match find_path(from, to, graph) {
            Some(segment) => stitched.append(&segment),
            None => {
                warn!(?from, ?to, "no lattice path between stops, using direct jump");
                stitched.append(&[from]);
                stitched.fallback_jumps.push(stitched.nodes.len() - 1);
                stitched.nodes.push(to);
            }
        }
    }

    if stitched.nodes.is_empty() {
        if let Some(only) = route.first() {
            stitched.nodes.push(graph.snap(only, cell_size));
        }
    }

    stitched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster(coords: &[(f64, f64)]) -> Vec<DeliveryPoint> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| DeliveryPoint::new(i as i64 + 1, x, y))
            .collect()
    }

    fn is_continuous_except_jumps(stitched: &StitchedPath, graph: &GridGraph) -> bool {
        stitched
            .nodes
            .windows(2)
            .enumerate()
            .all(|(i, pair)| graph.is_adjacent(pair[0], pair[1]) || stitched.fallback_jumps.contains(&i))
    }

    #[test]
    fn nearest_point_is_visited_first() {
        let points = cluster(&[(5.0, 5.0), (1.0, 1.0), (9.0, 9.0)]);
        let route = build_route(Coord::new(0.0, 0.0), &points);

        assert_eq!(route.len(), 4);
        assert_eq!(route[0], Stop::Depot(Coord::new(0.0, 0.0)));
        assert_eq!(route[1].as_coord(), Coord::new(1.0, 1.0));
        assert_eq!(route[2].as_coord(), Coord::new(5.0, 5.0));
        assert_eq!(route[3].as_coord(), Coord::new(9.0, 9.0));
    }

    #[test]
    fn route_visits_every_point_once() {
        let points = cluster(&[(3.0, 9.0), (8.0, 1.0), (2.0, 2.0), (7.0, 7.0), (0.5, 6.0)]);
        let route = build_route(Coord::new(4.0, 4.0), &points);

        assert!(route[0].is_depot());
        assert_eq!(route.iter().filter(|stop| stop.is_depot()).count(), 1);
        let mut ids: Vec<i64> = route.iter().filter_map(Stop::delivery_id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn ties_keep_input_order() {
        let points = cluster(&[(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0)]);
        let route = build_route(Coord::new(0.0, 0.0), &points);
        assert_eq!(route[1].delivery_id(), Some(1));
    }

    #[test]
    fn empty_cluster_yields_depot_only() {
        let none: Vec<DeliveryPoint> = Vec::new();
        let route = build_route(Coord::new(2.0, 3.0), &none);
        assert_eq!(route, vec![Stop::Depot(Coord::new(2.0, 3.0))]);
    }

    #[test]
    fn stitched_path_is_continuous_without_duplicate_boundaries() {
        let graph = GridGraph::new(41, 41).unwrap();
        let points = cluster(&[(25.0, 20.0), (25.0, 26.0), (18.2, 25.7)]);
        let route = build_route(Coord::new(20.0, 20.0), &points);
        let stitched = stitch_path(&route, 1.0, &graph);

        assert!(stitched.fallback_jumps.is_empty());
        assert_eq!(stitched.nodes.first(), Some(&GridNode(20, 20)));
        assert_eq!(stitched.nodes.last(), Some(&GridNode(18, 26)));
        assert!(is_continuous_except_jumps(&stitched, &graph));
        // 5 + 6 + 7 lattice steps.
        assert_eq!(stitched.nodes.len(), 19);
    }

    #[test]
    fn stops_on_the_same_cell_collapse() {
        let graph = GridGraph::new(10, 10).unwrap();
        let route = vec![Coord::new(2.0, 2.0), Coord::new(2.2, 1.9), Coord::new(4.0, 2.0)];
        let stitched = stitch_path(&route, 1.0, &graph);
        assert_eq!(stitched.nodes, vec![GridNode(2, 2), GridNode(3, 2), GridNode(4, 2)]);
    }

    #[test]
    fn unreachable_stop_falls_back_to_direct_jump() {
        // Column 0 is cut off from the rest of a 4x4 lattice.
        let full = GridGraph::new(4, 4).unwrap();
        let edges: Vec<(GridNode, GridNode)> = full
            .nodes()
            .flat_map(|a| full.neighbors(a).map(move |b| (a, b)))
            .filter(|(a, b)| (a.0 == 0) == (b.0 == 0))
            .collect();
        let graph = GridGraph::from_edges(4, 4, edges).unwrap();

        let route = vec![Coord::new(0.0, 0.0), Coord::new(3.0, 0.0), Coord::new(3.0, 2.0)];
        let stitched = stitch_path(&route, 1.0, &graph);

        assert_eq!(stitched.fallback_jumps, vec![0]);
        assert_eq!(
            stitched.nodes,
            vec![GridNode(0, 0), GridNode(3, 0), GridNode(3, 1), GridNode(3, 2)]
        );
        assert!(is_continuous_except_jumps(&stitched, &graph));
    }

    #[test]
    fn single_stop_route_is_its_own_cell() {
        let graph = GridGraph::new(41, 41).unwrap();
        let stitched = stitch_path(&[Coord::new(20.0, 20.0)], 1.0, &graph);
        assert_eq!(stitched.nodes, vec![GridNode(20, 20)]);
    }
}
