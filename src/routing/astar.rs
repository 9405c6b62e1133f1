use std::cmp::{Ordering, Reverse};

use hashbrown::HashMap;
use priority_queue::PriorityQueue;
use tracing::trace;

use crate::geometry::PointLike;

use super::grid::{GridGraph, GridNode};

/// Total order over finite scores so they can key the open set.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Score(f64);

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Shortest lattice path from `start` to `goal`, both endpoints included.
///
/// Every edge costs 1 and the heuristic is the Euclidean distance to `goal`,
/// which never overestimates on a 4-connected lattice, so the returned path
/// has minimal length. `None` means `goal` cannot be reached from `start`
/// (or either endpoint is not part of the graph).
pub fn find_path(start: GridNode, goal: GridNode, graph: &GridGraph) -> Option<Vec<GridNode>> {
    if !graph.contains(start) || !graph.contains(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let heuristic = |node: GridNode| -> f64 { node.distance(&goal) };

    let mut open_set: PriorityQueue<GridNode, Reverse<Score>> = PriorityQueue::new();
    let mut came_from: HashMap<GridNode, GridNode> = HashMap::new();
    let mut g_score: HashMap<GridNode, u32> = HashMap::new();

    g_score.insert(start, 0);
    open_set.push(start, Reverse(Score(heuristic(start))));

    let mut expanded = 0usize;

    while let Some((current, _)) = open_set.pop() {
        if current == goal {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(prev) = came_from.get(&cursor).copied() {
                cursor = prev;
                path.push(cursor);
            }
            path.reverse();
            trace!(expanded, length = path.len(), "path found");
            return Some(path);
        }
        expanded += 1;

        let current_g = g_score[&current];
        for neighbor in graph.neighbors(current) {
            let tentative_g = current_g + 1;
            if tentative_g >= g_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                continue;
            }

            came_from.insert(neighbor, current);
            g_score.insert(neighbor, tentative_g);
            let f_score = tentative_g as f64 + heuristic(neighbor);
            // Updates the priority when the neighbour is already queued.
            open_set.push(neighbor, Reverse(Score(f_score)));
        }
    }

    trace!(expanded, ?start, ?goal, "open set exhausted");
    None
}
