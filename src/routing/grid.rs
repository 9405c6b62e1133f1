use petgraph::graphmap::UnGraphMap;
use serde::{Serialize, Serializer};

use crate::error::RoutingError;
use crate::geometry::{Coord, PointLike};

/// Integer lattice cell `(i, j)`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default, Debug)]
pub struct GridNode(pub u32, pub u32);

impl GridNode {
    pub fn manhattan(&self, other: &GridNode) -> u32 {
        self.0.abs_diff(other.0) + self.1.abs_diff(other.1)
    }

    /// Continuous coordinate of the cell's centre.
    pub fn to_coord(&self, cell_size: f64) -> Coord {
        Coord::new(self.0 as f64 * cell_size, self.1 as f64 * cell_size)
    }
}

impl PointLike for GridNode {
    fn x(&self) -> f64 {
        self.0 as f64
    }

    fn y(&self) -> f64 {
        self.1 as f64
    }
}

// Exported as `[i, j]`.
impl Serialize for GridNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.0, self.1].serialize(serializer)
    }
}

/// Largest number of cells a lattice may hold.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Checks that a `width x height` lattice is non-empty and not larger than
/// [`MAX_GRID_CELLS`].
pub fn validate_extent(width: u32, height: u32) -> Result<usize, RoutingError> {
    if width == 0 || height == 0 {
        return Err(RoutingError::EmptyGrid { width, height });
    }
    let cells = width as usize * height as usize;
    if cells > MAX_GRID_CELLS {
        return Err(RoutingError::GridTooLarge { width, height });
    }
    Ok(cells)
}

/// A 4-connected lattice over `[0, width) x [0, height)`.
///
/// Every cell is a node. `GridGraph::new` connects all cardinal neighbours;
/// `GridGraph::from_edges` keeps only the listed connections, which is how
/// blocked or disconnected maps are modelled.
#[derive(Clone, Debug)]
pub struct GridGraph {
    width: u32,
    height: u32,
    graph: UnGraphMap<GridNode, ()>,
}

impl GridGraph {
    pub fn new(width: u32, height: u32) -> Result<Self, RoutingError> {
        let mut grid = Self::empty(width, height)?;
        for j in 0..height {
            for i in 0..width {
                let node = GridNode(i, j);
                if i + 1 < width {
                    grid.graph.add_edge(node, GridNode(i + 1, j), ());
                }
                if j + 1 < height {
                    grid.graph.add_edge(node, GridNode(i, j + 1), ());
                }
            }
        }
        Ok(grid)
    }

    pub fn from_edges<I>(width: u32, height: u32, edges: I) -> Result<Self, RoutingError>
    where
        I: IntoIterator<Item = (GridNode, GridNode)>,
    {
        let mut grid = Self::empty(width, height)?;
        for (a, b) in edges {
            if !grid.in_bounds(a) || !grid.in_bounds(b) {
                return Err(RoutingError::EdgeOutOfBounds((a.0, a.1), (b.0, b.1), width, height));
            }
            grid.graph.add_edge(a, b, ());
        }
        Ok(grid)
    }

    fn empty(width: u32, height: u32) -> Result<Self, RoutingError> {
        let cells = validate_extent(width, height)?;
        let mut graph = UnGraphMap::with_capacity(cells, 2 * cells);
        for j in 0..height {
            for i in 0..width {
                graph.add_node(GridNode(i, j));
            }
        }
        Ok(GridGraph { width, height, graph })
    }

    pub fn in_bounds(&self, node: GridNode) -> bool {
        node.0 < self.width && node.1 < self.height
    }

    pub fn contains(&self, node: GridNode) -> bool {
        self.graph.contains_node(node)
    }

    pub fn neighbors(&self, node: GridNode) -> impl Iterator<Item = GridNode> + '_ {
        self.graph.neighbors(node)
    }

    pub fn is_adjacent(&self, a: GridNode, b: GridNode) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn nodes(&self) -> impl Iterator<Item = GridNode> + '_ {
        self.graph.nodes()
    }

    /// Nearest cell to a continuous coordinate, `round(x / cell_size)` per
    /// axis, clamped into the grid.
    pub fn snap<P: PointLike + ?Sized>(&self, point: &P, cell_size: f64) -> GridNode {
        let snap_axis = |value: f64, len: u32| -> u32 {
            let cell = (value / cell_size).round();
            if cell.is_nan() || cell <= 0.0 {
                0
            } else {
                (cell as u64).min(len as u64 - 1) as u32
            }
        };
        GridNode(snap_axis(point.x(), self.width), snap_axis(point.y(), self.height))
    }
}
