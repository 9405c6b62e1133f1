use thiserror::Error;

/// Errors surfaced by the routing pipeline and its collaborators.
///
/// Configuration errors abort a run before any clustering happens. An
/// unreachable grid node is not an error: stitching falls back to a direct jump.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("k must be a positive integer")]
    ZeroClusters,

    #[error("k exceeds point count (k = {k}, points = {points})")]
    TooManyClusters { k: usize, points: usize },

    #[error("max_iterations must be positive")]
    ZeroIterations,

    #[error("grid must be at least 1x1, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },

    #[error("grid of {width}x{height} cells exceeds the supported size")]
    GridTooLarge { width: u32, height: u32 },

    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f64),

    #[error("depot coordinate must be finite, got ({0}, {1})")]
    InvalidDepot(f64, f64),

    #[error("grid edge ({0:?}, {1:?}) leaves the {2}x{3} grid")]
    EdgeOutOfBounds((u32, u32), (u32, u32), u32, u32),

    #[error("failed to read delivery points: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to set up tracing: {0}")]
    Tracing(String),
}
