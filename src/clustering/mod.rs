pub mod kmeans;

pub use kmeans::{cluster, Clustering, DEFAULT_MAX_ITERATIONS};
