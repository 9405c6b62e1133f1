use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_flame::{FlameLayer, FlushGuard};
use tracing_subscriber::{filter, prelude::*};

use crate::error::RoutingError;

/// Keeps the global subscriber's outputs alive; dropping it flushes the
/// flame graph samples.
pub struct LibTracer {
    _flame_guard: Option<FlushGuard<BufWriter<File>>>,
}

impl LibTracer {
    /// Installs a pretty stdout layer filtered at `INFO`, plus an unfiltered
    /// layer writing everything to `debug_log` and a `tracing-flame` layer
    /// writing folded stacks to `flame_log` when those paths are given.
    pub fn init(debug_log: Option<&Path>, flame_log: Option<&Path>) -> Result<Self, RoutingError> {
        let stdout_log = tracing_subscriber::fmt::layer()
            .pretty()
            // Add an `INFO` filter to the stdout logging layer
            .with_filter(filter::LevelFilter::INFO);

        // A layer that logs events to a file.
        let debug_log = match debug_log {
            Some(path) => {
                let file = File::create(path)?;
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Arc::new(file))
                        .with_filter(LevelFilter::TRACE),
                )
            }
            None => None,
        };

        let (flame_layer, flame_guard) = match flame_log {
            Some(path) => {
                let (layer, guard) = FlameLayer::with_file(path).map_err(|err| RoutingError::Tracing(err.to_string()))?;
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(stdout_log)
            .with(debug_log)
            .with(flame_layer)
            .try_init()
            .map_err(|err| RoutingError::Tracing(err.to_string()))?;

        Ok(Self {
            _flame_guard: flame_guard,
        })
    }
}
