use std::io;
use tracing::Level;
use tracing_subscriber::{filter, fmt, prelude::*, EnvFilter};

/// Installs the global subscriber used by the binaries.
///
/// Info and below go to stdout, filtered by `RUST_LOG` (default `info`).
/// Warnings and errors go to stderr only, so they stay visible when stdout is piped.
pub fn start_precision_tracing_subscriber() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stdout_layer = fmt::layer()
        .with_filter(env_filter)
        .with_filter(filter::filter_fn(|metadata| *metadata.level() > Level::WARN));

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter::LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(stderr_layer)
        .init()
}
