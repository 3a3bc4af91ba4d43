use tracing::Level;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// INFO records are progress meant for the user and go to stdout without
/// decoration; every other level goes to stderr prefixed with its level.
pub fn init_logging(debug: bool) {
    // Allow RUST_LOG overrides, fall back to flag-controlled level
    let default_level = if debug { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let progress = fmt::layer()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_level(false)
        .with_filter(filter_fn(|meta| *meta.level() == Level::INFO));

    let diagnostics = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_filter(filter_fn(|meta| *meta.level() != Level::INFO));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(progress)
        .with(diagnostics)
        .init();
}
