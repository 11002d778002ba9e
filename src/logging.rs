//! Tracing subscriber setup.

use std::sync::Once;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV_VAR: &str = "GENOME_VIEWER_LOG";
const DEFAULT_FILTER: &str = "genome_viewer=info";

static INIT: Once = Once::new();

/// Installs a stderr subscriber filtered by `GENOME_VIEWER_LOG`
/// (e.g. `GENOME_VIEWER_LOG=genome_viewer=debug`), falling back to
/// `genome_viewer=info`. Only the first call has an effect.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
