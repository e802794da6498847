//! Logging bootstrap.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a console subscriber.
///
/// `RUST_LOG` wins over `default_level`; an invalid filter falls back to
/// `info`.
pub fn init(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()?;
    tracing::debug!(default_level, "telemetry initialized");
    Ok(())
}
