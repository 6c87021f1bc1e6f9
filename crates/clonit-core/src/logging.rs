//! Tracing subscriber setup for binaries and tests embedding clonit

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::{Error, Result};

/// Install a global subscriber printing compact logs.
///
/// The level comes from `RUST_LOG`, defaulting to `info`. Fails if a
/// global subscriber is already set.
pub fn init() -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })
}
