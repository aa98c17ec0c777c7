use tracing_subscriber::{EnvFilter, fmt};

use crate::foundation::error::{BoothError, BoothResult};

/// Build the log filter: `RUST_LOG` when set, else `default_level`, else `info`.
pub fn env_filter(default_level: &str) -> BoothResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| BoothError::config(format!("failed to create log filter: {err}")))
}

/// Install the global `tracing` subscriber, writing to stderr.
pub fn init_tracing(default_level: &str) -> BoothResult<()> {
    fmt()
        .with_env_filter(env_filter(default_level)?)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| BoothError::config(format!("tracing init error: {err}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
