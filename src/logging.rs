// src/logging.rs

//! Logging setup for `termrun` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `TERMRUN_LOG` environment variable, any `EnvFilter` directive
//!    (e.g. "debug", "termrun::exec=trace")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that stdout stays free for `--dry-run` output.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable read when no `--log-level` is given.
pub const LOG_ENV: &str = "TERMRUN_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(cli_level, LOG_ENV))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))
}

/// Filter from an explicit level, else from `env_var`, else `info`.
pub fn build_filter(cli_level: Option<LogLevel>, env_var: &str) -> EnvFilter {
    match cli_level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => EnvFilter::try_from_env(env_var).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}
