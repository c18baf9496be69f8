//! Module for telemetry functionality such as logging

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";

/// Output format of the log events, selected by the `LOG_FORMAT` env variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

/// Sets up logging. The log level is taken from the `RUST_LOG` env variable (default is `info`).
/// The logging format (pretty/compact/json) is set by the `LOG_FORMAT` env variable.
///
/// Logs go to stderr; stdout is reserved for the result tables.
pub fn setup_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);
    let fmt = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match LogFormat::from_env() {
        LogFormat::Json => registry.with(fmt.json()).try_init()?,
        LogFormat::Compact => registry.with(fmt.compact()).try_init()?,
        LogFormat::Pretty => registry.with(fmt.pretty()).try_init()?,
    }

    debug!("Debug mode is enabled. Provider requests and responses are logged.");
    Ok(())
}
