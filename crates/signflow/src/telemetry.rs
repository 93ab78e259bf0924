//! Logging setup for hosts embedding the crate.

use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("A global tracing subscriber is already installed")]
    SubscriberAlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("A global logger is already installed: {0}")]
    LoggerAlreadySet(#[from] log::SetLoggerError),
}

/// Builds the subscriber: `RUST_LOG` wins over `default_filter`.
fn subscriber(default_filter: &str, json: bool) -> impl tracing::Subscriber + Send + Sync {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    Registry::default()
        .with(filter)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
}

/// Installs the global subscriber and routes `log` records into it.
///
/// Call once at host start-up. A second call fails instead of replacing the
/// existing setup.
pub fn init_logging(default_filter: &str, json: bool) -> Result<(), TelemetryError> {
    tracing::subscriber::set_global_default(subscriber(default_filter, json))?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let _ = init_logging("info", true);
        assert!(init_logging("info", true).is_err());
    }
}
