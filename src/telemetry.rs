//! Structured logging bootstrap.

use crate::config::TelemetryConfig;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors returned while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// Directive that failed to parse.
        filter: String,
        /// Parser message.
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialised,
}

/// Builds the filter used by [`init_tracing`].
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] when the directive does not
/// parse.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.filter).map_err(|err| TelemetryError::InvalidFilter {
        filter: config.filter.clone(),
        reason: err.to_string(),
    })
}

/// Installs a global `fmt` subscriber filtered by `config.filter`.
///
/// Calling this twice is harmless: the second call reports
/// [`TelemetryError::AlreadyInitialised`] and leaves the first subscriber in
/// place.
///
/// # Errors
///
/// Returns [`TelemetryError`] when the filter is invalid or a subscriber is
/// already installed.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(true)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInitialised)
}

#[cfg(test)]
mod tests {
    use super::{TelemetryError, build_filter, init_tracing};
    use crate::config::TelemetryConfig;
    use rstest::rstest;

    #[rstest]
    #[case("info")]
    #[case("taskboard=debug,diesel=warn")]
    fn valid_filters_parse(#[case] filter: &str) {
        let config = TelemetryConfig {
            filter: filter.to_owned(),
            ansi: false,
        };
        assert!(build_filter(&config).is_ok());
    }

    #[rstest]
    fn invalid_filter_is_reported() {
        let config = TelemetryConfig {
            filter: "taskboard=notalevel".to_owned(),
            ansi: false,
        };
        assert!(matches!(
            build_filter(&config),
            Err(TelemetryError::InvalidFilter { .. })
        ));
    }

    #[rstest]
    fn second_initialisation_is_reported() {
        let config = TelemetryConfig::default();
        let _ = init_tracing(&config);
        assert!(matches!(
            init_tracing(&config),
            Err(TelemetryError::AlreadyInitialised)
        ));
    }
}
