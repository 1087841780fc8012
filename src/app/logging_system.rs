use super::config::LogLevel;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("Failed to set global tracing subscriber: {0}")]
    AlreadyInitialized(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Output format of the tool's own diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `RUST_LOG_FORMAT=json` selects JSON; anything else is human-readable.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Build the filter directive string. `RUST_LOG` wins over the configured level.
pub fn build_filter_string(level: LogLevel, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => level.as_str().to_string(),
    }
}

/// Install the global subscriber. Diagnostics go to stderr so the verbose
/// record echo on stdout stays machine-readable.
pub fn setup_logging(level: LogLevel) -> Result<(), LoggingError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let format_env = std::env::var("RUST_LOG_FORMAT").ok();

    let filter = build_filter_string(level, rust_log.as_deref());
    let env_filter = EnvFilter::try_new(&filter).map_err(|source| LoggingError::InvalidFilter {
        filter: filter.clone(),
        source,
    })?;

    match LogFormat::from_env_value(format_env.as_deref()) {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(env_filter).with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .compact(),
            );
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_configured_level() {
        assert_eq!(build_filter_string(LogLevel::Warn, None), "warn");
        assert_eq!(build_filter_string(LogLevel::Debug, Some("   ")), "debug");
    }

    #[test]
    fn test_rust_log_overrides_level() {
        assert_eq!(
            build_filter_string(LogLevel::Warn, Some("gelf_sender=trace")),
            "gelf_sender=trace"
        );
    }

    #[test]
    fn test_log_format_selection() {
        assert_eq!(LogFormat::from_env_value(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::from_env_value(Some("text")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_env_value(None), LogFormat::Pretty);
    }

    #[test]
    fn test_second_setup_does_not_panic() {
        let _ = setup_logging(LogLevel::Error);
        let second = setup_logging(LogLevel::Error);
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized(_))));
    }
}
