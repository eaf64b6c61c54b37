//! Subscriber installation and logging configuration.
//!
//! # Design
//! - One entry point installs the global subscriber (JSON or pretty fmt layer).
//! - `RUST_LOG` wins when set; otherwise the configured level is used.
//! - The build identifier is recorded once so every span reports the same value.

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Default level when neither `RUST_LOG` nor a configured level is usable.
pub const DEFAULT_LOG_LEVEL: &str = "info";

static BUILD_SHA: OnceCell<String> = OnceCell::new();

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level directive (e.g., `info`, `debug`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
    /// Build identifier recorded in structured logs.
    pub build_sha: &'a str,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
            build_sha: build_sha(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, pretty-printed logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Parse a configured format name, falling back to [`LogFormat::infer`].
    #[must_use]
    pub fn from_config(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(raw) if raw.eq_ignore_ascii_case("json") => Self::Json,
            Some(raw) if raw.eq_ignore_ascii_case("pretty") => Self::Pretty,
            _ => Self::infer(),
        }
    }
}

/// Map a `LOG_LEVEL` value (`DEBUG`, `INFO`, `WARN`, `ERROR`, any case) to a filter
/// directive. Unknown or missing values map to [`DEFAULT_LOG_LEVEL`].
#[must_use]
pub fn normalize_level(value: Option<&str>) -> &'static str {
    let Some(raw) = value.map(str::trim) else {
        return DEFAULT_LOG_LEVEL;
    };
    if raw.eq_ignore_ascii_case("debug") {
        "debug"
    } else if raw.eq_ignore_ascii_case("warn") || raw.eq_ignore_ascii_case("warning") {
        "warn"
    } else if raw.eq_ignore_ascii_case("error") {
        "error"
    } else {
        DEFAULT_LOG_LEVEL
    }
}

/// Access the build SHA recorded during logging initialisation.
#[must_use]
pub fn build_sha() -> &'static str {
    BUILD_SHA.get().map_or("dev", String::as_str)
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    // First initialisation wins; later calls keep the recorded identifier.
    let _ = BUILD_SHA.set(config.build_sha.to_string());

    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(build_env_filter(config.level))
            .with(fmt::layer().with_target(false).with_thread_ids(false))
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_accepts_uppercase_names() {
        assert_eq!(normalize_level(Some("DEBUG")), "debug");
        assert_eq!(normalize_level(Some("INFO")), "info");
        assert_eq!(normalize_level(Some("WARN")), "warn");
        assert_eq!(normalize_level(Some("ERROR")), "error");
        assert_eq!(normalize_level(Some("error ")), "error");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        assert_eq!(normalize_level(None), DEFAULT_LOG_LEVEL);
        assert_eq!(normalize_level(Some("")), DEFAULT_LOG_LEVEL);
        assert_eq!(normalize_level(Some("verbose")), DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn log_format_parses_variants() {
        assert_eq!(LogFormat::from_config(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_config(Some("PRETTY")), LogFormat::Pretty);
        assert_eq!(LogFormat::from_config(Some("other")), LogFormat::infer());
        assert_eq!(LogFormat::from_config(None), LogFormat::infer());
    }

    #[test]
    fn init_logging_installs_subscriber_once() {
        let config = LoggingConfig {
            level: "info",
            format: LogFormat::Pretty,
            build_sha: "abc1234",
        };
        let _ = init_logging(&config);
        assert_eq!(build_sha(), "abc1234");

        let again = LoggingConfig {
            build_sha: "fedcba9",
            ..config
        };
        assert!(init_logging(&again).is_err());
        assert_eq!(build_sha(), "abc1234");
    }
}
