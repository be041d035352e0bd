//! Process-wide logging setup.
//!
//! [`init_logging`] installs a global `tracing` subscriber. In the default
//! [`LogFormat::Ecs`] mode, `tracing` events and serene's own request logger
//! share one ECS handler on standard output, so library diagnostics and
//! request summaries land in the same stream with the same shape.
//!
//! # Example
//!
//! ```rust,ignore
//! use serene_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//!
//! tracing::info!(listener = "0.0.0.0:8080", "Server started");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use serde::Deserialize;
use serene_log::{set_default_logger, EcsConfig, EcsHandler, EcsLayer, LevelFilter, Logger, RecordSink};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the global subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// ECS JSON lines through [`EcsLayer`].
    #[default]
    Ecs,
    /// `tracing-subscriber` JSON lines.
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directives (e.g., "info", "serene_log=debug,hyper=warn").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include span events (enter, exit, close). Ignored in ECS mode.
    pub span_events: bool,

    /// Whether to include file/line info. Ignored in ECS mode.
    pub file_line_info: bool,

    /// Whether to include target (module path). Ignored in ECS mode.
    pub include_target: bool,

    /// Also make the ECS handler the default serene logger.
    pub install_default_logger: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Ecs,
            span_events: false,
            file_line_info: false,
            include_target: true,
            install_default_logger: true,
        }
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            span_events: true,
            file_line_info: true,
            install_default_logger: false,
            ..Self::default()
        }
    }

    /// Creates a production configuration with ECS output.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Returns the ECS handler threshold for the filter directives.
    ///
    /// Per-target filtering is left to the `EnvFilter`; the handler only
    /// needs the most verbose level any directive can enable.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` if the filter is invalid.
    pub fn max_level(&self) -> TelemetryResult<LevelFilter> {
        create_env_filter(&self.level).map(|filter| threshold(&filter))
    }
}

/// `OFF` for a filter that enables nothing, `TRACE` when the filter gives no hint.
fn threshold(filter: &EnvFilter) -> LevelFilter {
    filter.max_level_hint().unwrap_or(LevelFilter::TRACE)
}

/// Initializes the logging subsystem.
///
/// # Arguments
///
/// * `config` - Logging configuration
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` if the filter is invalid and
/// `TelemetryError::LoggingInit` if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Ecs => {
            let handler: Arc<dyn RecordSink> = Arc::new(EcsHandler::new(
                EcsConfig::default().with_level_filter(threshold(&filter)),
            ));
            tracing_subscriber::registry()
                .with(EcsLayer::from_arc(handler.clone()).with_filter(filter))
                .try_init()
                .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
            if config.install_default_logger {
                set_default_logger(Logger::from_arc(handler));
            }
        }
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(span_events)
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_target(config.include_target)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(fmt_layer)
                .try_init()
                .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_span_events(span_events)
                .with_file(config.file_line_info)
                .with_line_number(config.file_line_info)
                .with_target(config.include_target)
                .with_filter(filter);

            tracing_subscriber::registry()
                .with(fmt_layer)
                .try_init()
                .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
        }
    }

    tracing::debug!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// Creates an env filter from a string.
///
/// # Arguments
///
/// * `filter` - Filter string (e.g., "info", "serene_log=debug,hyper=warn")
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::InvalidConfig(format!("Invalid log filter '{filter}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert_eq!(config.format, LogFormat::Ecs);
        assert_eq!(config.level, "info");
        assert!(config.install_default_logger);
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.span_events);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_production_config() {
        let config = LogConfig::production();
        assert_eq!(config.format, LogFormat::Ecs);
        assert!(!config.span_events);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_max_level() {
        let config = LogConfig {
            level: "warn,serene_log=debug".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.max_level().unwrap(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_max_level_off() {
        let config = LogConfig {
            level: "off".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.max_level().unwrap(), LevelFilter::OFF);
    }

    #[test]
    fn test_max_level_bare_target() {
        let config = LogConfig {
            level: "serene_log".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(config.max_level().unwrap(), LevelFilter::TRACE);
    }

    #[test]
    fn test_max_level_invalid_filter() {
        let config = LogConfig {
            level: "serene_log=loud".to_string(),
            ..LogConfig::default()
        };
        assert!(matches!(
            config.max_level(),
            Err(TelemetryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_create_env_filter_valid() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("serene_log=debug,hyper=warn").is_ok());
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };

        // Should return Ok even when disabled
        let result = init_logging(&config);
        assert!(result.is_ok());
    }
}
