//! Tracing subscriber setup.

use crate::error::{AppError, AppResult};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};
use treemap_config::LoggingConfig;

/// Prefix of the rolling log files.
pub const LOG_FILE_PREFIX: &str = "treemap-explorer.log";

/// Builds the filter. An explicit level wins over `RUST_LOG`, which wins over
/// the configured level.
pub fn build_filter(config: &LoggingConfig, level_override: Option<&str>) -> AppResult<EnvFilter> {
    if let Some(level) = level_override {
        return EnvFilter::try_new(level).map_err(|e| AppError::Logging(e.to_string()));
    }
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| AppError::Logging(e.to_string()))
}

/// Installs the global subscriber. Logs go to stderr, or to a daily rolling
/// file when a log directory is configured; keep the returned guard alive
/// until exit so buffered lines get flushed.
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> AppResult<Option<WorkerGuard>> {
    let filter = build_filter(config, level_override)?;

    if let Some(dir) = &config.directory {
        std::fs::create_dir_all(dir)?;
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let builder = fmt().with_env_filter(filter).with_writer(writer).with_ansi(false);
        let installed = if config.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
        installed.map_err(|e| AppError::Logging(e.to_string()))?;
        return Ok(Some(guard));
    }

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AppError::Logging(e.to_string()))?;
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = LoggingConfig::default();
        let filter = build_filter(&config, Some("treemap_app=trace")).unwrap();
        assert_eq!(filter.to_string(), "treemap_app=trace");
    }

    #[test]
    fn test_invalid_level_is_an_error() {
        let config = LoggingConfig::default();
        assert!(matches!(
            build_filter(&config, Some("treemap=loudest")),
            Err(AppError::Logging(_))
        ));
    }
}
