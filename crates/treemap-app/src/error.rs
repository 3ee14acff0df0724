//! Application-wide error types using thiserror.

use treemap_common::TreemapError;
use treemap_config::ConfigError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Dataset, rendering or other library error.
    #[error(transparent)]
    Treemap(#[from] TreemapError),

    /// Configuration loading error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Preference file could not be encoded or decoded.
    #[error("Preference file error: {0}")]
    Preferences(#[from] serde_json::Error),

    /// Logging could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type for the application.
pub type AppResult<T> = Result<T, AppError>;
