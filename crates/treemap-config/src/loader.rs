//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use crate::validation::ConfigValidator;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use treemap_common::{Theme, TreemapError};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TREEMAP_CONFIG_PATH";

/// File names looked for in the working directory, in order.
const DISCOVERY_FILES: [&str; 3] = ["treemap.yaml", "treemap.yml", "treemap.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading or writing the configuration file
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {message}")]
    EnvParse {
        /// Variable name.
        var: String,
        /// Parse failure.
        message: String,
    },

    /// Unknown file extension
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for TreemapError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, Format::from_path(path)?)?;

        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the environment, a discovered file, or defaults
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            return Self::load_config(config_path);
        }
        if let Some(path) = Self::discover(Path::new(".")) {
            return Self::load_config(path);
        }

        debug!("No configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config(path)
    }

    /// First discoverable configuration file inside `dir`.
    #[must_use]
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DISCOVERY_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Saves configuration atomically: written to a sibling temp file, then renamed.
    pub fn save<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let rendered = match Format::from_path(path)? {
            Format::Yaml => serde_yaml::to_string(config)?,
            Format::Toml => toml::to_string_pretty(config)?,
            Format::Json => serde_json::to_string_pretty(config)?,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(rendered.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| ConfigError::Io(e.error))?;

        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    fn parse(content: &str, format: Format) -> Result<Config, ConfigError> {
        Ok(match format {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Toml => toml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        })
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        if let Ok(dataset) = env::var("TREEMAP_DEFAULT_DATASET") {
            config.default_dataset = dataset;
        }

        if let Ok(dir) = env::var("TREEMAP_OUTPUT_DIR") {
            config.output.directory = PathBuf::from(dir);
        }

        if let Ok(level) = env::var("TREEMAP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(theme) = env::var("TREEMAP_THEME") {
            config.theme.system_default =
                theme.parse::<Theme>().map_err(|e| ConfigError::EnvParse {
                    var: "TREEMAP_THEME".to_string(),
                    message: e.to_string(),
                })?;
        }

        if let Ok(timeout) = env::var("TREEMAP_FETCH_TIMEOUT") {
            config.fetch.timeout_seconds =
                timeout.parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::EnvParse {
                        var: "TREEMAP_FETCH_TIMEOUT".to_string(),
                        message: e.to_string(),
                    }
                })?;
        }

        Ok(())
    }
}
