//! Configuration schema definitions using serde.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use treemap_common::Theme;
use validator::Validate;

/// Main configuration structure for Treemap Explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "crate::validation::validate_dataset_keys", skip_on_field_errors = false))]
#[validate(schema(function = "crate::validation::validate_default_dataset", skip_on_field_errors = false))]
pub struct Config {
    /// Key of the dataset shown on startup.
    pub default_dataset: String,
    /// Datasets that can be switched between.
    #[validate]
    pub datasets: Vec<DatasetConfig>,
    /// Treemap canvas configuration.
    #[validate]
    pub layout: LayoutConfig,
    /// Tile label configuration.
    #[validate]
    pub labels: LabelConfig,
    /// Tooltip configuration.
    #[validate]
    pub tooltip: TooltipConfig,
    /// Theme configuration.
    pub theme: ThemeConfig,
    /// Dataset fetch configuration.
    #[validate]
    pub fetch: FetchConfig,
    /// Output configuration.
    pub output: OutputConfig,
    /// Logging configuration.
    #[validate]
    pub logging: LoggingConfig,
}

/// A single switchable dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DatasetConfig {
    /// Short key used on the command line, e.g. `games`.
    #[validate(length(min = 1, message = "Dataset key cannot be empty"))]
    pub key: String,
    /// Source URL. `http(s)://`, `file://` or a plain path.
    #[validate(custom(function = "crate::validation::validate_dataset_url", message = "Dataset URL must be http(s)://, file:// or a plain path"))]
    pub url: String,
    /// Page title shown above the chart.
    pub title: String,
    /// One-line description shown under the title.
    pub description: String,
}

/// Treemap canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LayoutConfig {
    /// Logical canvas width in pixels.
    #[validate(range(min = 1, max = 10000, message = "Width must be between 1 and 10000"))]
    pub width: u32,
    /// Logical canvas height in pixels.
    #[validate(range(min = 1, max = 10000, message = "Height must be between 1 and 10000"))]
    pub height: u32,
    /// Gap between sibling tiles in pixels.
    #[validate(range(min = 0.0, max = 100.0, message = "Padding must be between 0 and 100"))]
    pub padding_inner: f64,
    /// Category colours as `#rrggbb`. Empty means Tableau10.
    #[validate(custom(function = "crate::validation::validate_palette", message = "Palette entries must be #rrggbb colours"))]
    pub palette: Vec<String>,
}

/// Tile label configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LabelConfig {
    /// Average glyph width used to estimate how many characters fit.
    #[validate(range(min = 0.5, max = 100.0, message = "Glyph width must be between 0.5 and 100"))]
    pub char_width_px: f64,
    /// Label x offset inside the tile.
    pub inset_x: f64,
    /// Baseline of the first line inside the tile.
    pub baseline_y: f64,
    /// Baseline distance between the two lines of a split label.
    pub line_height: f64,
}

/// Tooltip configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TooltipConfig {
    /// Offset from the pointer so the tooltip does not cover it.
    #[validate(range(min = -500.0, max = 500.0, message = "Tooltip offset must be between -500 and 500"))]
    pub offset: f64,
}

/// Theme configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// File holding the persisted theme preference.
    pub preference_file: PathBuf,
    /// Theme used when no preference has been saved yet.
    pub system_default: Theme,
}

/// Dataset fetch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FetchConfig {
    /// HTTP request timeout in seconds.
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
    /// How long a fetched dataset stays cached, in seconds. 0 disables caching.
    pub cache_ttl_seconds: u64,
    /// Maximum number of cached datasets.
    pub cache_capacity: u64,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory rendered files are written to.
    pub directory: PathBuf,
    /// Also write a PNG preview next to every SVG.
    pub png_preview: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,
    /// Emit JSON lines instead of human readable output.
    pub json: bool,
    /// Write logs to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
}

impl Config {
    /// Looks up a dataset by key.
    #[must_use]
    pub fn dataset(&self, key: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.key == key)
    }

    /// Keys of all configured datasets, in configuration order.
    pub fn dataset_keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().map(|d| d.key.as_str())
    }
}
