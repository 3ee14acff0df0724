//! Common type definitions shared by the layout, rendering and app crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Colour theme of the rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background, dark text.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl Theme {
    /// Returns the opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon shown on the theme toggle: the sun switches back to light.
    #[must_use]
    pub const fn toggle_icon(self) -> &'static str {
        match self {
            Self::Dark => "☀️",
            Self::Light => "🌙",
        }
    }

    /// Stable lowercase name, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = TreemapError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(TreemapError::Config(format!("unknown theme '{other}'"))),
        }
    }
}

/// Target drawing area for a label, derived from layout output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rectangle {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Tooltip offset from the container's top-left corner, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPosition {
    /// Distance from the container's left edge.
    pub left: f64,
    /// Distance from the container's top edge.
    pub top: f64,
}

/// A point in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point {
    type Err = TreemapError;

    /// Parses `"x,y"`.
    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| TreemapError::Config(format!("expected 'x,y', got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| TreemapError::Config(format!("invalid coordinate '{v}': {e}")))
        };
        Ok(Self::new(parse(x)?, parse(y)?))
    }
}

/// Common result type for the workspace.
pub type Result<T> = std::result::Result<T, TreemapError>;

/// Workspace-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum TreemapError {
    /// A dataset could not be fetched or parsed.
    #[error("Failed to load dataset '{dataset}': {reason}")]
    DatasetLoad {
        /// Dataset key.
        dataset: String,
        /// Human readable cause.
        reason: String,
    },

    /// The requested dataset key is not configured.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TreemapError {
    /// Builds a [`TreemapError::DatasetLoad`].
    pub fn dataset_load(dataset: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::DatasetLoad {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this is a dataset load failure.
    #[must_use]
    pub const fn is_dataset_load(&self) -> bool {
        matches!(self, Self::DatasetLoad { .. })
    }
}
