//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;
use treemap_common::Theme;

/// Base URL of the published treemap datasets.
pub const DATASET_BASE_URL: &str =
    "https://cdn.freecodecamp.org/testable-projects-fcc/data/tree_map";

/// Average glyph width of the tile label font.
pub const DEFAULT_CHAR_WIDTH_PX: f64 = 6.5;

/// Tooltip distance from the pointer.
pub const DEFAULT_TOOLTIP_OFFSET: f64 = 8.0;

impl Default for Config {
    fn default() -> Self {
        Self {
            default_dataset: "games".to_string(),
            datasets: default_datasets(),
            layout: LayoutConfig::default(),
            labels: LabelConfig::default(),
            tooltip: TooltipConfig::default(),
            theme: ThemeConfig::default(),
            fetch: FetchConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// The three published datasets: video games, movies and kickstarter.
#[must_use]
pub fn default_datasets() -> Vec<DatasetConfig> {
    vec![
        DatasetConfig {
            key: "games".to_string(),
            url: format!("{DATASET_BASE_URL}/video-game-sales-data.json"),
            title: "Video Game Sales Treemap".to_string(),
            description: "Global sales (in millions) by platform / publisher.".to_string(),
        },
        DatasetConfig {
            key: "movies".to_string(),
            url: format!("{DATASET_BASE_URL}/movie-data.json"),
            title: "Movies Data Set Treemap".to_string(),
            description: "Box office revenue (in millions) of films by genre / studio."
                .to_string(),
        },
        DatasetConfig {
            key: "kickstarter".to_string(),
            url: format!("{DATASET_BASE_URL}/kickstarter-funding-data.json"),
            title: "Kickstarter Data Set Treemap".to_string(),
            description: "Funds raised by Kickstarter projects, by category.".to_string(),
        },
    ]
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1100,
            height: 520,
            padding_inner: 1.1,
            palette: Vec::new(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            char_width_px: DEFAULT_CHAR_WIDTH_PX,
            inset_x: 4.0,
            baseline_y: 12.0,
            line_height: 11.0,
        }
    }
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            offset: DEFAULT_TOOLTIP_OFFSET,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            preference_file: PathBuf::from("treemap-prefs.json"),
            system_default: Theme::Light,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            cache_ttl_seconds: 300,
            cache_capacity: 16,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            png_preview: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}
