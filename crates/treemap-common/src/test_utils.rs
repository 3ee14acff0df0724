//! Test utilities and shared test helpers for Treemap Explorer.
//!
//! This module provides common testing utilities and dataset fixtures
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;

#[cfg(feature = "tracing-subscriber")]
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
#[cfg(feature = "tracing-subscriber")]
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// No-op version when tracing-subscriber is not available
#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_test_logging() {
    INIT.call_once(|| {});
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Hierarchical dataset documents shaped like the published treemap datasets.
pub mod dataset_fixtures {
    /// Two platforms, five games, values as numeric strings.
    pub fn games_json() -> &'static str {
        r#"{
  "name": "Video Game Sales Data Top 100",
  "children": [
    {
      "name": "Wii",
      "children": [
        { "name": "Wii Sports", "category": "Wii", "value": "82.53" },
        { "name": "Mario Kart Wii", "category": "Wii", "value": "35.52" },
        { "name": "Wii Sports Resort", "category": "Wii", "value": "32.77" }
      ]
    },
    {
      "name": "DS",
      "children": [
        { "name": "New Super Mario Bros.", "category": "DS", "value": "29.8" },
        { "name": "Nintendogs", "category": "DS", "value": "24.67" }
      ]
    }
  ]
}"#
    }

    /// Numeric values, one category per studio, including a tie and a markup-y name.
    pub fn movies_json() -> &'static str {
        r#"{
  "name": "Movies",
  "children": [
    {
      "name": "Action",
      "children": [
        { "name": "Avatar", "category": "Action", "value": 760505847 },
        { "name": "Tom & Jerry <Remastered>", "category": "Action", "value": 100 }
      ]
    },
    {
      "name": "Drama",
      "children": [
        { "name": "Titanic", "category": "Drama", "value": 658672302 },
        { "name": "Tie A", "category": "Drama", "value": 100 },
        { "name": "Tie B", "category": "Drama", "value": 100 }
      ]
    }
  ]
}"#
    }

    /// Eleven single-leaf categories, enough to wrap a ten-colour palette.
    pub fn many_categories_json() -> String {
        let children: Vec<String> = (0..11)
            .map(|i| {
                format!(
                    r#"{{ "name": "C{i}", "children": [ {{ "name": "leaf{i}", "category": "cat{i}", "value": {} }} ] }}"#,
                    100 - i
                )
            })
            .collect();
        format!(r#"{{ "name": "root", "children": [{}] }}"#, children.join(","))
    }
}
