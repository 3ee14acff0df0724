//! Integration tests for treemap-common types.

use treemap_common::{Point, Theme, TreemapError};

#[test]
fn test_theme_toggle_is_an_involution() {
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
    assert_eq!(Theme::Dark.toggled(), Theme::Light);
    assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
}

#[test]
fn test_theme_toggle_icon() {
    assert_eq!(Theme::Dark.toggle_icon(), "☀️");
    assert_eq!(Theme::Light.toggle_icon(), "🌙");
}

#[test]
fn test_theme_serde_lowercase() {
    let json = serde_json::to_string(&Theme::Dark).unwrap();
    assert_eq!(json, "\"dark\"");

    let parsed: Theme = serde_json::from_str("\"light\"").unwrap();
    assert_eq!(parsed, Theme::Light);
}

#[test]
fn test_theme_from_str() {
    assert_eq!(" Dark ".parse::<Theme>().unwrap(), Theme::Dark);
    assert!("sepia".parse::<Theme>().is_err());
}

#[test]
fn test_point_from_str() {
    let p: Point = "100, 42.5".parse().unwrap();
    assert_eq!(p, Point::new(100.0, 42.5));

    assert!("100".parse::<Point>().is_err());
    assert!("a,b".parse::<Point>().is_err());
}

#[test]
fn test_dataset_load_error_display() {
    let err = TreemapError::dataset_load("games", "connection refused");
    assert!(err.is_dataset_load());
    assert_eq!(
        err.to_string(),
        "Failed to load dataset 'games': connection refused"
    );
    assert!(!TreemapError::UnknownDataset("x".into()).is_dataset_load());
}
