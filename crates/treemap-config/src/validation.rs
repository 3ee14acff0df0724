//! Validation rules and regex patterns for the configuration schema.

use crate::schema::Config;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

/// Regex pattern for `#rrggbb` colours (e.g. `#4e79a7`).
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, collecting every issue instead of stopping at the first.
    pub fn validate(config: &Config) -> Result<(), ValidationErrors> {
        config.validate()
    }
}

/// Accepts `http(s)://` URLs with a host, `file://` URLs and plain paths.
pub fn validate_dataset_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::new("empty_dataset_url"));
    }

    match Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(()),
            "http" | "https" => Err(ValidationError::new("missing_url_host")),
            "file" => Ok(()),
            // a Windows drive letter, e.g. `C:\data\games.json`
            scheme if scheme.len() == 1 => Ok(()),
            _ => Err(ValidationError::new("unsupported_url_scheme")),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(()),
        Err(_) => Err(ValidationError::new("invalid_dataset_url")),
    }
}

/// Every palette entry must be a `#rrggbb` colour.
pub fn validate_palette(palette: &[String]) -> Result<(), ValidationError> {
    match palette.iter().find(|c| !HEX_COLOR_REGEX.is_match(c)) {
        Some(color) => {
            let mut err = ValidationError::new("invalid_palette_color");
            err.message = Some(format!("'{color}' is not a #rrggbb colour").into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// At least one dataset, and no key used twice.
pub fn validate_dataset_keys(config: &Config) -> Result<(), ValidationError> {
    if config.datasets.is_empty() {
        let mut err = ValidationError::new("no_datasets");
        err.message = Some("at least one dataset is required".into());
        return Err(err);
    }

    let mut seen = HashSet::new();
    match config.datasets.iter().find(|d| !seen.insert(d.key.as_str())) {
        Some(dataset) => {
            let mut err = ValidationError::new("duplicate_dataset_key");
            err.message = Some(format!("duplicate dataset key '{}'", dataset.key).into());
            Err(err)
        }
        None => Ok(()),
    }
}

/// The default dataset must be one of the configured ones.
pub fn validate_default_dataset(config: &Config) -> Result<(), ValidationError> {
    if config.datasets.is_empty() || config.dataset(&config.default_dataset).is_some() {
        return Ok(());
    }
    let mut err = ValidationError::new("unknown_default_dataset");
    err.message = Some(
        format!(
            "default_dataset '{}' is not a configured dataset",
            config.default_dataset
        )
        .into(),
    );
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationErrorsKind;

    fn codes(errors: &ValidationErrors, field: &str) -> Vec<String> {
        match errors.errors().get(field) {
            Some(ValidationErrorsKind::Field(errs)) => {
                errs.iter().map(|e| e.code.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }

    fn nested<'a>(errors: &'a ValidationErrors, field: &str) -> &'a ValidationErrors {
        match errors.errors().get(field) {
            Some(ValidationErrorsKind::Struct(inner)) => inner.as_ref(),
            other => panic!("expected nested errors for {field}, got {other:?}"),
        }
    }

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#4e79a7"));
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(!HEX_COLOR_REGEX.is_match("4e79a7"));
        assert!(!HEX_COLOR_REGEX.is_match("#fff"));
        assert!(!HEX_COLOR_REGEX.is_match("#4e79a7 "));
        assert!(!HEX_COLOR_REGEX.is_match("blue"));
    }

    #[test]
    fn test_dataset_urls() {
        for ok in [
            "https://cdn.example.com/games.json",
            "HTTP://example.com/x.json",
            "file:///tmp/games.json",
            "data/games.json",
            "./games.json",
            "C:\\data\\games.json",
        ] {
            assert!(validate_dataset_url(ok).is_ok(), "{ok}");
        }
        for bad in ["", "   ", "htp:/ not a url", "ftp://example.com/x.json", "https://"] {
            assert!(validate_dataset_url(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_bad_dataset_url_is_rejected() {
        let mut config = Config::default();
        config.datasets[0].url = "htp:/ not a url".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(matches!(
            errors.errors().get("datasets"),
            Some(ValidationErrorsKind::List(_))
        ));
    }

    #[test]
    fn test_collects_every_issue() {
        let mut config = Config::default();
        config.layout.width = 0;
        config.labels.char_width_px = 0.0;
        config.default_dataset = "nope".to_string();

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(nested(&errors, "layout").field_errors().contains_key("width"));
        assert!(nested(&errors, "labels").field_errors().contains_key("char_width_px"));
        assert_eq!(codes(&errors, "__all__"), vec!["unknown_default_dataset"]);
    }

    #[test]
    fn test_out_of_range_numbers_are_rejected() {
        let mut config = Config::default();
        config.layout.padding_inner = -1.0;
        config.tooltip.offset = f64::INFINITY;

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(nested(&errors, "layout").field_errors().contains_key("padding_inner"));
        assert!(nested(&errors, "tooltip").field_errors().contains_key("offset"));
    }

    #[test]
    fn test_duplicate_dataset_keys() {
        let mut config = Config::default();
        let first = config.datasets[0].clone();
        config.datasets.push(first);

        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(codes(&errors, "__all__"), vec!["duplicate_dataset_key"]);
        assert!(errors.to_string().contains("duplicate dataset key 'games'"));
    }

    #[test]
    fn test_palette_entries_must_be_hex() {
        let mut config = Config::default();
        config.layout.palette = vec!["#4e79a7".to_string(), "#f28e2c".to_string()];
        assert!(ConfigValidator::validate(&config).is_ok());

        config.layout.palette.push("blue".to_string());
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(nested(&errors, "layout").field_errors().contains_key("palette"));
    }

    #[test]
    fn test_empty_dataset_list() {
        let config = Config {
            datasets: Vec::new(),
            ..Config::default()
        };
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(codes(&errors, "__all__"), vec!["no_datasets"]);
    }

    #[test]
    fn test_timeout_range() {
        let mut config = Config::default();
        config.fetch.timeout_seconds = 0;
        let errors = ConfigValidator::validate(&config).unwrap_err();
        assert!(nested(&errors, "fetch").field_errors().contains_key("timeout_seconds"));
    }
}
