//! Persisted theme preference.

use crate::error::AppResult;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use treemap_common::Theme;
use treemap_config::ThemeConfig;

/// On-disk shape of the preference file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Last chosen theme.
    pub theme: Theme,
}

/// Reads and writes the theme preference file.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured preference file.
    #[must_use]
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self::new(config.preference_file.clone())
    }

    /// Path of the preference file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved theme. A missing file is `None`; an unreadable one is logged and
    /// also `None`.
    #[must_use]
    pub fn load(&self) -> Option<Theme> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No saved theme preference");
                return None;
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read theme preference");
                return None;
            }
        };

        match serde_json::from_str::<Preferences>(&content) {
            Ok(prefs) => Some(prefs.theme),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring malformed theme preference");
                None
            }
        }
    }

    /// Saves the theme, replacing the file atomically.
    pub fn save(&self, theme: Theme) -> AppResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut file, &Preferences { theme })?;
        file.write_all(b"\n")?;
        file.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), %theme, "Theme preference saved");
        Ok(())
    }

    /// Saved theme, or `system_default` when nothing usable is saved.
    #[must_use]
    pub fn initial_theme(&self, system_default: Theme) -> Theme {
        self.load().unwrap_or(system_default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemap_common::test_utils::create_temp_dir;

    #[test]
    fn test_save_then_load() {
        let dir = create_temp_dir();
        let store = ThemeStore::new(dir.path().join("prefs.json"));
        store.save(Theme::Dark).unwrap();
        assert_eq!(store.load(), Some(Theme::Dark));

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw.trim(), r#"{"theme":"dark"}"#);
    }

    #[test]
    fn test_missing_file_uses_system_default() {
        let dir = create_temp_dir();
        let store = ThemeStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load(), None);
        assert_eq!(store.initial_theme(Theme::Dark), Theme::Dark);
    }

    #[test]
    fn test_malformed_file_is_ignored() {
        let dir = create_temp_dir();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"theme":"sepia"}"#).unwrap();
        let store = ThemeStore::new(path);
        assert_eq!(store.initial_theme(Theme::Light), Theme::Light);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = create_temp_dir();
        let store = ThemeStore::new(dir.path().join("nested/deeper/prefs.json"));
        store.save(Theme::Light).unwrap();
        assert_eq!(store.load(), Some(Theme::Light));
    }
}
