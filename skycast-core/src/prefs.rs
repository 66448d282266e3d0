//! Per-location alert-subscription preferences.
//!
//! Preferences are keyed by the normalized location so that
//! "New York, NY" and "  new york, ny " address the same entry. The
//! same normalization runs on both the read and the write path; key
//! drift between the two is the classic failure mode here.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// The alert conditions a user can subscribe to.
pub const ALERT_CONDITIONS: &[&str] = &[
    "Heavy Rain",
    "Strong Winds",
    "Thunderstorms",
    "High UV Index",
    "Fog",
    "Snow",
];

/// Canonical form of a location key: lowercase, trimmed, inner
/// whitespace collapsed to single spaces.
pub fn normalize_location(location: &str) -> String {
    location
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Subscription state for one alert condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPreference {
    pub enabled: bool,
    /// Optional numeric trigger threshold, condition specific.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
}

/// Map from alert-condition name to its subscription state.
pub type LocationPreferences = BTreeMap<String, AlertPreference>;

/// Key-value persistence surface for alert preferences.
pub trait PreferenceStore {
    /// Preferences for a location, if any were ever saved.
    fn get(&self, location: &str) -> Result<Option<LocationPreferences>>;

    /// Replace the preferences for a location.
    fn set(&self, location: &str, preferences: &LocationPreferences) -> Result<()>;
}

/// File-backed store: one JSON document mapping normalized location to
/// its preferences, read and rewritten whole on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("alert-preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, LocationPreferences>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preference file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preference file: {}", self.path.display()))
    }

    fn write_all(&self, all: &BTreeMap<String, LocationPreferences>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preference directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(all).context("Failed to serialize preferences")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write preference file: {}", self.path.display()))?;

        Ok(())
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, location: &str) -> Result<Option<LocationPreferences>> {
        let key = normalize_location(location);
        Ok(self.read_all()?.remove(&key))
    }

    fn set(&self, location: &str, preferences: &LocationPreferences) -> Result<()> {
        let key = normalize_location(location);
        let mut all = self.read_all()?;
        all.insert(key, preferences.clone());
        self.write_all(&all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_lowercases_and_collapses_whitespace() {
        assert_eq!(normalize_location("  New   York,  NY "), "new york, ny");
        assert_eq!(normalize_location("Paris"), "paris");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_location("  OSLO   Norway ");
        assert_eq!(normalize_location(&once), once);
    }

    fn sample_preferences() -> LocationPreferences {
        let mut prefs = LocationPreferences::new();
        prefs.insert(
            "Heavy Rain".to_string(),
            AlertPreference {
                enabled: true,
                threshold: Some(20.0),
            },
        );
        prefs.insert(
            "Fog".to_string(),
            AlertPreference {
                enabled: false,
                threshold: None,
            },
        );
        prefs
    }

    #[test]
    fn set_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prefs.json"));

        store.set("New York, NY", &sample_preferences()).unwrap();
        let loaded = store.get("New York, NY").unwrap().unwrap();

        assert_eq!(loaded, sample_preferences());
    }

    #[test]
    fn read_and_write_share_normalization() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prefs.json"));

        store.set("  NEW   york, ny ", &sample_preferences()).unwrap();
        let loaded = store.get("new york, ny").unwrap();

        assert!(loaded.is_some());
    }

    #[test]
    fn unknown_location_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prefs.json"));

        assert!(store.get("nowhere").unwrap().is_none());
    }

    #[test]
    fn set_replaces_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("prefs.json"));

        store.set("Oslo", &sample_preferences()).unwrap();

        let mut updated = sample_preferences();
        updated.insert(
            "Snow".to_string(),
            AlertPreference {
                enabled: true,
                threshold: None,
            },
        );
        store.set("Oslo", &updated).unwrap();

        let loaded = store.get("Oslo").unwrap().unwrap();
        assert_eq!(loaded, updated);
        assert!(loaded.contains_key("Snow"));
    }
}
