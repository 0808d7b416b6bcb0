// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

use super::repair::{repair_model_path, RepairOutcome};
use super::{Settings, CONFIG_FILE_NAME, MODELS_DIR_NAME};

/// Reads and writes the settings file for one application root.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    app_root: PathBuf,
    path: PathBuf,
}

impl SettingsStore {
    /// Store using the default config location under `app_root`.
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        let app_root = app_root.into();
        let path = app_root.join(MODELS_DIR_NAME).join(CONFIG_FILE_NAME);
        Self { app_root, path }
    }

    /// Store with an explicit config file path.
    pub fn with_path(app_root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
            path: path.into(),
        }
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory scanned for models during auto-repair.
    pub fn models_dir(&self) -> PathBuf {
        self.app_root.join(MODELS_DIR_NAME)
    }

    /// Load settings; defaults when the file does not exist.
    ///
    /// Keys are read one at a time: a key with a value of the wrong shape
    /// takes its default and the rest of the file still applies. Only a
    /// file that is not a JSON object at all is an error.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let settings = match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => settings_from_map(&map),
            _ => return Err(serde_json::Error::custom("settings file is not a JSON object").into()),
        };
        Ok(settings.sanitized())
    }

    /// Load settings, falling back to defaults on any read or parse error.
    pub fn load_or_default(&self) -> Settings {
        self.load_logged().unwrap_or_default()
    }

    fn load_logged(&self) -> Option<Settings> {
        match self.load() {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(
                    target: "deskpet.settings",
                    path = %self.path.display(),
                    "Failed to load settings, using defaults: {}",
                    e
                );
                None
            }
        }
    }

    /// Load settings and repair the model path.
    ///
    /// An auto-detected model is written back to disk immediately, unless
    /// the file could not be read; a save would replace it with defaults.
    /// A save failure here is logged; the in-memory correction still applies.
    pub fn load_repaired(&self) -> (Settings, RepairOutcome) {
        let loaded = self.load_logged();
        let readable = loaded.is_some();
        let mut settings = loaded.unwrap_or_default();
        let outcome = repair_model_path(&mut settings, &self.app_root, &self.models_dir());

        if let RepairOutcome::AutoDetected(path) = &outcome {
            tracing::info!(
                target: "deskpet.settings",
                model = %path.display(),
                "Auto-detected model"
            );
        }
        if outcome.needs_save() && readable {
            if let Err(e) = self.save(&settings) {
                tracing::warn!(target: "deskpet.settings", "Failed to persist detected model: {}", e);
            }
        }

        (settings, outcome)
    }

    /// Save settings, fully overwriting the file.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let settings = settings.clone().sanitized();
        let content = to_json_4space(&settings)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(target: "deskpet.settings", path = %self.path.display(), "Saved settings");
        Ok(())
    }

    /// Overwrite the file with defaults.
    pub fn reset(&self) -> Result<Settings> {
        let settings = Settings::default();
        self.save(&settings)?;
        Ok(settings)
    }
}

fn settings_from_map(map: &Map<String, Value>) -> Settings {
    let defaults = Settings::default();
    Settings {
        pet_scale: field(map, "pet_scale", defaults.pet_scale),
        pet_opacity: field(map, "pet_opacity", defaults.pet_opacity),
        model_path: field(map, "model_path", defaults.model_path),
        display_mode: field(map, "display_mode", defaults.display_mode),
        auto_start: field(map, "auto_start", defaults.auto_start),
        focus_minutes: field(map, "focus_minutes", defaults.focus_minutes),
    }
}

fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, default: T) -> T {
    let Some(value) = map.get(key) else {
        return default;
    };
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        tracing::warn!(target: "deskpet.settings", key, %value, "Invalid setting, using default: {}", e);
        default
    })
}

fn to_json_4space<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayMode;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let store = SettingsStore::new("/opt/pet");
        assert_eq!(store.path(), Path::new("/opt/pet/models/config.json"));
        assert_eq!(store.models_dir(), PathBuf::from("/opt/pet/models"));
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_load_corrupt_file_errors_but_default_fallback_works() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        std::fs::create_dir_all(store.models_dir()).unwrap();
        std::fs::write(store.path(), "{ definitely not json").unwrap();

        assert!(store.load().is_err());
        assert_eq!(store.load_or_default(), Settings::default());
    }

    #[test]
    fn test_load_non_object_errors() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        std::fs::create_dir_all(store.models_dir()).unwrap();
        std::fs::write(store.path(), "[1, 2, 3]").unwrap();

        assert!(store.load().is_err());
    }

    #[test]
    fn test_bad_value_only_resets_its_own_key() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        std::fs::create_dir_all(store.models_dir()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"pet_scale": 2.0, "display_mode": "Top", "focus_minutes": 12.5, "auto_start": true}"#,
        )
        .unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.pet_scale, 2.0);
        assert_eq!(settings.display_mode, DisplayMode::Top);
        assert_eq!(settings.focus_minutes, 25);
        assert!(settings.auto_start);
    }

    #[test]
    fn test_unreadable_file_not_overwritten_by_auto_detect() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        std::fs::create_dir_all(store.models_dir()).unwrap();
        std::fs::write(store.models_dir().join("pet.gguf"), b"GGUF").unwrap();
        std::fs::write(store.path(), "{ \"focus_minutes\": 45,").unwrap();

        let (settings, outcome) = store.load_repaired();
        assert!(outcome.needs_save());
        assert!(settings.has_model_path());
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "{ \"focus_minutes\": 45,"
        );
    }

    #[test]
    fn test_save_creates_parent_and_uses_4_space_indent() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        store.save(&Settings::default()).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\n    \"pet_scale\": 1.0"));
    }

    #[test]
    fn test_save_overwrites_unknown_keys() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        std::fs::create_dir_all(store.models_dir()).unwrap();
        std::fs::write(store.path(), r#"{"legacy_key": true, "focus_minutes": 40}"#).unwrap();

        let mut settings = store.load().unwrap();
        assert_eq!(settings.focus_minutes, 40);
        settings.display_mode = DisplayMode::Bottom;
        store.save(&settings).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(!content.contains("legacy_key"));
        assert!(content.contains("\"bottom\""));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        let settings = Settings {
            pet_scale: 1.5,
            pet_opacity: 0.8,
            model_path: PathBuf::from("models/q.gguf"),
            display_mode: DisplayMode::Normal,
            auto_start: true,
            focus_minutes: 45,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_reset_writes_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = SettingsStore::new(tmp.path());
        store
            .save(&Settings {
                focus_minutes: 90,
                ..Default::default()
            })
            .unwrap();
        store.reset().unwrap();
        assert_eq!(store.load().unwrap().focus_minutes, 25);
    }
}
