// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::path::{Path, PathBuf};

use crate::models::scanner::find_first_model;
use crate::utils::{absolutize, normalize_path};

use super::Settings;

/// What the model-path repair did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    /// The recorded path was already absolute and exists.
    Unchanged,
    /// A relative path was resolved against the app root and exists.
    Absolutized,
    /// The recorded path was empty or missing; this model was adopted
    /// from the default model directory. Callers should persist it.
    AutoDetected(PathBuf),
    /// No usable model was found.
    Missing,
}

impl RepairOutcome {
    pub fn needs_save(&self) -> bool {
        matches!(self, RepairOutcome::AutoDetected(_))
    }
}

/// Resolve `settings.model_path` to an absolute, normalized path,
/// falling back to the first `*.gguf` in `models_dir`.
///
/// Only touches the filesystem to check existence and list `models_dir`.
pub fn repair_model_path(settings: &mut Settings, app_root: &Path, models_dir: &Path) -> RepairOutcome {
    let recorded = settings.model_path.clone();
    let was_relative = settings.has_model_path() && recorded.is_relative();

    let candidate = if settings.has_model_path() {
        Some(absolutize(&recorded, app_root))
    } else {
        None
    };

    if let Some(path) = candidate.as_ref().filter(|p| p.exists()) {
        settings.model_path = path.clone();
        return if was_relative || *path != recorded {
            RepairOutcome::Absolutized
        } else {
            RepairOutcome::Unchanged
        };
    }

    if let Some(found) = find_first_model(models_dir) {
        let found = normalize_path(&found);
        settings.model_path = found.clone();
        return RepairOutcome::AutoDetected(found);
    }

    if let Some(path) = candidate {
        settings.model_path = path;
    }
    RepairOutcome::Missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"GGUF").unwrap();
    }

    #[test]
    fn test_absolute_existing_path_unchanged() {
        let tmp = TempDir::new().unwrap();
        let model = tmp.path().join("elsewhere").join("m.gguf");
        touch(&model);

        let mut settings = Settings {
            model_path: model.clone(),
            ..Default::default()
        };
        let outcome = repair_model_path(&mut settings, tmp.path(), &tmp.path().join("models"));
        assert_eq!(outcome, RepairOutcome::Unchanged);
        assert_eq!(settings.model_path, model);
    }

    #[test]
    fn test_relative_path_absolutized() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("models").join("m.gguf"));

        let mut settings = Settings {
            model_path: PathBuf::from("./models/../models/m.gguf"),
            ..Default::default()
        };
        let outcome = repair_model_path(&mut settings, tmp.path(), &tmp.path().join("models"));
        assert_eq!(outcome, RepairOutcome::Absolutized);
        assert!(settings.model_path.is_absolute());
        assert_eq!(
            settings.model_path,
            normalize_path(&tmp.path().join("models").join("m.gguf"))
        );
    }

    #[test]
    fn test_empty_path_auto_detects() {
        let tmp = TempDir::new().unwrap();
        let models = tmp.path().join("models");
        touch(&models.join("only.gguf"));

        let mut settings = Settings::default();
        let outcome = repair_model_path(&mut settings, tmp.path(), &models);
        assert!(outcome.needs_save());
        assert_eq!(settings.model_path, normalize_path(&models.join("only.gguf")));
    }

    #[test]
    fn test_missing_path_auto_detects() {
        let tmp = TempDir::new().unwrap();
        let models = tmp.path().join("models");
        touch(&models.join("real.gguf"));

        let mut settings = Settings {
            model_path: PathBuf::from("models/deleted.gguf"),
            ..Default::default()
        };
        let outcome = repair_model_path(&mut settings, tmp.path(), &models);
        assert_eq!(
            outcome,
            RepairOutcome::AutoDetected(normalize_path(&models.join("real.gguf")))
        );
    }

    #[test]
    fn test_nothing_found_keeps_absolutized_candidate() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings {
            model_path: PathBuf::from("models/gone.gguf"),
            ..Default::default()
        };
        let outcome = repair_model_path(&mut settings, tmp.path(), &tmp.path().join("models"));
        assert_eq!(outcome, RepairOutcome::Missing);
        assert!(settings.model_path.is_absolute());
        assert!(!outcome.needs_save());
    }

    #[test]
    fn test_nothing_found_with_empty_path_stays_empty() {
        let tmp = TempDir::new().unwrap();
        let mut settings = Settings::default();
        let outcome = repair_model_path(&mut settings, tmp.path(), &tmp.path().join("models"));
        assert_eq!(outcome, RepairOutcome::Missing);
        assert!(!settings.has_model_path());
    }
}
