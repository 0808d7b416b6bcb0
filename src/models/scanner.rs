// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! GGUF model discovery
//!
//! The settings auto-repair only looks at the app's own model directory
//! (see [`find_first_model`]). The `models` command additionally lists
//! models from LM Studio, the HuggingFace cache, and GPT4All.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::MODELS_DIR_NAME;
use crate::utils::format_size;

/// File extension of model files the pet can load.
pub const MODEL_EXTENSION: &str = "gguf";

/// Where a discovered model came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// The pet's own model directory (`<app_root>/models/`)
    App,
    /// LM Studio models directory
    LmStudio,
    /// HuggingFace cache (~/.cache/huggingface/hub/)
    HuggingFace,
    /// GPT4All models directory
    Gpt4All,
    /// User-specified directory
    Custom(PathBuf),
}

impl ModelSource {
    pub fn label(&self) -> &str {
        match self {
            ModelSource::App => "pet",
            ModelSource::LmStudio => "LM Studio",
            ModelSource::HuggingFace => "HuggingFace",
            ModelSource::Gpt4All => "GPT4All",
            ModelSource::Custom(_) => "custom",
        }
    }

    fn priority(&self) -> u8 {
        match self {
            ModelSource::App => 0,
            ModelSource::Custom(_) => 1,
            ModelSource::LmStudio => 2,
            ModelSource::HuggingFace => 3,
            ModelSource::Gpt4All => 4,
        }
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A GGUF model file discovered on the system
#[derive(Debug, Clone)]
pub struct DiscoveredModel {
    pub path: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
    pub source: ModelSource,
}

impl DiscoveredModel {
    pub fn display_name(&self) -> String {
        format!("{} (from {})", self.filename, self.source)
    }

    pub fn size_display(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Whether `path` has the model extension (case-insensitive).
pub fn is_model_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(MODEL_EXTENSION))
}

/// First model file in `dir` by file name. Non-recursive.
pub fn find_first_model(dir: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(dir).ok()?;
    let mut found: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_model_file(path))
        .collect();
    found.sort();
    found.into_iter().next()
}

/// Scan the app model directory and well-known locations.
///
/// Sorted by source priority (the pet's own directory first), then by
/// size descending.
pub fn scan_for_models(app_root: &Path) -> Vec<DiscoveredModel> {
    let mut models = Vec::new();

    scan_directory(&app_root.join(MODELS_DIR_NAME), &ModelSource::App, &mut models, 1);

    for dir in lm_studio_dirs() {
        scan_directory(&dir, &ModelSource::LmStudio, &mut models, 3);
    }

    // models--org--name/snapshots/hash/ nests deeper
    if let Some(dir) = huggingface_cache_dir() {
        scan_directory(&dir, &ModelSource::HuggingFace, &mut models, 5);
    }

    if let Some(dir) = gpt4all_dir() {
        scan_directory(&dir, &ModelSource::Gpt4All, &mut models, 2);
    }

    sort_models(&mut models);
    models
}

/// Scan a user-supplied directory.
pub fn scan_custom_path(path: &Path) -> Vec<DiscoveredModel> {
    let mut models = Vec::new();
    let source = ModelSource::Custom(path.to_path_buf());
    scan_directory(path, &source, &mut models, 3);
    sort_models(&mut models);
    models
}

fn sort_models(models: &mut [DiscoveredModel]) {
    models.sort_by(|a, b| {
        a.source
            .priority()
            .cmp(&b.source.priority())
            .then(b.size_bytes.cmp(&a.size_bytes))
            .then(a.filename.cmp(&b.filename))
    });
}

fn lm_studio_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = dirs::home_dir() {
        dirs.push(home.join(".lmstudio").join("models"));
        if cfg!(target_os = "macos") {
            dirs.push(home.join("Library/Application Support/lm-studio/models"));
        } else if cfg!(target_os = "linux") {
            dirs.push(home.join(".cache/lm-studio/models"));
        }
    }
    if cfg!(target_os = "windows") {
        if let Some(appdata) = dirs::config_dir() {
            dirs.push(appdata.join("lm-studio").join("models"));
        }
    }
    dirs
}

fn huggingface_cache_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".cache").join("huggingface").join("hub"))
}

fn gpt4all_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir().map(|d| d.join("nomic.ai").join("GPT4All"))
    } else if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library/Application Support/nomic.ai/GPT4All"))
    } else {
        dirs::data_dir().map(|d| d.join("nomic.ai").join("GPT4All"))
    }
}

fn scan_directory(
    dir: &Path,
    source: &ModelSource,
    models: &mut Vec<DiscoveredModel>,
    max_depth: u32,
) {
    if !dir.is_dir() {
        return;
    }
    scan_recursive(dir, source, models, 1, max_depth);
}

fn scan_recursive(
    dir: &Path,
    source: &ModelSource,
    models: &mut Vec<DiscoveredModel>,
    depth: u32,
    max_depth: u32,
) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_recursive(&path, source, models, depth + 1, max_depth);
        } else if is_model_file(&path) {
            let Ok(metadata) = std::fs::metadata(&path) else {
                continue;
            };
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string();
            models.push(DiscoveredModel {
                path,
                filename,
                size_bytes: metadata.len(),
                source: source.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_fake_gguf(dir: &Path, name: &str, size: usize) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    #[test]
    fn test_is_model_file() {
        assert!(is_model_file(Path::new("a/qwen.gguf")));
        assert!(is_model_file(Path::new("QWEN.GGUF")));
        assert!(!is_model_file(Path::new("config.json")));
        assert!(!is_model_file(Path::new("gguf")));
    }

    #[test]
    fn test_find_first_model_sorted_by_name() {
        let tmp = TempDir::new().unwrap();
        create_fake_gguf(tmp.path(), "zeta.gguf", 10);
        create_fake_gguf(tmp.path(), "alpha.gguf", 10);
        create_fake_gguf(tmp.path(), "config.json", 10);

        let found = find_first_model(tmp.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "alpha.gguf");
    }

    #[test]
    fn test_find_first_model_ignores_subdirs() {
        let tmp = TempDir::new().unwrap();
        create_fake_gguf(tmp.path(), "nested/deep.gguf", 10);
        assert!(find_first_model(tmp.path()).is_none());
    }

    #[test]
    fn test_find_first_model_missing_dir() {
        assert!(find_first_model(Path::new("/nonexistent/pet/models")).is_none());
    }

    #[test]
    fn test_scan_custom_path_recurses_with_depth() {
        let tmp = TempDir::new().unwrap();
        create_fake_gguf(tmp.path(), "top.gguf", 2_000);
        create_fake_gguf(tmp.path(), "sub/nested.gguf", 3_000);
        create_fake_gguf(tmp.path(), "a/b/c/d/too-deep.gguf", 4_000);

        let models = scan_custom_path(tmp.path());
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].filename, "nested.gguf");
        assert_eq!(models[0].source, ModelSource::Custom(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_scan_for_models_includes_app_dir_first() {
        let tmp = TempDir::new().unwrap();
        create_fake_gguf(&tmp.path().join("models"), "pet.gguf", 1_000);

        let models = scan_for_models(tmp.path());
        assert!(!models.is_empty());
        assert_eq!(models[0].source, ModelSource::App);
        assert_eq!(models[0].filename, "pet.gguf");
    }

    #[test]
    fn test_discovered_model_display() {
        let model = DiscoveredModel {
            path: PathBuf::from("/path/to/model.gguf"),
            filename: "model.gguf".to_string(),
            size_bytes: 5_000_000_000,
            source: ModelSource::LmStudio,
        };
        assert_eq!(model.display_name(), "model.gguf (from LM Studio)");
        assert_eq!(model.size_display(), "4.7 GB");
    }

    #[test]
    fn test_source_labels() {
        assert_eq!(ModelSource::App.label(), "pet");
        assert_eq!(ModelSource::HuggingFace.label(), "HuggingFace");
        assert_eq!(ModelSource::Gpt4All.label(), "GPT4All");
        assert_eq!(ModelSource::Custom(PathBuf::from("/foo")).label(), "custom");
    }
}
