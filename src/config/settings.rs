// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for the pet
//!
//! Settings live in `<app_root>/models/config.json` as a flat JSON object:
//!
//! ```json
//! {
//!     "pet_scale": 1.0,
//!     "pet_opacity": 1.0,
//!     "model_path": "models/qwen1_5-0_5b-chat-q4_k_m.gguf",
//!     "display_mode": "top",
//!     "auto_start": false,
//!     "focus_minutes": 25
//! }
//! ```
//!
//! Missing keys and keys holding a value of the wrong type take their
//! defaults. Saving always rewrites the whole file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::utils::absolutize;

mod io;
mod repair;
mod validation;

pub use io::SettingsStore;
pub use repair::{repair_model_path, RepairOutcome};
pub use validation::{FOCUS_MINUTES_RANGE, OPACITY_RANGE, SCALE_RANGE};

/// Directory (relative to the app root) holding the config file and models.
pub const MODELS_DIR_NAME: &str = "models";

/// Config file name inside [`MODELS_DIR_NAME`].
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Sprite scale factor applied on top of the capped base size
    #[serde(default = "default_scale")]
    pub pet_scale: f32,

    /// Opacity of the sprite and bubble
    #[serde(default = "default_opacity")]
    pub pet_opacity: f32,

    /// Path to the GGUF model file (absolute, or relative to the app root)
    #[serde(default)]
    pub model_path: PathBuf,

    /// Window stacking level
    #[serde(default)]
    pub display_mode: DisplayMode,

    /// Register the pet to start with the OS session
    #[serde(default)]
    pub auto_start: bool,

    /// Length of a focus session in minutes
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
}

/// How the pet window stacks against other windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Always above other windows
    #[default]
    Top,
    /// Ordinary window stacking
    Normal,
    /// Pinned to the desktop, below other windows
    Bottom,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 3] = [DisplayMode::Top, DisplayMode::Normal, DisplayMode::Bottom];

    /// Label shown in the settings window.
    pub fn label(&self) -> &'static str {
        match self {
            DisplayMode::Top => "显示在最上层",
            DisplayMode::Normal => "仅在非全屏模式显示",
            DisplayMode::Bottom => "仅在桌面显示",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Top => "top",
            DisplayMode::Normal => "normal",
            DisplayMode::Bottom => "bottom",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_scale() -> f32 {
    1.0
}

fn default_opacity() -> f32 {
    1.0
}

fn default_focus_minutes() -> u32 {
    25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pet_scale: default_scale(),
            pet_opacity: default_opacity(),
            model_path: PathBuf::new(),
            display_mode: DisplayMode::default(),
            auto_start: false,
            focus_minutes: default_focus_minutes(),
        }
    }
}

impl Settings {
    /// Whether a model path has been recorded at all.
    pub fn has_model_path(&self) -> bool {
        !self.model_path.as_os_str().is_empty()
    }

    /// The model file to load: the recorded path resolved against
    /// `app_root`, or an empty path when none is recorded.
    pub fn resolved_model_path(&self, app_root: &Path) -> PathBuf {
        if self.has_model_path() {
            absolutize(&self.model_path, app_root)
        } else {
            PathBuf::new()
        }
    }
}
