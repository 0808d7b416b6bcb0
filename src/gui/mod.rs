// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Desktop window for the pet
//!
//! A transparent, undecorated eframe window that hosts the sprite, the
//! bubble and the chat input, plus a separate settings window.

mod app;
pub mod fonts;
pub mod session;
pub mod settings_window;
pub mod textures;

use eframe::egui::{ViewportBuilder, WindowLevel};

use crate::config::{DisplayMode, SettingsStore};
use crate::error::Result;
use crate::pet::layout::MIN_WINDOW_WIDTH;

pub use app::PetApp;

const APP_ID: &str = "deskpet";
const WINDOW_TITLE: &str = "HaiXiaoTang";

/// Window stacking for a display mode.
pub fn window_level(mode: DisplayMode) -> WindowLevel {
    match mode {
        DisplayMode::Top => WindowLevel::AlwaysOnTop,
        DisplayMode::Normal => WindowLevel::Normal,
        DisplayMode::Bottom => WindowLevel::AlwaysOnBottom,
    }
}

/// Open the pet window and block until it is closed.
pub fn run(store: SettingsStore) -> Result<()> {
    let (settings, outcome) = store.load_repaired();
    tracing::debug!(target: "deskpet.gui", ?outcome, config = %store.path().display(), "Settings loaded");

    let viewport = ViewportBuilder::default()
        .with_title(WINDOW_TITLE)
        .with_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_WIDTH])
        .with_transparent(true)
        .with_decorations(false)
        .with_resizable(false)
        .with_taskbar(false)
        .with_window_level(window_level(settings.display_mode));

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_ID,
        options,
        Box::new(move |cc| Ok(Box::new(PetApp::new(cc, store, settings)?))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_level_per_mode() {
        assert_eq!(window_level(DisplayMode::Top), WindowLevel::AlwaysOnTop);
        assert_eq!(window_level(DisplayMode::Normal), WindowLevel::Normal);
        assert_eq!(window_level(DisplayMode::Bottom), WindowLevel::AlwaysOnBottom);
    }
}
