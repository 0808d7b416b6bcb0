// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sprite frame names
//!
//! Frames are PNG files in `<app_root>/image/`. The controller only deals
//! in file names; the GUI turns them into textures.

use std::path::{Path, PathBuf};

use rand::seq::IndexedRandom;
use rand::Rng;

/// Directory (relative to the app root) holding sprite images.
pub const IMAGE_DIR_NAME: &str = "image";

/// Frame shown before the first idle pick and when a frame fails to load.
pub const DEFAULT_FRAME: &str = "default.png";

/// Idle frame that triggers the easter-egg greeting.
pub const EASTER_EGG_FRAME: &str = "3.png";

/// Greeting shown when [`EASTER_EGG_FRAME`] comes up.
pub const EASTER_EGG_LINE: &str = "Ciallo～(∠・ω< )⌒★";

const IDLE_FRAMES: [&str; 7] = ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png", "7.png"];
const CHAT_FRAMES: [&str; 2] = ["9.png", "12.png"];

/// The frame sets the pet animates through
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSet {
    idle: Vec<String>,
    chat: Vec<String>,
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self {
            idle: IDLE_FRAMES.iter().map(|s| s.to_string()).collect(),
            chat: CHAT_FRAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SpriteSet {
    pub fn idle_frames(&self) -> &[String] {
        &self.idle
    }

    pub fn chat_frames(&self) -> &[String] {
        &self.chat
    }

    pub fn random_idle<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.idle.choose(rng).map(String::as_str).unwrap_or(DEFAULT_FRAME)
    }

    pub fn random_chat<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.chat.choose(rng).map(String::as_str).unwrap_or(DEFAULT_FRAME)
    }
}

/// Whether showing `frame` should trigger the easter-egg greeting.
pub fn is_easter_egg(frame: &str) -> bool {
    frame == EASTER_EGG_FRAME
}

/// Absolute path of a frame file.
pub fn frame_path(app_root: &Path, frame: &str) -> PathBuf {
    app_root.join(IMAGE_DIR_NAME).join(frame)
}
