// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Sprite textures
//!
//! A missing or broken frame never blanks the pet: the last good texture
//! stays up, and with nothing shown yet `default.png` or a drawn
//! placeholder is used instead.

use std::path::{Path, PathBuf};

use eframe::egui::{Color32, ColorImage, Context, TextureHandle, TextureOptions};

use crate::error::{PetError, Result};
use crate::pet::DEFAULT_FRAME;

/// Side length of the placeholder image
pub const PLACEHOLDER_SIZE: usize = 100;
const PLACEHOLDER_RADIUS: f32 = 40.0;

pub fn load_color_image(path: &Path) -> Result<ColorImage> {
    let image = image::open(path)
        .map_err(|e| PetError::Gui(format!("cannot load {}: {}", path.display(), e)))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

/// Transparent square with a cyan disc in the middle.
pub fn placeholder_image() -> ColorImage {
    let center = PLACEHOLDER_SIZE as f32 / 2.0;
    let mut pixels = Vec::with_capacity(PLACEHOLDER_SIZE * PLACEHOLDER_SIZE);
    for y in 0..PLACEHOLDER_SIZE {
        for x in 0..PLACEHOLDER_SIZE {
            let dx = x as f32 + 0.5 - center;
            let dy = y as f32 + 0.5 - center;
            pixels.push(if dx * dx + dy * dy <= PLACEHOLDER_RADIUS * PLACEHOLDER_RADIUS {
                Color32::from_rgb(0, 255, 255)
            } else {
                Color32::TRANSPARENT
            });
        }
    }
    ColorImage {
        size: [PLACEHOLDER_SIZE, PLACEHOLDER_SIZE],
        pixels,
    }
}

/// The texture currently on screen plus the frame name it stands for
pub struct SpriteTextures {
    image_dir: PathBuf,
    frame: String,
    current: Option<TextureHandle>,
}

impl SpriteTextures {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            frame: String::new(),
            current: None,
        }
    }

    /// Texture to draw for `frame`.
    ///
    /// Each frame name is loaded once; a failed load is not retried until
    /// a different frame has been requested in between.
    pub fn get(&mut self, ctx: &Context, frame: &str) -> TextureHandle {
        if let Some(current) = self.current.as_ref().filter(|_| self.frame == frame) {
            return current.clone();
        }

        let texture = match load_color_image(&self.image_dir.join(frame)) {
            Ok(image) => Some(ctx.load_texture(frame, image, TextureOptions::LINEAR)),
            Err(e) => {
                tracing::warn!(target: "deskpet.gui", "{}", e);
                None
            }
        };

        let texture = texture
            .or_else(|| self.current.clone())
            .unwrap_or_else(|| self.fallback(ctx));
        self.frame = frame.to_string();
        self.current = Some(texture.clone());
        texture
    }

    fn fallback(&self, ctx: &Context) -> TextureHandle {
        let image = load_color_image(&self.image_dir.join(DEFAULT_FRAME)).unwrap_or_else(|e| {
            tracing::warn!(target: "deskpet.gui", "{}, drawing placeholder", e);
            placeholder_image()
        });
        ctx.load_texture(DEFAULT_FRAME, image, TextureOptions::LINEAR)
    }
}
