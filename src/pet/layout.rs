// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Window and bubble geometry

use eframe::egui::{pos2, vec2, Pos2, Vec2};

/// Source images wider than this are scaled down to it before the user's
/// scale factor applies, so high-resolution art does not fill the screen.
pub const MAX_BASE_WIDTH: f32 = 200.0;

/// Size of the chat input affordance.
pub const CHAT_INPUT_SIZE: Vec2 = vec2(320.0, 40.0);

/// Window is never narrower than the chat input plus a margin.
pub const MIN_WINDOW_WIDTH: f32 = 340.0;

/// Vertical room reserved above the sprite for the bubble.
pub const BUBBLE_ROOM: f32 = 50.0;

pub const BUBBLE_MAX_WIDTH: f32 = 300.0;
pub const BUBBLE_MIN_WIDTH: f32 = 100.0;
pub const BUBBLE_PADDING: f32 = 40.0;

/// Distance of the default window origin from the bottom-right corner.
const DEFAULT_CORNER_OFFSET: f32 = 250.0;

/// On-screen sprite size for an image of `image_size` pixels.
pub fn sprite_size(image_size: [usize; 2], scale: f32) -> Vec2 {
    let [w, h] = image_size;
    let (mut w, mut h) = (w as f32, h as f32);
    if w > MAX_BASE_WIDTH {
        let factor = MAX_BASE_WIDTH / w;
        w *= factor;
        h *= factor;
    }
    vec2((w * scale).floor().max(1.0), (h * scale).floor().max(1.0))
}

/// Window size holding a sprite plus `top_content` height above it.
pub fn window_size(sprite: Vec2, top_content: f32) -> Vec2 {
    vec2(
        sprite.x.max(MIN_WINDOW_WIDTH),
        sprite.y + top_content.max(BUBBLE_ROOM),
    )
}

/// Width and wrapping for a bubble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleLayout {
    pub width: f32,
    pub wrap: bool,
}

/// Short text gets a snug single line; long text wraps at a fixed width.
pub fn bubble_layout(text_width: f32) -> BubbleLayout {
    let width = text_width + BUBBLE_PADDING;
    if width > BUBBLE_MAX_WIDTH {
        BubbleLayout {
            width: BUBBLE_MAX_WIDTH,
            wrap: true,
        }
    } else {
        BubbleLayout {
            width: width.max(BUBBLE_MIN_WIDTH),
            wrap: false,
        }
    }
}

/// Initial window origin near the bottom-right of the screen.
pub fn default_position(screen: Vec2) -> Pos2 {
    pos2(
        (screen.x - DEFAULT_CORNER_OFFSET).max(0.0),
        (screen.y - DEFAULT_CORNER_OFFSET).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_image_keeps_size() {
        assert_eq!(sprite_size([100, 150], 1.0), vec2(100.0, 150.0));
        assert_eq!(sprite_size([100, 150], 2.0), vec2(200.0, 300.0));
    }

    #[test]
    fn test_large_image_capped_then_scaled() {
        assert_eq!(sprite_size([800, 1200], 1.0), vec2(200.0, 300.0));
        assert_eq!(sprite_size([800, 1200], 0.5), vec2(100.0, 150.0));
    }

    #[test]
    fn test_window_fits_chat_input() {
        let size = window_size(vec2(100.0, 100.0), 0.0);
        assert_eq!(size, vec2(MIN_WINDOW_WIDTH, 150.0));
        assert!(size.x >= CHAT_INPUT_SIZE.x);
    }

    #[test]
    fn test_window_grows_with_content() {
        let size = window_size(vec2(400.0, 300.0), 120.0);
        assert_eq!(size, vec2(400.0, 420.0));
    }

    #[test]
    fn test_bubble_layout() {
        assert_eq!(
            bubble_layout(20.0),
            BubbleLayout {
                width: BUBBLE_MIN_WIDTH,
                wrap: false
            }
        );
        assert_eq!(
            bubble_layout(150.0),
            BubbleLayout {
                width: 190.0,
                wrap: false
            }
        );
        assert_eq!(
            bubble_layout(500.0),
            BubbleLayout {
                width: BUBBLE_MAX_WIDTH,
                wrap: true
            }
        );
    }

    #[test]
    fn test_default_position() {
        assert_eq!(default_position(vec2(1920.0, 1080.0)), pos2(1670.0, 830.0));
        assert_eq!(default_position(vec2(100.0, 100.0)), pos2(0.0, 0.0));
    }
}
