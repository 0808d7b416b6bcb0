// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The pet: animation, bubble, chat input, dragging and the context menu.
//!
//! Everything here is window-agnostic. The GUI shell feeds pointer and
//! clock input into [`PetController`] and draws whatever it reports.

pub mod bubble;
pub mod controller;
pub mod drag;
pub mod input;
pub mod layout;
pub mod menu;
pub mod sprites;

pub use bubble::{Bubble, BUBBLE_DURATION};
pub use controller::{PetController, PetEvent, PetMode};
pub use drag::DragState;
pub use input::{ChatInput, INPUT_PLACEHOLDER};
pub use menu::{MenuAction, MenuEntry, MenuOutcome};
pub use sprites::{frame_path, SpriteSet, DEFAULT_FRAME, IMAGE_DIR_NAME};
