// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HaiXiaoTang desktop pet
//!
//! An animated, draggable, always-on-top sprite that talks through a local
//! GGUF model. This crate exposes the pieces used by the `deskpet` binary:
//! - `pet`: window-agnostic state machine (animation, bubble, input, drag, menu)
//! - `focus`: the Pomodoro-style countdown
//! - `llm`: engine traits, persona prompt, and the `load()`/`chat()` adapter
//! - `chat`: background inference with results polled by the UI
//! - `config`: JSON settings with model path repair
//! - `models`: GGUF discovery
//! - `autostart`: start-with-Windows registration
//! - `gui`: the eframe window

pub mod autostart;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod focus;
pub mod gui;
pub mod llm;
pub mod models;
pub mod pet;
pub mod utils;

pub use error::{PetError, Result};
