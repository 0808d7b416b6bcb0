// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Background chat and model loading
//!
//! The UI thread never blocks on inference. Requests go to a small tokio
//! runtime, results come back as [`ChatEvent`]s the UI drains each frame.

mod events;
mod orchestrator;

pub use events::ChatEvent;
pub use orchestrator::{ChatOrchestrator, Waker};
