// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Focus (Pomodoro) countdown

pub mod timer;

pub use timer::{format_remaining, FocusEvent, FocusTimer};
