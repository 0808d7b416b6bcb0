// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Configuration module for the pet
//!
//! Handles loading, saving, validating and auto-repairing user settings.

pub mod settings;

pub use settings::*;
