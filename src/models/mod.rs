// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model file discovery

pub mod scanner;

pub use scanner::{find_first_model, scan_custom_path, scan_for_models, DiscoveredModel, ModelSource};
