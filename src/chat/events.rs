// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

/// Results delivered back to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The pet's answer to one submitted message
    Reply { text: String },
    /// A load or reload finished
    ModelLoaded { ok: bool },
}
