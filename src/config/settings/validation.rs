// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::ops::RangeInclusive;

use super::Settings;

/// Allowed sprite scale factors (the settings slider covers 0.2x - 5.0x).
pub const SCALE_RANGE: RangeInclusive<f32> = 0.2..=5.0;

/// Allowed opacity values.
pub const OPACITY_RANGE: RangeInclusive<f32> = 0.2..=1.0;

/// Allowed focus session lengths in minutes.
pub const FOCUS_MINUTES_RANGE: RangeInclusive<u32> = 1..=180;

impl Settings {
    /// Clamp every numeric field into its valid range.
    ///
    /// Non-finite floats fall back to the default value. Returns true when
    /// anything was changed.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        self.pet_scale = clamp_f32(self.pet_scale, &SCALE_RANGE, 1.0);
        self.pet_opacity = clamp_f32(self.pet_opacity, &OPACITY_RANGE, 1.0);
        self.focus_minutes = self
            .focus_minutes
            .clamp(*FOCUS_MINUTES_RANGE.start(), *FOCUS_MINUTES_RANGE.end());

        let changed = *self != before;
        if changed {
            tracing::debug!(
                target: "deskpet.settings",
                scale = self.pet_scale,
                opacity = self.pet_opacity,
                focus_minutes = self.focus_minutes,
                "Clamped out-of-range settings"
            );
        }
        changed
    }

    /// Return a sanitized copy.
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }
}

fn clamp_f32(value: f32, range: &RangeInclusive<f32>, fallback: f32) -> f32 {
    if !value.is_finite() {
        return fallback;
    }
    value.clamp(*range.start(), *range.end())
}
