// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Speech bubble state

use std::time::{Duration, Instant};

/// How long a bubble stays up unless told otherwise
pub const BUBBLE_DURATION: Duration = Duration::from_secs(5);

/// Transient speech text above the pet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bubble {
    text: String,
    hide_at: Option<Instant>,
}

impl Bubble {
    /// Show `text` until `now + duration`, replacing whatever was shown.
    pub fn show(&mut self, text: impl Into<String>, duration: Duration, now: Instant) {
        self.text = text.into();
        self.hide_at = Some(now + duration);
    }

    pub fn hide(&mut self) {
        self.hide_at = None;
    }

    pub fn is_visible(&self) -> bool {
        self.hide_at.is_some()
    }

    /// Text of the visible bubble.
    pub fn text(&self) -> Option<&str> {
        self.hide_at.map(|_| self.text.as_str())
    }

    pub fn hide_at(&self) -> Option<Instant> {
        self.hide_at
    }

    /// Hide the bubble if it has expired. Returns true if it was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(at) if now >= at => {
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_and_expire() {
        let t0 = Instant::now();
        let mut bubble = Bubble::default();
        assert!(!bubble.is_visible());

        bubble.show("你好", BUBBLE_DURATION, t0);
        assert_eq!(bubble.text(), Some("你好"));
        assert!(!bubble.expire(t0 + Duration::from_secs(4)));
        assert!(bubble.expire(t0 + BUBBLE_DURATION));
        assert_eq!(bubble.text(), None);
    }

    #[test]
    fn test_new_text_restarts_timer() {
        let t0 = Instant::now();
        let mut bubble = Bubble::default();
        bubble.show("一", BUBBLE_DURATION, t0);
        bubble.show("二", BUBBLE_DURATION, t0 + Duration::from_secs(4));
        assert!(!bubble.expire(t0 + Duration::from_secs(6)));
        assert_eq!(bubble.text(), Some("二"));
    }

    #[test]
    fn test_hide() {
        let mut bubble = Bubble::default();
        bubble.show("x", BUBBLE_DURATION, Instant::now());
        bubble.hide();
        assert!(!bubble.is_visible());
    }
}
