// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Window dragging
//!
//! Press records where inside the window the pointer grabbed it; every
//! move puts the window back under the pointer at that same offset. No
//! inertia or snapping.

use eframe::egui::{Pos2, Vec2};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    offset: Option<Vec2>,
}

impl DragState {
    /// Start dragging. Both positions are in screen coordinates.
    pub fn press(&mut self, pointer: Pos2, window_origin: Pos2) {
        self.offset = Some(pointer - window_origin);
    }

    /// New window origin for the pointer position, if dragging.
    pub fn drag_to(&self, pointer: Pos2) -> Option<Pos2> {
        self.offset.map(|offset| pointer - offset)
    }

    pub fn release(&mut self) {
        self.offset = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.offset.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn test_not_dragging_by_default() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert_eq!(drag.drag_to(pos2(10.0, 10.0)), None);
    }

    #[test]
    fn test_keeps_grab_offset() {
        let mut drag = DragState::default();
        drag.press(pos2(1050.0, 820.0), pos2(1000.0, 800.0));
        assert_eq!(drag.drag_to(pos2(500.0, 300.0)), Some(pos2(450.0, 280.0)));
        assert_eq!(drag.drag_to(pos2(1050.0, 820.0)), Some(pos2(1000.0, 800.0)));
    }

    #[test]
    fn test_release_stops() {
        let mut drag = DragState::default();
        drag.press(pos2(5.0, 5.0), pos2(0.0, 0.0));
        drag.release();
        assert!(!drag.is_dragging());
        assert_eq!(drag.drag_to(pos2(50.0, 50.0)), None);
    }
}
