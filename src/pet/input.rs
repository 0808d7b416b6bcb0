// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat input affordance state

pub const INPUT_PLACEHOLDER: &str = "想对我说什么？(回车发送)";

/// The one-line text entry shown over the pet's head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatInput {
    open: bool,
    /// Text being edited; the GUI binds its text field to this
    pub text: String,
}

impl ChatInput {
    pub fn open(&mut self) {
        self.open = true;
        self.text.clear();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Close and return the trimmed text, if any.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.text.trim().to_string();
        self.close();
        (!text.is_empty()).then_some(text)
    }

    /// Close and discard the text.
    pub fn close(&mut self) {
        self.open = false;
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims() {
        let mut input = ChatInput::default();
        input.open();
        input.text.push_str("  你好呀  ");
        assert_eq!(input.submit(), Some("你好呀".to_string()));
        assert!(!input.is_open());
        assert!(input.text.is_empty());
    }

    #[test]
    fn test_blank_submit_is_none() {
        let mut input = ChatInput::default();
        input.open();
        input.text.push_str("   ");
        assert_eq!(input.submit(), None);
        assert!(!input.is_open());
    }

    #[test]
    fn test_open_clears_stale_text() {
        let mut input = ChatInput::default();
        input.text.push_str("leftover");
        input.open();
        assert!(input.text.is_empty());
    }
}
