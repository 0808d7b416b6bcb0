// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Right-click context menu

/// An action the context menu can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Chat,
    ToggleFocus,
    Settings,
    Quit,
}

/// One row of the context menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item { action: MenuAction, label: &'static str },
    Separator,
}

/// What the shell has to do after a menu action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The controller handled it
    Handled,
    OpenSettings,
    Quit,
}

/// Menu rows; the focus label depends on whether a session is running.
pub fn menu_entries(focus_running: bool) -> Vec<MenuEntry> {
    let focus_label = if focus_running { "结束专注" } else { "开启专注" };
    vec![
        MenuEntry::Item {
            action: MenuAction::Chat,
            label: "聊天",
        },
        MenuEntry::Separator,
        MenuEntry::Item {
            action: MenuAction::ToggleFocus,
            label: focus_label,
        },
        MenuEntry::Item {
            action: MenuAction::Settings,
            label: "设置",
        },
        MenuEntry::Item {
            action: MenuAction::Quit,
            label: "退出",
        },
    ]
}
