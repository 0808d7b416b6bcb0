// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Countdown state machine
//!
//! `Stopped -> Running` on toggle, one `tick()` per second while running,
//! and back to `Stopped` either on completion or on an early toggle. The
//! timer is clock-free: whoever owns it decides when a second has passed.

/// What a toggle or tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEvent {
    /// A session of `minutes` began
    Started { minutes: u32 },
    /// One second elapsed
    Tick { remaining: u32 },
    /// The countdown reached zero and the timer stopped itself
    Completed,
    /// The user stopped the session before it finished
    StoppedEarly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Stopped,
    Running {
        remaining: u32,
    },
}

/// The focus countdown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusTimer {
    state: State,
}

impl FocusTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running { .. })
    }

    /// Seconds left; zero when stopped.
    pub fn remaining(&self) -> u32 {
        match self.state {
            State::Running { remaining } => remaining,
            State::Stopped => 0,
        }
    }

    /// Start a session of `minutes`, or stop the running one early.
    pub fn toggle(&mut self, minutes: u32) -> FocusEvent {
        match self.state {
            State::Running { .. } => {
                self.state = State::Stopped;
                FocusEvent::StoppedEarly
            }
            State::Stopped => {
                self.state = State::Running {
                    remaining: minutes.saturating_mul(60),
                };
                FocusEvent::Started { minutes }
            }
        }
    }

    /// Advance by one second. `None` while stopped.
    pub fn tick(&mut self) -> Option<FocusEvent> {
        let State::Running { remaining } = self.state else {
            return None;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.state = State::Stopped;
            Some(FocusEvent::Completed)
        } else {
            self.state = State::Running { remaining };
            Some(FocusEvent::Tick { remaining })
        }
    }

    /// `MM:SS` of the remaining time.
    pub fn display(&self) -> String {
        format_remaining(self.remaining())
    }
}

/// Render seconds as `MM:SS` (minutes may exceed two digits).
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
