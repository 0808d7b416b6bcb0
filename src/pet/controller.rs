// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The pet's state machine
//!
//! Owns the animation mode, current frame, bubble, chat input, drag state,
//! focus countdown and every UI-side timer. Time is passed in explicitly,
//! so the whole thing runs (and is tested) without a window.

use std::time::{Duration, Instant};

use eframe::egui::Pos2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bubble::{Bubble, BUBBLE_DURATION};
use super::drag::DragState;
use super::input::ChatInput;
use super::menu::{menu_entries, MenuAction, MenuEntry, MenuOutcome};
use super::sprites::{is_easter_egg, SpriteSet, EASTER_EGG_LINE};
use crate::config::Settings;
use crate::focus::{FocusEvent, FocusTimer};

/// Time between idle frame changes
pub const IDLE_INTERVAL: Duration = Duration::from_secs(10);
/// Delay after a reply before idle animation resumes
pub const REPLY_RESUME_DELAY: Duration = Duration::from_secs(3);
/// How long the focus start message stays up
pub const FOCUS_START_BUBBLE: Duration = Duration::from_secs(3);
/// Celebration length after a completed focus session
pub const CELEBRATION_DURATION: Duration = Duration::from_secs(5);
/// Delay between startup and the model load request
pub const MODEL_LOAD_DELAY: Duration = Duration::from_secs(1);

const FOCUS_TICK: Duration = Duration::from_secs(1);

pub const MODEL_READY_LINE: &str = "我醒啦！随时可以找我聊天哦~";
pub const MODEL_MISSING_LINE: &str = "找不到大脑(模型)... 请在设置里检查路径。";
pub const FOCUS_STOPPED_LINE: &str = "专注结束啦！要注意劳逸结合哦~";
pub const FOCUS_DONE_LINE: &str = "好棒！专注目标达成！✿✿ヽ(°▽°)ノ✿";
pub const EMPTY_REPLY_LINE: &str = "...";

/// Which frame set drives the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetMode {
    Idle,
    Chatting,
    FocusActive,
}

/// Something the shell must act on after [`PetController::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetEvent {
    /// Start loading the model in the background
    LoadModel,
    /// A focus session just finished
    FocusCompleted,
}

pub struct PetController {
    mode: PetMode,
    sprites: SpriteSet,
    frame: String,
    bubble: Bubble,
    input: ChatInput,
    drag: DragState,
    focus: FocusTimer,
    focus_minutes: u32,
    next_idle_at: Option<Instant>,
    resume_at: Option<Instant>,
    focus_tick_at: Option<Instant>,
    load_model_at: Option<Instant>,
    rng: StdRng,
}

impl PetController {
    pub fn new(settings: &Settings, now: Instant) -> Self {
        Self::with_rng(settings, now, StdRng::from_os_rng())
    }

    /// Controller with a fixed random source, for reproducible frame picks.
    pub fn with_rng(settings: &Settings, now: Instant, rng: StdRng) -> Self {
        let mut controller = Self {
            mode: PetMode::Idle,
            sprites: SpriteSet::default(),
            frame: super::sprites::DEFAULT_FRAME.to_string(),
            bubble: Bubble::default(),
            input: ChatInput::default(),
            drag: DragState::default(),
            focus: FocusTimer::new(),
            focus_minutes: settings.focus_minutes,
            next_idle_at: Some(now + IDLE_INTERVAL),
            resume_at: None,
            focus_tick_at: None,
            load_model_at: Some(now + MODEL_LOAD_DELAY),
            rng,
        };
        controller.next_idle_frame(now);
        controller
    }

    pub fn seeded(settings: &Settings, now: Instant, seed: u64) -> Self {
        Self::with_rng(settings, now, StdRng::seed_from_u64(seed))
    }

    // ----- accessors -----

    pub fn mode(&self) -> PetMode {
        self.mode
    }

    /// File name of the frame to show.
    pub fn frame(&self) -> &str {
        &self.frame
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }

    pub fn bubble_text(&self) -> Option<&str> {
        self.bubble.text()
    }

    pub fn input(&self) -> &ChatInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut ChatInput {
        &mut self.input
    }

    pub fn focus(&self) -> &FocusTimer {
        &self.focus
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Earliest pending deadline, so the shell knows when to wake up.
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.next_idle_at.filter(|_| self.mode != PetMode::Chatting),
            self.resume_at,
            self.focus_tick_at,
            self.load_model_at,
            self.bubble.hide_at(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ----- timers -----

    /// Fire every timer that is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<PetEvent> {
        let mut events = Vec::new();

        if self.load_model_at.is_some_and(|at| now >= at) {
            self.load_model_at = None;
            events.push(PetEvent::LoadModel);
        }

        while let Some(at) = self.focus_tick_at {
            if now < at {
                break;
            }
            self.focus_tick_at = Some(at + FOCUS_TICK);
            if let Some(FocusEvent::Completed) = self.focus.tick() {
                self.focus_tick_at = None;
                self.celebrate_focus(now);
                events.push(PetEvent::FocusCompleted);
            }
        }

        self.bubble.expire(now);

        if self.resume_at.is_some_and(|at| now >= at) {
            self.resume_idle(now);
        }

        if self.mode != PetMode::Chatting && self.next_idle_at.is_some_and(|at| now >= at) {
            self.next_idle_at = Some(now + IDLE_INTERVAL);
            self.next_idle_frame(now);
        }

        events
    }

    // ----- bubble -----

    pub fn show_bubble(&mut self, text: impl Into<String>, duration: Duration, now: Instant) {
        self.bubble.show(text, duration, now);
    }

    pub fn hide_bubble(&mut self) {
        self.bubble.hide();
    }

    // ----- chat -----

    /// Double-click or "Chat": switch to a chat frame and open the input.
    pub fn open_chat(&mut self, _now: Instant) {
        self.mode = PetMode::Chatting;
        self.frame = self.sprites.random_chat(&mut self.rng).to_string();
        self.next_idle_at = None;
        self.resume_at = None;
        self.bubble.hide();
        self.input.open();
    }

    /// Enter pressed: returns the text to send, if any.
    pub fn submit_input(&mut self, now: Instant) -> Option<String> {
        let text = self.input.submit();
        if text.is_none() {
            self.resume_idle(now);
        }
        text
    }

    /// Escape pressed or the input lost focus.
    pub fn cancel_input(&mut self, now: Instant) {
        if !self.input.is_open() {
            return;
        }
        self.input.close();
        self.resume_idle(now);
    }

    /// A reply from the model arrived.
    pub fn on_reply(&mut self, text: &str, now: Instant) {
        let text = if text.trim().is_empty() {
            EMPTY_REPLY_LINE
        } else {
            text
        };
        self.bubble.show(text, BUBBLE_DURATION, now);
        self.resume_at = Some(now + REPLY_RESUME_DELAY);
    }

    pub fn on_model_loaded(&mut self, ok: bool, now: Instant) {
        let line = if ok {
            MODEL_READY_LINE
        } else {
            MODEL_MISSING_LINE
        };
        self.bubble.show(line, BUBBLE_DURATION, now);
    }

    // ----- focus -----

    pub fn toggle_focus(&mut self, now: Instant) -> FocusEvent {
        let event = self.focus.toggle(self.focus_minutes);
        match event {
            FocusEvent::Started { minutes } => {
                self.focus_tick_at = Some(now + FOCUS_TICK);
                if self.mode == PetMode::Idle {
                    self.mode = PetMode::FocusActive;
                }
                self.bubble.show(
                    format!("开始专注！加油坚持 {} 分钟哦！", minutes),
                    FOCUS_START_BUBBLE,
                    now,
                );
            }
            FocusEvent::StoppedEarly => {
                self.focus_tick_at = None;
                if self.mode == PetMode::FocusActive {
                    self.mode = PetMode::Idle;
                }
                self.bubble.show(FOCUS_STOPPED_LINE, BUBBLE_DURATION, now);
            }
            FocusEvent::Tick { .. } | FocusEvent::Completed => {}
        }
        event
    }

    fn celebrate_focus(&mut self, now: Instant) {
        self.bubble.show(FOCUS_DONE_LINE, BUBBLE_DURATION, now);
        self.mode = PetMode::Chatting;
        self.frame = self.sprites.random_chat(&mut self.rng).to_string();
        self.next_idle_at = None;
        self.resume_at = Some(now + CELEBRATION_DURATION);
    }

    // ----- idle -----

    /// Back to idle animation (or focus, if a session is running).
    ///
    /// Stays in `Chatting` while the input is open; closing the input
    /// resumes again.
    pub fn resume_idle(&mut self, now: Instant) {
        self.resume_at = None;
        if self.input.is_open() {
            return;
        }
        self.mode = if self.focus.is_running() {
            PetMode::FocusActive
        } else {
            PetMode::Idle
        };
        self.next_idle_at = Some(now + IDLE_INTERVAL);
        self.next_idle_frame(now);
    }

    fn next_idle_frame(&mut self, now: Instant) {
        let frame = self.sprites.random_idle(&mut self.rng).to_string();
        if is_easter_egg(&frame) {
            self.bubble.show(EASTER_EGG_LINE, BUBBLE_DURATION, now);
        }
        self.frame = frame;
    }

    // ----- dragging -----

    pub fn press(&mut self, pointer: Pos2, window_origin: Pos2) {
        self.drag.press(pointer, window_origin);
    }

    /// New window origin while dragging.
    pub fn drag_to(&self, pointer: Pos2) -> Option<Pos2> {
        self.drag.drag_to(pointer)
    }

    pub fn release(&mut self) {
        self.drag.release();
    }

    // ----- menu & settings -----

    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        menu_entries(self.focus.is_running())
    }

    pub fn activate(&mut self, action: MenuAction, now: Instant) -> MenuOutcome {
        match action {
            MenuAction::Chat => {
                self.open_chat(now);
                MenuOutcome::Handled
            }
            MenuAction::ToggleFocus => {
                self.toggle_focus(now);
                MenuOutcome::Handled
            }
            MenuAction::Settings => MenuOutcome::OpenSettings,
            MenuAction::Quit => MenuOutcome::Quit,
        }
    }

    /// Pick up changed settings. A running focus session keeps its length.
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.focus_minutes = settings.focus_minutes;
    }
}
