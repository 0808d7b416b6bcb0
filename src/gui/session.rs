// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Window-independent state behind the pet window
//!
//! Owns the settings, the pet controller, the chat orchestrator and the
//! auto-start hook, and wires them together. The eframe app only draws
//! and forwards input.

use std::sync::Arc;
use std::time::Instant;

use crate::autostart::{self, AutoStart};
use crate::chat::{ChatEvent, ChatOrchestrator};
use crate::config::{repair_model_path, RepairOutcome, Settings, SettingsStore};
use crate::llm::{EngineLoader, InferenceAdapter, Persona};
use crate::pet::{PetController, PetEvent};

/// Adapter for the model and persona configured under `store`'s app root.
pub fn adapter_for(store: &SettingsStore, settings: &Settings, loader: Arc<dyn EngineLoader>) -> InferenceAdapter {
    let app_root = store.app_root();
    InferenceAdapter::new(
        loader,
        settings.resolved_model_path(app_root),
        Persona::load(app_root),
    )
}

/// What the window must change after new settings were applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppliedSettings {
    pub display_mode_changed: bool,
    pub model_reloading: bool,
}

pub struct PetSession {
    store: SettingsStore,
    settings: Settings,
    pet: PetController,
    chat: ChatOrchestrator,
    auto_start: Option<Box<dyn AutoStart>>,
}

impl PetSession {
    pub fn new(
        store: SettingsStore,
        settings: Settings,
        chat: ChatOrchestrator,
        auto_start: Option<Box<dyn AutoStart>>,
        now: Instant,
    ) -> Self {
        Self {
            pet: PetController::new(&settings, now),
            store,
            settings,
            chat,
            auto_start,
        }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pet(&self) -> &PetController {
        &self.pet
    }

    pub fn pet_mut(&mut self) -> &mut PetController {
        &mut self.pet
    }

    pub fn chat(&self) -> &ChatOrchestrator {
        &self.chat
    }

    /// Feed finished chat work into the pet, then fire its timers.
    pub fn handle_events(&mut self, now: Instant) {
        for event in self.chat.poll() {
            match event {
                ChatEvent::Reply { text } => self.pet.on_reply(&text, now),
                ChatEvent::ModelLoaded { ok } => self.pet.on_model_loaded(ok, now),
            }
        }

        for event in self.pet.tick(now) {
            match event {
                PetEvent::LoadModel => self.chat.load_model(),
                PetEvent::FocusCompleted => {
                    tracing::info!(target: "deskpet.gui", minutes = self.pet.focus_minutes(), "Focus session completed");
                }
            }
        }
    }

    /// Enter pressed in the chat input.
    pub fn submit_input(&mut self, now: Instant) {
        if let Some(text) = self.pet.submit_input(now) {
            self.chat.submit(text);
        }
    }

    /// Save settings from the dialog and put them into effect.
    ///
    /// The model path is repaired the same way as at startup, so a blank
    /// or stale path picks up a model from the models directory. Only an
    /// auto-detected path is written back in its repaired form.
    pub fn apply_settings(&mut self, settings: Settings) -> AppliedSettings {
        let settings = settings.sanitized();
        let mut repaired = settings.clone();
        let outcome = repair_model_path(&mut repaired, self.store.app_root(), &self.store.models_dir());
        tracing::debug!(target: "deskpet.gui", ?outcome, "Repaired model path from settings window");

        let to_save = if outcome.needs_save() { &repaired } else { &settings };
        if let Err(e) = self.store.save(to_save) {
            tracing::warn!(target: "deskpet.gui", "Failed to save settings: {}", e);
        }
        if let Some(auto_start) = &self.auto_start {
            autostart::apply(auto_start.as_ref(), repaired.auto_start);
        }

        let applied = AppliedSettings {
            display_mode_changed: repaired.display_mode != self.settings.display_mode,
            model_reloading: repaired.model_path != self.settings.model_path,
        };
        self.pet.apply_settings(&repaired);
        self.settings = repaired;

        if applied.model_reloading {
            let path = self.settings.resolved_model_path(self.store.app_root());
            if outcome == RepairOutcome::Missing {
                tracing::warn!(target: "deskpet.gui", model = %path.display(), "No model found, unloading");
            } else {
                tracing::info!(target: "deskpet.gui", model = %path.display(), "Model path changed, reloading");
            }
            self.chat.reload_model(path);
        }
        applied
    }
}
