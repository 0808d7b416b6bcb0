// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! The `load()` / `chat(text)` boundary
//!
//! Nothing past this point returns an error: load reports success as a
//! bool and chat always produces something the pet can say.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::engine::{ChatEngine, EngineLoader, LoadConfig, SamplingParams};
use super::prompt::{clean_reply, Persona};
use crate::error::{PetError, Result};

/// Reply when no model is loaded.
pub const MODEL_UNAVAILABLE_REPLY: &str = "呜呜...大脑死机了(模型加载失败，请检查环境)";

/// Prefix of the reply when the engine fails mid-chat.
pub const CHAT_FAILED_PREFIX: &str = "我想不出来了...";

/// Thread-safe wrapper around one engine.
///
/// A single mutex guards the engine, so at most one inference call runs at
/// a time; concurrent callers wait their turn.
pub struct InferenceAdapter {
    loader: Arc<dyn EngineLoader>,
    model_path: Mutex<PathBuf>,
    engine: Mutex<Option<Box<dyn ChatEngine>>>,
    persona: Persona,
    load_config: LoadConfig,
    params: SamplingParams,
}

impl InferenceAdapter {
    pub fn new(loader: Arc<dyn EngineLoader>, model_path: impl Into<PathBuf>, persona: Persona) -> Self {
        Self {
            loader,
            model_path: Mutex::new(model_path.into()),
            engine: Mutex::new(None),
            persona,
            load_config: LoadConfig::conservative(),
            params: SamplingParams::pet_reply(),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        lock(&self.model_path).clone()
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.engine).is_some()
    }

    /// Load the model at the current path. Never panics or errors.
    pub fn load(&self) -> bool {
        let path = self.model_path();
        match self.try_load(&path) {
            Ok(()) => {
                tracing::info!(
                    target: "deskpet.llm",
                    backend = self.loader.name(),
                    model = %path.display(),
                    "Model loaded"
                );
                true
            }
            Err(e) => {
                tracing::warn!(target: "deskpet.llm", model = %path.display(), "Failed to load model: {}", e);
                false
            }
        }
    }

    /// Switch to a different model file and load it.
    ///
    /// The previous engine is dropped first, so a failed reload leaves the
    /// adapter unloaded rather than silently answering with the old model.
    pub fn reload(&self, path: impl Into<PathBuf>) -> bool {
        *lock(&self.model_path) = path.into();
        lock(&self.engine).take();
        self.load()
    }

    fn try_load(&self, path: &Path) -> Result<()> {
        if path.as_os_str().is_empty() {
            return Err(PetError::Model("no model path configured".to_string()));
        }
        if !path.is_file() {
            return Err(PetError::Model(format!("model not found at {}", path.display())));
        }

        let mut slot = lock(&self.engine);
        *slot = None;
        let engine = self.loader.load(path, &self.load_config)?;
        *slot = Some(engine);
        Ok(())
    }

    /// Reply to `text` in character. Never errors.
    pub fn chat(&self, text: &str) -> String {
        let mut slot = lock(&self.engine);
        let Some(engine) = slot.as_mut() else {
            return MODEL_UNAVAILABLE_REPLY.to_string();
        };

        let messages = self.persona.build_messages(text);
        match engine.complete(&messages, &self.params) {
            Ok(raw) => clean_reply(&raw),
            Err(e) => {
                tracing::warn!(target: "deskpet.llm", "Inference failed: {}", e);
                format!("{} ({})", CHAT_FAILED_PREFIX, e)
            }
        }
    }
}

/// Poisoning only means another chat thread panicked mid-call; the
/// engine slot itself is still usable.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!(target: "deskpet.llm", "Inference lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}
