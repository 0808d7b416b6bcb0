// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Engine abstraction
//!
//! The inference library is treated as a black box: something that can be
//! loaded from a file with a [`LoadConfig`] and then turn a list of
//! [`PromptMessage`]s into text.

use std::path::Path;
use std::sync::Arc;

use crate::error::{PetError, Result};

/// Default context size for the small chat models the pet ships with
pub const DEFAULT_CONTEXT_SIZE: u32 = 2048;

/// Role of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of the prompt sent to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Model initialization settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadConfig {
    /// Context size (number of tokens)
    pub context_size: u32,
    /// Inference threads
    pub threads: u32,
    /// Layers offloaded to the GPU (0 = CPU only)
    pub gpu_layers: u32,
    /// Memory-map the model file
    pub use_mmap: bool,
    /// Lock model pages in RAM
    pub use_mlock: bool,
}

impl LoadConfig {
    /// Single thread, no mmap, no mlock, CPU only.
    pub fn conservative() -> Self {
        Self {
            context_size: DEFAULT_CONTEXT_SIZE,
            threads: 1,
            gpu_layers: 0,
            use_mmap: false,
            use_mlock: false,
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self::conservative()
    }
}

/// Generation settings for one reply
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    /// Generation stops before the first occurrence of any of these
    pub stop: Vec<String>,
}

impl SamplingParams {
    /// Short, low-temperature replies that stop before the model starts
    /// writing the user's turn for them.
    pub fn pet_reply() -> Self {
        Self {
            max_tokens: 64,
            temperature: 0.7,
            stop: vec!["[".to_string(), "\n\n".to_string()],
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self::pet_reply()
    }
}

/// A loaded model that can produce chat completions
pub trait ChatEngine: Send {
    /// Produce the assistant reply for `messages`.
    fn complete(&mut self, messages: &[PromptMessage], params: &SamplingParams) -> Result<String>;
}

/// Creates engines from model files
pub trait EngineLoader: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Load the model at `path`.
    fn load(&self, path: &Path, config: &LoadConfig) -> Result<Box<dyn ChatEngine>>;
}

/// Loader used when the crate is built without a local backend
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableLoader;

impl EngineLoader for UnavailableLoader {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn load(&self, _path: &Path, _config: &LoadConfig) -> Result<Box<dyn ChatEngine>> {
        Err(PetError::Model(
            "built without a local inference backend (enable the `local-llm` feature)".to_string(),
        ))
    }
}

/// The loader compiled into this build.
pub fn default_loader() -> Arc<dyn EngineLoader> {
    #[cfg(feature = "local-llm")]
    {
        Arc::new(crate::llm::llama_cpp::LlamaCppLoader::new())
    }
    #[cfg(not(feature = "local-llm"))]
    {
        Arc::new(UnavailableLoader)
    }
}
