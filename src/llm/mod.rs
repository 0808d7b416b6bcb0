// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Local LLM access for the pet
//!
//! - `engine`: the opaque engine/loader traits and their parameters
//! - `prompt`: persona, few-shot prompt assembly, and reply cleanup
//! - `adapter`: the `load()`/`chat(text)` boundary the rest of the app uses
//! - `llama_cpp`: llama.cpp-backed engine (feature `local-llm`)
//! - `mock_engine`: scripted engine for tests

pub mod adapter;
pub mod engine;
#[cfg(feature = "local-llm")]
pub mod llama_cpp;
pub mod mock_engine;
pub mod prompt;

pub use adapter::{InferenceAdapter, CHAT_FAILED_PREFIX, MODEL_UNAVAILABLE_REPLY};
pub use engine::{
    default_loader, ChatEngine, EngineLoader, LoadConfig, PromptMessage, Role, SamplingParams,
    UnavailableLoader,
};
pub use prompt::Persona;
