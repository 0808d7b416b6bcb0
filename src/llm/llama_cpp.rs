// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Local chat engine using llama.cpp
//!
//! Runs GGUF chat models in-process through llama-cpp-2. Prompts are
//! rendered as ChatML, which the Qwen chat models the pet is meant for
//! understand natively.

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;
use std::num::NonZeroU32;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::engine::{ChatEngine, EngineLoader, LoadConfig, PromptMessage, SamplingParams};
use super::prompt::{decode_complete, to_chatml, truncate_at_stop};
use crate::error::{PetError, Result};

/// Loads GGUF models with llama.cpp.
///
/// The llama.cpp backend may only be initialized once per process, so the
/// loader keeps it and shares it with every engine it creates.
#[derive(Default)]
pub struct LlamaCppLoader {
    backend: Mutex<Option<Arc<LlamaBackend>>>,
}

impl LlamaCppLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn backend(&self) -> Result<Arc<LlamaBackend>> {
        let mut slot = self
            .backend
            .lock()
            .map_err(|_| PetError::Inference("llama.cpp backend lock poisoned".to_string()))?;
        if let Some(backend) = slot.as_ref() {
            return Ok(Arc::clone(backend));
        }
        let backend = LlamaBackend::init().map_err(|e| {
            PetError::Inference(format!("Failed to initialize llama.cpp backend: {}", e))
        })?;
        let backend = Arc::new(backend);
        *slot = Some(Arc::clone(&backend));
        Ok(backend)
    }
}

impl EngineLoader for LlamaCppLoader {
    fn name(&self) -> &str {
        "llama.cpp"
    }

    fn load(&self, path: &Path, config: &LoadConfig) -> Result<Box<dyn ChatEngine>> {
        let backend = self.backend()?;

        let model_params = LlamaModelParams::default()
            .with_n_gpu_layers(config.gpu_layers)
            .with_use_mmap(config.use_mmap)
            .with_use_mlock(config.use_mlock);

        let model = LlamaModel::load_from_file(&backend, path, &model_params)
            .map_err(|e| PetError::Model(format!("Failed to load model: {}", e)))?;

        Ok(Box::new(LlamaCppEngine {
            backend,
            model,
            config: config.clone(),
        }))
    }
}

/// A loaded llama.cpp model
pub struct LlamaCppEngine {
    backend: Arc<LlamaBackend>,
    model: LlamaModel,
    config: LoadConfig,
}

impl LlamaCppEngine {
    fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String> {
        let threads = self.config.threads.max(1) as i32;
        let ctx_params = LlamaContextParams::default()
            .with_n_ctx(NonZeroU32::new(self.config.context_size))
            .with_n_threads(threads)
            .with_n_threads_batch(threads);

        let mut ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| PetError::Inference(format!("Failed to create context: {}", e)))?;

        let tokens = self
            .model
            .str_to_token(prompt, AddBos::Always)
            .map_err(|e| PetError::Inference(format!("Failed to tokenize prompt: {}", e)))?;

        if tokens.is_empty() {
            return Ok(String::new());
        }
        if tokens.len() >= self.config.context_size as usize {
            return Err(PetError::Inference(format!(
                "prompt of {} tokens does not fit a {} token context",
                tokens.len(),
                self.config.context_size
            )));
        }

        let mut batch = LlamaBatch::new(self.config.context_size as usize, 1);
        let last_index = tokens.len() - 1;
        for (i, token) in tokens.iter().enumerate() {
            batch
                .add(*token, i as i32, &[0], i == last_index)
                .map_err(|e| PetError::Inference(format!("Failed to add token to batch: {}", e)))?;
        }

        ctx.decode(&mut batch)
            .map_err(|e| PetError::Inference(format!("Failed to decode batch: {}", e)))?;

        let mut sampler = LlamaSampler::chain_simple([
            LlamaSampler::temp(params.temperature),
            LlamaSampler::dist(rand::random::<u32>()),
        ]);

        // Tokens can end partway through a UTF-8 character, so raw bytes are
        // collected and only decoded as a whole.
        let mut bytes = Vec::new();
        let mut n_cur = tokens.len();

        for _ in 0..params.max_tokens {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }

            let piece = self
                .model
                .token_to_bytes(token, Special::Tokenize)
                .map_err(|e| PetError::Inference(format!("Failed to decode token: {}", e)))?;
            bytes.extend_from_slice(&piece);

            if truncate_at_stop(&mut decode_complete(&bytes), &params.stop) {
                break;
            }
            if n_cur + 1 >= self.config.context_size as usize {
                break;
            }

            batch.clear();
            batch
                .add(token, n_cur as i32, &[0], true)
                .map_err(|e| PetError::Inference(format!("Failed to add token: {}", e)))?;
            ctx.decode(&mut batch)
                .map_err(|e| PetError::Inference(format!("Failed to decode: {}", e)))?;

            n_cur += 1;
        }

        let mut output = String::from_utf8_lossy(&bytes).into_owned();
        truncate_at_stop(&mut output, &params.stop);
        Ok(output)
    }
}

impl ChatEngine for LlamaCppEngine {
    fn complete(&mut self, messages: &[PromptMessage], params: &SamplingParams) -> Result<String> {
        let prompt = to_chatml(messages);
        tracing::debug!(
            target: "deskpet.llm",
            prompt_chars = prompt.chars().count(),
            max_tokens = params.max_tokens,
            "Generating reply"
        );
        self.generate(&prompt, params)
    }
}
