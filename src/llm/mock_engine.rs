// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock engine for testing
//!
//! A scripted [`ChatEngine`] plus a loader that hands out clones of it.
//! Clones share their recording and concurrency counters, so a test can
//! keep one handle and inspect what the adapter did with the other.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::engine::{ChatEngine, EngineLoader, LoadConfig, PromptMessage, SamplingParams};
use crate::error::{PetError, Result};

/// Calls seen by a mock engine
pub type RecordedCalls = Arc<Mutex<Vec<(Vec<PromptMessage>, SamplingParams)>>>;

/// A scripted engine
#[derive(Clone)]
pub struct MockEngine {
    responses: Arc<Mutex<VecDeque<String>>>,
    fallback: String,
    error: Option<String>,
    panic: Option<String>,
    delay: Option<Duration>,
    recorded: RecordedCalls,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback: "嗯嗯~".to_string(),
            error: None,
            panic: None,
            delay: None,
            recorded: Arc::new(Mutex::new(Vec::new())),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reply with `text` whenever the queue is empty.
    pub fn with_response(mut self, text: impl Into<String>) -> Self {
        self.fallback = text.into();
        self
    }

    /// Queue replies returned in order before falling back.
    pub fn with_responses<I, S>(self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Ok(mut queue) = self.responses.lock() {
            queue.extend(texts.into_iter().map(Into::into));
        }
        self
    }

    /// Fail every call with this message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Panic inside every call with this message.
    pub fn panicking(mut self, message: impl Into<String>) -> Self {
        self.panic = Some(message.into());
        self
    }

    /// Sleep this long inside each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn recorded(&self) -> RecordedCalls {
        Arc::clone(&self.recorded)
    }

    pub fn call_count(&self) -> usize {
        self.recorded.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Highest number of calls that were ever inside `complete` at once.
    pub fn max_concurrency(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }
}

impl ChatEngine for MockEngine {
    fn complete(&mut self, messages: &[PromptMessage], params: &SamplingParams) -> Result<String> {
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        if let Ok(mut calls) = self.recorded.lock() {
            calls.push((messages.to_vec(), params.clone()));
        }
        if let Some(message) = &self.panic {
            self.active.fetch_sub(1, Ordering::SeqCst);
            panic!("{}", message);
        }

        let result = match &self.error {
            Some(message) => Err(PetError::Inference(message.clone())),
            None => {
                let queued = self.responses.lock().ok().and_then(|mut q| q.pop_front());
                Ok(queued.unwrap_or_else(|| self.fallback.clone()))
            }
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Loader that hands out clones of a template engine
pub struct MockLoader {
    template: MockEngine,
    load_error: Option<String>,
    last_config: Mutex<Option<LoadConfig>>,
    loads: AtomicUsize,
}

impl Default for MockLoader {
    fn default() -> Self {
        Self::new(MockEngine::new())
    }
}

impl MockLoader {
    pub fn new(template: MockEngine) -> Self {
        Self {
            template,
            load_error: None,
            last_config: Mutex::new(None),
            loads: AtomicUsize::new(0),
        }
    }

    /// Fail every load with this message.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.load_error = Some(message.into());
        self
    }

    pub fn last_config(&self) -> Option<LoadConfig> {
        self.last_config.lock().ok().and_then(|c| c.clone())
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl EngineLoader for MockLoader {
    fn name(&self) -> &str {
        "mock"
    }

    fn load(&self, _path: &Path, config: &LoadConfig) -> Result<Box<dyn ChatEngine>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_config.lock() {
            *last = Some(config.clone());
        }
        match &self.load_error {
            Some(message) => Err(PetError::Model(message.clone())),
            None => Ok(Box::new(self.template.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_then_fallback() {
        let mut engine = MockEngine::new()
            .with_response("默认")
            .with_responses(["一", "二"]);
        let params = SamplingParams::default();
        assert_eq!(engine.complete(&[], &params).unwrap(), "一");
        assert_eq!(engine.complete(&[], &params).unwrap(), "二");
        assert_eq!(engine.complete(&[], &params).unwrap(), "默认");
        assert_eq!(engine.call_count(), 3);
    }

    #[test]
    fn test_failing_engine() {
        let mut engine = MockEngine::new().failing("boom");
        assert!(engine.complete(&[], &SamplingParams::default()).is_err());
    }

    #[test]
    fn test_failing_loader() {
        let loader = MockLoader::default().failing("corrupt file");
        assert!(loader.load(Path::new("m.gguf"), &LoadConfig::default()).is_err());
        assert_eq!(loader.load_count(), 1);
    }
}
