// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::events::ChatEvent;
use crate::error::Result;
use crate::llm::{InferenceAdapter, CHAT_FAILED_PREFIX};

/// Called after an event is queued, typically to request a repaint.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Runs loads and chats off the UI thread.
///
/// Requests may overlap; the adapter's lock serializes the actual
/// inference, so replies arrive one at a time. Overlapping requests are
/// not guaranteed to finish in submission order.
pub struct ChatOrchestrator {
    adapter: Arc<InferenceAdapter>,
    runtime: Option<Runtime>,
    event_tx: UnboundedSender<ChatEvent>,
    event_rx: UnboundedReceiver<ChatEvent>,
    waker: Option<Waker>,
}

impl ChatOrchestrator {
    pub fn new(adapter: Arc<InferenceAdapter>) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(2)
            .thread_name("deskpet-chat")
            .enable_time()
            .build()?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Self {
            adapter,
            runtime: Some(runtime),
            event_tx,
            event_rx,
            waker: None,
        })
    }

    pub fn with_waker(mut self, waker: Waker) -> Self {
        self.waker = Some(waker);
        self
    }

    pub fn adapter(&self) -> &Arc<InferenceAdapter> {
        &self.adapter
    }

    /// Load the configured model in the background.
    pub fn load_model(&self) {
        let adapter = Arc::clone(&self.adapter);
        self.run(
            move || ChatEvent::ModelLoaded { ok: adapter.load() },
            || ChatEvent::ModelLoaded { ok: false },
        );
    }

    /// Switch to `path` and load it in the background.
    pub fn reload_model(&self, path: PathBuf) {
        let adapter = Arc::clone(&self.adapter);
        self.run(
            move || ChatEvent::ModelLoaded {
                ok: adapter.reload(path),
            },
            || ChatEvent::ModelLoaded { ok: false },
        );
    }

    /// Ask the pet something; the answer arrives as [`ChatEvent::Reply`].
    pub fn submit(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(target: "deskpet.chat", chars = text.chars().count(), "Chat submitted");
        let adapter = Arc::clone(&self.adapter);
        self.run(
            move || ChatEvent::Reply {
                text: adapter.chat(&text),
            },
            || ChatEvent::Reply {
                text: format!("{} (engine crashed)", CHAT_FAILED_PREFIX),
            },
        );
    }

    /// Drain every event that has arrived since the last call.
    pub fn poll(&mut self) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Run `job` on the blocking pool. A panicking job still produces an
    /// event, built by `on_panic`, so the pet never waits forever.
    fn run<F, P>(&self, job: F, on_panic: P)
    where
        F: FnOnce() -> ChatEvent + Send + 'static,
        P: FnOnce() -> ChatEvent + Send + 'static,
    {
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        let tx = self.event_tx.clone();
        let waker = self.waker.clone();
        runtime.spawn_blocking(move || {
            let event = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                tracing::error!(target: "deskpet.chat", "Background job panicked");
                on_panic()
            });
            if tx.send(event).is_err() {
                tracing::debug!(target: "deskpet.chat", "Event dropped, receiver gone");
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        });
    }
}

impl Drop for ChatOrchestrator {
    fn drop(&mut self) {
        // A reply still generating must not hold up quitting.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
