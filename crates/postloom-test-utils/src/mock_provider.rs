// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-scripted outcomes,
//! enabling fast, CI-runnable tests of the retry loop without external
//! API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use postloom_core::{PostloomError, PromptPayload, ProviderAdapter, ProviderOutput};

/// One scripted provider outcome.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Complete successfully with this content.
    Reply(String),
    /// Complete successfully with an empty payload.
    Empty,
    /// Fail with a provider error carrying the given status and retry hint.
    Fail {
        message: String,
        status: Option<u16>,
        retry_after_ms: Option<u64>,
    },
    /// Never complete until the cancellation token fires. Drives the
    /// orchestrator's per-attempt timeout path.
    Hang,
}

impl MockOutcome {
    /// Shorthand for a plain failure with an HTTP status.
    pub fn fail_status(message: impl Into<String>, status: u16) -> Self {
        Self::Fail {
            message: message.into(),
            status: Some(status),
            retry_after_ms: None,
        }
    }

    /// Shorthand for a transport-level failure with no status.
    pub fn fail_transport(message: impl Into<String>) -> Self {
        Self::Fail {
            message: message.into(),
            status: None,
            retry_after_ms: None,
        }
    }
}

/// A mock provider that plays back pre-scripted outcomes.
///
/// Outcomes are popped from a FIFO queue. When the queue is empty, a
/// default "mock content" reply is returned. The call counter lets tests
/// assert exactly how many attempts the orchestrator made.
pub struct MockProvider {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: AtomicU32,
}

impl MockProvider {
    /// Create a mock provider with an empty outcome queue.
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicU32::new(0),
        }
    }

    /// Create a mock provider pre-loaded with the given outcomes.
    pub fn with_outcomes(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(VecDeque::from(outcomes))),
            calls: AtomicU32::new(0),
        }
    }

    /// Add an outcome to the end of the queue.
    pub async fn push_outcome(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn next_outcome(&self) -> MockOutcome {
        self.outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockOutcome::Reply("mock content".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn complete(
        &self,
        _prompt: &PromptPayload,
        cancel: &CancellationToken,
    ) -> Result<ProviderOutput, PostloomError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.next_outcome().await {
            MockOutcome::Reply(content) => Ok(ProviderOutput {
                content,
                model: Some("mock-model".to_string()),
            }),
            MockOutcome::Empty => Ok(ProviderOutput {
                content: String::new(),
                model: Some("mock-model".to_string()),
            }),
            MockOutcome::Fail {
                message,
                status,
                retry_after_ms,
            } => Err(PostloomError::Provider {
                message,
                status,
                retry_after: retry_after_ms.map(Duration::from_millis),
                source: None,
            }),
            MockOutcome::Hang => {
                cancel.cancelled().await;
                Err(PostloomError::Cancelled)
            }
        }
    }
}
