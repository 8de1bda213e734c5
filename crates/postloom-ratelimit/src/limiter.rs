// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window rate limiter keyed by (subject, action).
//!
//! Per-action limits come from [`LimitsConfig`]; actions without a
//! configured limit are admitted unconditionally. The backing store is
//! injected (see [`RateLimitStore`](crate::store::RateLimitStore)),
//! constructed once per process, and reset only through the explicit
//! `reset` operation or natural window expiry.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use postloom_config::LimitsConfig;
use postloom_core::RateLimitDecision;

use crate::store::{MemoryStore, RateLimitStore};

/// Sliding-window admission control over an injected timestamp store.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    limits: LimitsConfig,
}

impl RateLimiter {
    /// Creates a limiter over a fresh in-memory store.
    pub fn new(limits: LimitsConfig) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), limits)
    }

    /// Creates a limiter over a caller-provided store.
    pub fn with_store(store: Arc<dyn RateLimitStore>, limits: LimitsConfig) -> Self {
        Self { store, limits }
    }

    /// Checks and records an admission for `(subject, action)` at the
    /// current wall-clock time.
    pub fn check(&self, subject: &str, action: &str) -> RateLimitDecision {
        self.check_at(subject, action, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`check`](Self::check), for deterministic
    /// tests.
    pub fn check_at(&self, subject: &str, action: &str, now_ms: i64) -> RateLimitDecision {
        let Some(limit) = self.limits.for_action(action) else {
            // Unconfigured actions are not limited.
            return RateLimitDecision {
                allowed: true,
                remaining: u32::MAX,
                reset_at_ms: None,
            };
        };

        let key = subject_key(subject, action);
        let admission =
            self.store
                .prune_and_admit(&key, now_ms, limit.window_ms, limit.max_requests);

        if admission.allowed {
            RateLimitDecision {
                allowed: true,
                remaining: limit.max_requests.saturating_sub(admission.count),
                reset_at_ms: None,
            }
        } else {
            let reset_at_ms = admission.oldest_ms.map(|oldest| oldest + limit.window_ms);
            warn!(
                subject,
                action,
                count = admission.count,
                max = limit.max_requests,
                "rate limit denied"
            );
            RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            }
        }
    }

    /// Slots left for `(subject, action)` without recording a request.
    pub fn remaining(&self, subject: &str, action: &str) -> u32 {
        self.remaining_at(subject, action, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`remaining`](Self::remaining).
    pub fn remaining_at(&self, subject: &str, action: &str, now_ms: i64) -> u32 {
        let Some(limit) = self.limits.for_action(action) else {
            return u32::MAX;
        };
        let key = subject_key(subject, action);
        let count = self.store.count(&key, now_ms, limit.window_ms);
        limit.max_requests.saturating_sub(count)
    }

    /// Pre-flight decision for `(subject, action)` without recording a
    /// request. UIs use this to show capacity before a real attempt.
    pub fn peek(&self, subject: &str, action: &str) -> RateLimitDecision {
        self.peek_at(subject, action, Utc::now().timestamp_millis())
    }

    /// Clock-explicit variant of [`peek`](Self::peek).
    pub fn peek_at(&self, subject: &str, action: &str, now_ms: i64) -> RateLimitDecision {
        let Some(limit) = self.limits.for_action(action) else {
            return RateLimitDecision {
                allowed: true,
                remaining: u32::MAX,
                reset_at_ms: None,
            };
        };
        let key = subject_key(subject, action);
        let count = self.store.count(&key, now_ms, limit.window_ms);
        if count < limit.max_requests {
            RateLimitDecision {
                allowed: true,
                remaining: limit.max_requests - count,
                reset_at_ms: None,
            }
        } else {
            let reset_at_ms = self
                .store
                .oldest(&key, now_ms, limit.window_ms)
                .map(|oldest| oldest + limit.window_ms);
            RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at_ms,
            }
        }
    }

    /// Clears all recorded requests for `(subject, action)`.
    pub fn reset(&self, subject: &str, action: &str) {
        self.store.reset(&subject_key(subject, action));
    }
}

/// The (subject, action) pair scoping each window.
fn subject_key(subject: &str, action: &str) -> String {
    format!("{subject}:{action}")
}
