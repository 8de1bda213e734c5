// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Postloom generation core.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across Postloom adapter traits and core operations.
///
/// This is the *internal* error currency: provider adapters and the
/// orchestrator pass it around with `?`. It is never surfaced to end users
/// directly; the engine's classifier maps it into a
/// [`ClassifiedError`](crate::taxonomy::ClassifiedError) first.
#[derive(Debug, Error)]
pub enum PostloomError {
    /// Configuration errors (invalid TOML, missing required fields, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Upstream AI provider failures (HTTP errors, malformed payloads, transport faults).
    ///
    /// `status` carries the HTTP status when one was observed, and
    /// `retry_after` the provider's retry hint if it supplied one. The
    /// classifier keys on both.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
        retry_after: Option<Duration>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A provider attempt exceeded its per-attempt deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The provider answered successfully but with an empty content payload.
    #[error("provider returned an empty completion")]
    EmptyCompletion,

    /// The caller cancelled the operation via its cancellation token.
    #[error("operation cancelled by caller")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PostloomError {
    /// Shorthand for a provider error with no status or retry hint.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            status: None,
            retry_after: None,
            source: None,
        }
    }

    /// Shorthand for a provider error carrying an HTTP status.
    pub fn provider_status(message: impl Into<String>, status: u16) -> Self {
        Self::Provider {
            message: message.into(),
            status: Some(status),
            retry_after: None,
            source: None,
        }
    }
}
