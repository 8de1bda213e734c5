// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The closed error taxonomy surfaced to callers.
//!
//! Every raw failure in the generation path is normalized into a
//! [`ClassifiedError`] before it reaches a caller. The taxonomy is closed:
//! UI layers can match on [`ErrorKind`] exhaustively, and only
//! `user_message` / `suggested_action` are ever shown to end users. Raw
//! provider text stays in `message`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Closed enumeration of failure classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    RateLimit,
    Network,
    Authentication,
    QuotaExceeded,
    ServiceUnavailable,
    ContentBlocked,
    GenerationError,
    Unknown,
}

impl ErrorKind {
    /// Whether retrying an attempt that failed with this kind can help.
    ///
    /// `RateLimit` here means an *upstream* 429, which is retryable after a
    /// delay. A local limiter denial is constructed separately as
    /// non-retryable (see [`ClassifiedError::non_retryable`]).
    pub fn is_retryable(self) -> bool {
        match self {
            ErrorKind::Network
            | ErrorKind::RateLimit
            | ErrorKind::ServiceUnavailable
            | ErrorKind::GenerationError
            | ErrorKind::Unknown => true,
            ErrorKind::ValidationError
            | ErrorKind::Authentication
            | ErrorKind::QuotaExceeded
            | ErrorKind::ContentBlocked => false,
        }
    }

    /// Fixed, safe-to-surface message for this kind.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "We couldn't use that topic. Please rephrase and try again.",
            ErrorKind::RateLimit => "You're creating content faster than we can keep up. Please wait a moment.",
            ErrorKind::Network => "We're having trouble reaching the content service.",
            ErrorKind::Authentication => "Your session needs to be refreshed before generating content.",
            ErrorKind::QuotaExceeded => "You've reached your generation limit for this billing period.",
            ErrorKind::ServiceUnavailable => "The content service is temporarily overloaded.",
            ErrorKind::ContentBlocked => "This topic can't be generated due to content guidelines.",
            ErrorKind::GenerationError => "Content generation didn't complete as expected.",
            ErrorKind::Unknown => "Something unexpected went wrong while generating content.",
        }
    }

    /// Fixed next-step hint for this kind, when one exists.
    pub fn suggested_action(self) -> Option<&'static str> {
        match self {
            ErrorKind::ValidationError => Some("Edit the topic and submit again."),
            ErrorKind::RateLimit => Some("Wait for the limit window to reset before retrying."),
            ErrorKind::Network => Some("Check your connection and try again."),
            ErrorKind::Authentication => Some("Sign in again to continue."),
            ErrorKind::QuotaExceeded => Some("Upgrade your plan or wait for the quota to reset."),
            ErrorKind::ServiceUnavailable => Some("Try again in a few minutes."),
            ErrorKind::ContentBlocked => Some("Choose a different topic."),
            ErrorKind::GenerationError | ErrorKind::Unknown => None,
        }
    }
}

/// A raw failure normalized into the closed taxonomy.
///
/// Immutable once constructed. `user_message` and `suggested_action` are the
/// only fields the UI layer may display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    /// Diagnostic detail for logs. May contain raw provider text.
    pub message: String,
    pub user_message: String,
    pub retryable: bool,
    /// Provider-supplied retry hint, when one was given.
    pub retry_after_ms: Option<u64>,
    pub suggested_action: Option<String>,
}

impl ClassifiedError {
    /// Builds a classified error with the kind's default retryability,
    /// user message, and suggested action.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            user_message: kind.user_message().to_string(),
            retryable: kind.is_retryable(),
            retry_after_ms: None,
            suggested_action: kind.suggested_action().map(str::to_string),
        }
    }

    /// Attaches an upstream retry hint in milliseconds.
    pub fn with_retry_after_ms(mut self, retry_after_ms: u64) -> Self {
        self.retry_after_ms = Some(retry_after_ms);
        self
    }

    /// Forces the error non-retryable regardless of its kind's default.
    ///
    /// Used for local rate-limit denials, where retrying inside the same
    /// call would be pointless.
    pub fn non_retryable(mut self) -> Self {
        self.retryable = false;
        self
    }
}
