// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error classification: raw failures into the closed taxonomy.
//!
//! `classify` is a pure function: the same input always yields the same
//! classification, which the retry loop and the test suite both rely on.
//! Status codes decide first; wording in the provider message is the
//! tiebreaker for statusless transport errors and ambiguous 400s.

use postloom_core::{ClassifiedError, ErrorKind, PostloomError};

/// Map a raw failure into a typed, retry-annotated error.
pub fn classify(error: &PostloomError) -> ClassifiedError {
    match error {
        PostloomError::Timeout { duration } => ClassifiedError::new(
            ErrorKind::Network,
            format!("provider attempt timed out after {duration:?}"),
        ),

        PostloomError::EmptyCompletion => ClassifiedError::new(
            ErrorKind::GenerationError,
            "provider returned an empty completion",
        ),

        PostloomError::Cancelled => {
            ClassifiedError::new(ErrorKind::Unknown, "generation cancelled by caller")
                .non_retryable()
        }

        PostloomError::Provider {
            message,
            status,
            retry_after,
            ..
        } => {
            let classified = match status {
                Some(s @ (401 | 403)) => ClassifiedError::new(
                    ErrorKind::Authentication,
                    format!("provider rejected credentials (HTTP {s}): {message}"),
                ),
                Some(402) => ClassifiedError::new(
                    ErrorKind::QuotaExceeded,
                    format!("provider quota exhausted (HTTP 402): {message}"),
                ),
                Some(429) => ClassifiedError::new(
                    ErrorKind::RateLimit,
                    format!("provider rate limit hit (HTTP 429): {message}"),
                ),
                Some(s) if *s >= 500 => ClassifiedError::new(
                    ErrorKind::ServiceUnavailable,
                    format!("provider unavailable (HTTP {s}): {message}"),
                ),
                Some(s) => classify_by_wording(message, Some(*s)),
                None => classify_by_wording(message, None),
            };
            match retry_after {
                Some(d) => classified.with_retry_after_ms(d.as_millis() as u64),
                None => classified,
            }
        }

        PostloomError::Config(message) => ClassifiedError::new(
            ErrorKind::Unknown,
            format!("configuration fault during generation: {message}"),
        ),

        PostloomError::Internal(message) => {
            ClassifiedError::new(ErrorKind::Unknown, format!("internal fault: {message}"))
        }
    }
}

/// Classification for failures without a decisive status code.
///
/// A transport failure (no status at all) defaults to `network`; a 4xx
/// that isn't one of the well-known codes defaults to `generation_error`.
fn classify_by_wording(message: &str, status: Option<u16>) -> ClassifiedError {
    let lower = message.to_lowercase();

    if lower.contains("content policy")
        || lower.contains("content_policy")
        || lower.contains("safety")
        || lower.contains("blocked")
    {
        return ClassifiedError::new(
            ErrorKind::ContentBlocked,
            format!("provider blocked the content: {message}"),
        );
    }
    if lower.contains("quota") || lower.contains("billing") {
        return ClassifiedError::new(
            ErrorKind::QuotaExceeded,
            format!("provider quota exhausted: {message}"),
        );
    }
    if lower.contains("unauthorized") || lower.contains("api key") {
        return ClassifiedError::new(
            ErrorKind::Authentication,
            format!("provider rejected credentials: {message}"),
        );
    }

    match status {
        None => ClassifiedError::new(
            ErrorKind::Network,
            format!("transport failure reaching provider: {message}"),
        ),
        Some(s) => ClassifiedError::new(
            ErrorKind::GenerationError,
            format!("provider request failed (HTTP {s}): {message}"),
        ),
    }
}
