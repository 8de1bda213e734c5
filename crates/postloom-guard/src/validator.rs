// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic validation and sanitization.
//!
//! `validate` is a pure transformation: it never panics and always returns
//! a [`ValidationResult`]. A sanitized topic is produced whenever anything
//! recoverable remains, even for invalid input, so the fallback synthesizer
//! always has safe text to work with.

use serde::Serialize;
use tracing::debug;

use crate::patterns::strip_dangerous;

/// Maximum accepted topic length, in characters.
pub const MAX_TOPIC_CHARS: usize = 2_000;

/// Outcome of validating a raw topic. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// Sanitized, HTML-escaped topic. Present iff the input was valid or
    /// partially recoverable.
    pub sanitized: Option<String>,
    /// Ordered, human-readable reasons the input was rejected or altered.
    pub violations: Vec<String>,
}

/// Validate and sanitize a raw topic string.
///
/// Rejects empty/whitespace-only input and input over [`MAX_TOPIC_CHARS`]
/// characters, strips dangerous substrings (recording each as a violation),
/// and HTML-escapes the remainder so it is safe to render even if the
/// provider echoes it back.
pub fn validate(raw: &str) -> ValidationResult {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return ValidationResult {
            is_valid: false,
            sanitized: None,
            violations: vec!["topic must not be empty".to_string()],
        };
    }

    let mut violations = Vec::new();

    let bounded: String = if trimmed.chars().count() > MAX_TOPIC_CHARS {
        violations.push(format!(
            "topic exceeds maximum length of {MAX_TOPIC_CHARS} characters"
        ));
        trimmed.chars().take(MAX_TOPIC_CHARS).collect()
    } else {
        trimmed.to_string()
    };

    let stripped = strip_dangerous(&bounded, &mut violations);
    let sanitized = escape_html(stripped.trim());

    if !violations.is_empty() {
        debug!(violations = violations.len(), "topic sanitization recorded violations");
    }

    ValidationResult {
        is_valid: violations.is_empty(),
        sanitized: if sanitized.is_empty() {
            None
        } else {
            Some(sanitized)
        },
        violations,
    }
}

/// HTML-escape `< > " ' /`.
///
/// `&` is deliberately not escaped: the entity replacements contain none of
/// the escaped characters, which is what makes sanitization idempotent.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            other => out.push(other),
        }
    }
    out
}
