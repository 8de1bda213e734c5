// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request sanitization and validation for the Postloom generation core.
//!
//! The guard sits in front of everything: no topic text reaches the rate
//! limiter, the provider, or a rendered page without passing through
//! [`validate`]. Dangerous substrings (script tags, event-handler
//! attributes, code-execution calls, credential-looking pairs) are stripped
//! and recorded as violations, and the remainder is HTML-escaped.

pub mod patterns;
pub mod validator;

pub use validator::{MAX_TOPIC_CHARS, ValidationResult, escape_html, validate};
