// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic fallback content synthesis.
//!
//! When every provider attempt fails, the orchestrator still owes the
//! caller non-empty content. This crate produces platform-appropriate
//! placeholder text from the request alone, with no network, randomness,
//! or clock involved, so the output is testable byte-for-byte.

pub mod templates;
pub mod topic;

pub use templates::synthesize;
pub use topic::{DEFAULT_TOPIC, extract_topic_phrase, hashtag_token};
