// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Postloom generation engine.
//!
//! Ties the workspace together: error classification into the closed
//! taxonomy, exponential backoff with jitter, deterministic progress
//! messages, and the [`Orchestrator`] state machine that runs a request
//! from validation through retries to fallback synthesis.

pub mod backoff;
pub mod classify;
pub mod orchestrator;
pub mod progress;

pub use backoff::{BackoffPolicy, JitterSource, MIN_DELAY_MS, NoJitter, SeededJitter, ThreadRngJitter};
pub use classify::classify;
pub use orchestrator::{ACTION_GENERATE, Orchestrator};
pub use progress::retry_message;
