// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic progress messages for the retry loop.
//!
//! Messages are a pure function of the attempt index so UI snapshots stay
//! stable across runs. The first attempt emits nothing; callers only hear
//! about retries.

/// Message shown before `attempt` (1-based) starts, given the retry budget.
///
/// Returns `None` for the first attempt.
pub fn retry_message(attempt: u32, max_retries: u32) -> Option<String> {
    match attempt {
        0 | 1 => None,
        2 => Some("First attempt failed, retrying...".to_string()),
        3 => Some("Retrying with a different approach...".to_string()),
        n => Some(format!("Attempt {n} of {max_retries}...")),
    }
}
