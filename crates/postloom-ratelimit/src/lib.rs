// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sliding-window rate limiting for the Postloom generation core.
//!
//! Admission counts only requests within the trailing window per
//! `(subject, action)` key. Entries are pruned lazily on each check. The
//! prune-and-append critical section covers a single key only, so
//! concurrent checks on one key cannot both take the last slot and
//! different keys never contend.

pub mod limiter;
pub mod store;

pub use limiter::RateLimiter;
pub use store::{MemoryStore, RateLimitStore, StoreAdmission};
