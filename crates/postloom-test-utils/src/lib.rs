// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Postloom integration tests.
//!
//! Provides a scripted [`MockProvider`] and an in-memory
//! [`RecordingAuditLogger`] so the retry loop can be exercised end to end
//! without any network access.

pub mod mock_provider;
pub mod recording_audit;

pub use mock_provider::{MockOutcome, MockProvider};
pub use recording_audit::RecordingAuditLogger;
