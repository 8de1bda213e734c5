// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for Postloom's external collaborators.
//!
//! The resilience core talks to the outside world through exactly two
//! seams: the AI provider that produces content, and the audit channel
//! that records security-relevant events. Both are injected.

pub mod audit;
pub mod provider;

pub use audit::{AuditEvent, AuditLogger, AuditSeverity, TracingAuditLogger};
pub use provider::ProviderAdapter;
