// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Postloom generation resilience layer.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Postloom workspace: the internal
//! [`PostloomError`], the closed user-facing [`taxonomy`], the request and
//! result value types, and the two injected seams ([`ProviderAdapter`] and
//! [`AuditLogger`]).

pub mod error;
pub mod taxonomy;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PostloomError;
pub use taxonomy::{ClassifiedError, ErrorKind};
pub use traits::{AuditEvent, AuditLogger, AuditSeverity, ProviderAdapter, TracingAuditLogger};
pub use types::{
    ContentType, GenerationRequest, GenerationResult, Platform, PromptPayload, PromptVersion,
    ProviderOutput, RateLimitDecision, ResultMetadata, StyleFlags,
};
