// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit logger trait for security-relevant events.
//!
//! The generation path emits audit events for sanitization violations,
//! rate-limit denials, and fallback use. Logging is fire-and-forget and
//! infallible: an audit sink must never block or fail a generation call.

use serde::Serialize;
use strum::Display;
use tracing::{error, info, warn};

/// How serious an audit event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AuditSeverity {
    Info,
    Warning,
    Critical,
}

/// A single security-relevant event on the generation path.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Stable event name, e.g. `"sanitization_violation"`.
    pub name: &'static str,
    /// The subject (user/session key) the event concerns.
    pub subject: String,
    pub severity: AuditSeverity,
    /// Structured event detail. Must not contain raw secrets.
    pub details: serde_json::Value,
}

impl AuditEvent {
    pub fn new(
        name: &'static str,
        subject: impl Into<String>,
        severity: AuditSeverity,
        details: serde_json::Value,
    ) -> Self {
        Self {
            name,
            subject: subject.into(),
            severity,
            details,
        }
    }
}

/// Sink for audit events.
///
/// Implementations must return promptly; anything slow (network, disk)
/// belongs behind a channel inside the implementation.
pub trait AuditLogger: Send + Sync + 'static {
    fn log(&self, event: AuditEvent);
}

/// Default audit sink that writes structured `tracing` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl AuditLogger for TracingAuditLogger {
    fn log(&self, event: AuditEvent) {
        match event.severity {
            AuditSeverity::Info => info!(
                target: "postloom::audit",
                event = event.name,
                subject = %event.subject,
                details = %event.details,
                "audit event"
            ),
            AuditSeverity::Warning => warn!(
                target: "postloom::audit",
                event = event.name,
                subject = %event.subject,
                details = %event.details,
                "audit event"
            ),
            AuditSeverity::Critical => error!(
                target: "postloom::audit",
                event = event.name,
                subject = %event.subject,
                details = %event.details,
                "audit event"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Audit sink that records events in memory, for assertions.
    #[derive(Default, Clone)]
    struct RecordingLogger {
        events: Arc<Mutex<Vec<AuditEvent>>>,
    }

    impl AuditLogger for RecordingLogger {
        fn log(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn severity_display_is_lowercase() {
        assert_eq!(AuditSeverity::Warning.to_string(), "warning");
        assert_eq!(AuditSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn recording_logger_captures_events() {
        let logger = RecordingLogger::default();
        logger.log(AuditEvent::new(
            "rate_limit_denied",
            "user-1",
            AuditSeverity::Warning,
            serde_json::json!({ "action": "generate_content" }),
        ));
        let events = logger.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "rate_limit_denied");
        assert_eq!(events[0].subject, "user-1");
    }

    #[test]
    fn tracing_logger_does_not_panic() {
        TracingAuditLogger.log(AuditEvent::new(
            "fallback_used",
            "user-2",
            AuditSeverity::Info,
            serde_json::json!({}),
        ));
    }
}
