// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory audit sink for assertions in tests.

use std::sync::{Arc, Mutex};

use postloom_core::{AuditEvent, AuditLogger};

/// Audit logger that records every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingAuditLogger {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl RecordingAuditLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events logged so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit lock poisoned").clone()
    }

    /// Names of all events logged so far, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .expect("audit lock poisoned")
            .iter()
            .map(|e| e.name)
            .collect()
    }
}

impl AuditLogger for RecordingAuditLogger {
    fn log(&self, event: AuditEvent) {
        self.events.lock().expect("audit lock poisoned").push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postloom_core::AuditSeverity;

    #[test]
    fn records_events_in_order() {
        let logger = RecordingAuditLogger::new();
        logger.log(AuditEvent::new(
            "first",
            "user-1",
            AuditSeverity::Info,
            serde_json::json!({}),
        ));
        logger.log(AuditEvent::new(
            "second",
            "user-1",
            AuditSeverity::Warning,
            serde_json::json!({}),
        ));
        assert_eq!(logger.event_names(), vec!["first", "second"]);
    }
}
