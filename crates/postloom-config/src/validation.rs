// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Figment + serde guarantee shape; this module checks ranges and
//! cross-field constraints that serde cannot express. All violations are
//! collected before returning so the user sees every problem at once.

use thiserror::Error;

use crate::model::PostloomConfig;

/// A single configuration constraint violation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("`{key}` is out of range: {reason}")]
    OutOfRange { key: String, reason: String },

    #[error("`{left}` must not exceed `{right}`: {reason}")]
    Inconsistent {
        left: String,
        right: String,
        reason: String,
    },
}

/// Validate ranges and cross-field constraints on a deserialized config.
pub fn validate_config(config: &PostloomConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.max_retries == 0 {
        errors.push(ConfigError::OutOfRange {
            key: "engine.max_retries".into(),
            reason: "must be at least 1".into(),
        });
    }
    if config.engine.timeout_ms == 0 {
        errors.push(ConfigError::OutOfRange {
            key: "engine.timeout_ms".into(),
            reason: "must be positive".into(),
        });
    }

    if config.backoff.base_ms == 0 {
        errors.push(ConfigError::OutOfRange {
            key: "backoff.base_ms".into(),
            reason: "must be positive".into(),
        });
    }
    if config.backoff.base_ms > config.backoff.max_ms {
        errors.push(ConfigError::Inconsistent {
            left: "backoff.base_ms".into(),
            right: "backoff.max_ms".into(),
            reason: format!(
                "base delay {} ms exceeds cap {} ms",
                config.backoff.base_ms, config.backoff.max_ms
            ),
        });
    }
    if !(0.0..=1.0).contains(&config.backoff.jitter_ratio) {
        errors.push(ConfigError::OutOfRange {
            key: "backoff.jitter_ratio".into(),
            reason: format!(
                "must be within 0.0..=1.0, got {}",
                config.backoff.jitter_ratio
            ),
        });
    }

    for (action, limit) in &config.limits.actions {
        if limit.max_requests == 0 {
            errors.push(ConfigError::OutOfRange {
                key: format!("limits.{action}.max_requests"),
                reason: "must be at least 1".into(),
            });
        }
        if limit.window_ms <= 0 {
            errors.push(ConfigError::OutOfRange {
                key: format!("limits.{action}.window_ms"),
                reason: "must be positive".into(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
