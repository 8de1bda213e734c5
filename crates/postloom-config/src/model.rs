// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Postloom generation core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Postloom configuration.
///
/// Loaded from TOML files with environment variable overrides. All sections
/// are optional and default to the reference behavior.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostloomConfig {
    /// Orchestrator retry/timeout settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Exponential backoff settings.
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Per-action sliding-window rate limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Orchestrator retry/timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Provider attempts before falling back. Must be at least 1.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-attempt provider deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_timeout_ms() -> u64 {
    15_000
}

/// Exponential backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackoffConfig {
    /// First-attempt delay in milliseconds; doubles each attempt.
    #[serde(default = "default_base_ms")]
    pub base_ms: u64,

    /// Cap on any computed or provider-hinted delay, in milliseconds.
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,

    /// Symmetric jitter as a fraction of the computed delay (0.0..=1.0).
    #[serde(default = "default_jitter_ratio")]
    pub jitter_ratio: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_ms: default_base_ms(),
            max_ms: default_max_ms(),
            jitter_ratio: default_jitter_ratio(),
        }
    }
}

fn default_base_ms() -> u64 {
    1_000
}

fn default_max_ms() -> u64 {
    30_000
}

fn default_jitter_ratio() -> f64 {
    0.25
}

/// A single action's sliding-window limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActionLimit {
    /// Requests admitted per window. Must be at least 1.
    pub max_requests: u32,

    /// Window length in milliseconds. Must be positive.
    pub window_ms: i64,
}

/// Per-action rate limits, keyed by action name.
///
/// Limits are configuration, not code: actions absent from the table are
/// admitted without limit. Config files extend or override the default
/// actions per key under the figment merge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(transparent)]
pub struct LimitsConfig {
    /// Action name -> limit. BTreeMap keeps serialization order stable.
    pub actions: BTreeMap<String, ActionLimit>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            actions: default_actions(),
        }
    }
}

impl LimitsConfig {
    /// Looks up the limit configured for an action.
    pub fn for_action(&self, action: &str) -> Option<ActionLimit> {
        self.actions.get(action).copied()
    }
}

fn default_actions() -> BTreeMap<String, ActionLimit> {
    BTreeMap::from([
        (
            "generate_content".to_string(),
            ActionLimit {
                max_requests: 20,
                window_ms: 3_600_000,
            },
        ),
        (
            "login".to_string(),
            ActionLimit {
                max_requests: 5,
                window_ms: 900_000,
            },
        ),
    ])
}
