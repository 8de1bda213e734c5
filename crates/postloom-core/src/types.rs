// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Postloom generation core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::taxonomy::ClassifiedError;

/// Default number of provider attempts before falling back.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default per-attempt provider deadline in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

/// Social platform a piece of content targets.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Instagram,
    LinkedIn,
    Facebook,
    TikTok,
}

/// The shape of content being generated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Caption,
    Thread,
    Story,
}

/// Rendering hints the caller can toggle per request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFlags {
    /// Sprinkle emoji into the output.
    pub emoji_usage: bool,
    /// Prefer a denser hashtag footer.
    pub hashtag_density: bool,
    /// Keep sentences short and punchy.
    pub short_sentences: bool,
}

/// An immutable content generation request.
///
/// `topic` and `platform` must be present before the request enters the
/// orchestrator; an empty topic is a validation failure, not a generation
/// failure. The orchestrator never retains the request beyond the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Free-text topic or prompt. Sanitized by the guard before use.
    pub topic: String,
    pub platform: Platform,
    pub content_type: ContentType,
    /// Desired voice, passed through to the prompt as-is.
    pub tone: String,
    /// What the post is trying to achieve (engagement, traffic, ...).
    pub goal: String,
    pub key_points: Option<Vec<String>>,
    pub style: StyleFlags,
    /// Provider attempts before falling back. Must be positive.
    pub max_retries: u32,
    /// Per-attempt deadline override in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl GenerationRequest {
    /// Creates a request with default tone, goal, style, and retry budget.
    pub fn new(topic: impl Into<String>, platform: Platform, content_type: ContentType) -> Self {
        Self {
            topic: topic.into(),
            platform,
            content_type,
            tone: "friendly".to_string(),
            goal: "engagement".to_string(),
            key_points: None,
            style: StyleFlags::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: None,
        }
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    pub fn with_key_points(mut self, key_points: Vec<String>) -> Self {
        self.key_points = Some(key_points);
        self
    }

    pub fn with_style(mut self, style: StyleFlags) -> Self {
        self.style = style;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Effective per-attempt deadline for this request.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }
}

/// The prompt payload handed to a provider adapter.
///
/// `text` is always the *sanitized* topic; raw caller input never crosses
/// this boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptPayload {
    pub text: String,
    pub platform: Platform,
    pub content_type: ContentType,
    pub tone: String,
    pub goal: String,
    pub key_points: Option<Vec<String>>,
    pub style: StyleFlags,
}

/// A successful completion from a provider adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutput {
    pub content: String,
    /// Model identifier reported by the provider, when known.
    pub model: Option<String>,
}

/// Which prompt pipeline produced the result content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptVersion {
    /// The live provider prompt pipeline.
    #[serde(rename = "v2.1")]
    V2_1,
    /// Locally synthesized fallback content.
    #[serde(rename = "fallback")]
    Fallback,
}

impl std::fmt::Display for PromptVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptVersion::V2_1 => write!(f, "v2.1"),
            PromptVersion::Fallback => write!(f, "fallback"),
        }
    }
}

/// Metrics envelope attached to every [`GenerationResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    /// Wall-clock duration of the whole `generate()` call.
    pub duration_ms: u64,
    pub prompt_version: PromptVersion,
    pub generated_at: DateTime<Utc>,
}

/// The terminal outcome of a generation call.
///
/// `content` is always non-empty: real provider output on success, fallback
/// content otherwise. Constructed exactly once when the orchestration loop
/// exits and never mutated after return.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub content: String,
    /// False only when fallback content was used.
    pub success: bool,
    /// Present when `success` is false.
    pub error: Option<ClassifiedError>,
    /// Provider attempts actually made (0 for validation/rate-limit denials).
    pub attempts_made: u32,
    pub fallback_used: bool,
    pub metadata: ResultMetadata,
}

/// Outcome of a rate-limit admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Slots left in the current window after this check.
    pub remaining: u32,
    /// Epoch milliseconds when the oldest counted request leaves the
    /// window. Present iff the check was denied.
    pub reset_at_ms: Option<i64>,
}
