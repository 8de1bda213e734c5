// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fallback content templates keyed by platform and content type.
//!
//! Selection order: exact `(platform, content_type)` template, then the
//! platform default, then the global default. Every template is a
//! non-empty constant, so synthesis can never produce an empty string.

use postloom_core::{ContentType, GenerationRequest, Platform};
use tracing::debug;

use crate::topic::{extract_topic_phrase, hashtag_token};

/// Used when even the platform is unrecognized at a call site working
/// with raw data. With the closed [`Platform`] enum this is only reachable
/// through the platform-default table being extended carelessly, but the
/// ladder keeps the never-empty guarantee structural.
const GLOBAL_DEFAULT: &str =
    "We're putting together something fresh on {topic}. Stay tuned — it's worth the wait.";

/// Exact templates for specific (platform, content type) pairs.
const TEMPLATES: &[(Platform, ContentType, &str)] = &[
    (
        Platform::Twitter,
        ContentType::Post,
        "Quick take on {topic}: more on this soon. What's your experience been? #{hashtag}",
    ),
    (
        Platform::Twitter,
        ContentType::Thread,
        "1/ Let's talk about {topic}. A thread is coming together — follow along. #{hashtag}",
    ),
    (
        Platform::Instagram,
        ContentType::Caption,
        "Behind the scenes with {topic} ✨ More to share soon. #{hashtag} #comingsoon",
    ),
    (
        Platform::Instagram,
        ContentType::Story,
        "Sneak peek: {topic} 👀 Full story dropping soon!",
    ),
    (
        Platform::LinkedIn,
        ContentType::Post,
        "Some thoughts on {topic} are in the works. What has your team learned about this? I'd value your perspective.",
    ),
    (
        Platform::Facebook,
        ContentType::Post,
        "We've been working on {topic} and can't wait to share the details. Watch this space!",
    ),
    (
        Platform::TikTok,
        ContentType::Caption,
        "POV: you're about to learn everything about {topic} 🎬 #{hashtag} #fyp",
    ),
];

/// Per-platform defaults when no exact template matches.
const PLATFORM_DEFAULTS: &[(Platform, &str)] = &[
    (
        Platform::Twitter,
        "New thoughts on {topic} coming soon. #{hashtag}",
    ),
    (
        Platform::Instagram,
        "Something new about {topic} is on the way ✨ #{hashtag}",
    ),
    (
        Platform::LinkedIn,
        "An update on {topic} is coming soon. Looking forward to the discussion.",
    ),
    (
        Platform::Facebook,
        "Stay tuned — an update on {topic} is coming soon!",
    ),
    (
        Platform::TikTok,
        "New content about {topic} loading... 🎬 #{hashtag}",
    ),
];

/// Synthesize deterministic, platform-appropriate placeholder content.
///
/// Never returns an empty string and never panics. Given the same request,
/// the output is byte-identical: no randomness, no clock.
pub fn synthesize(request: &GenerationRequest) -> String {
    let template = template_for(request.platform, request.content_type)
        .or_else(|| platform_default(request.platform))
        .unwrap_or(GLOBAL_DEFAULT);

    let phrase = extract_topic_phrase(&request.topic);
    let hashtag = hashtag_token(&phrase);

    debug!(
        platform = %request.platform,
        content_type = %request.content_type,
        "synthesizing fallback content"
    );

    template
        .replace("{topic}", &phrase)
        .replace("{hashtag}", &hashtag)
}

/// Exact template lookup.
fn template_for(platform: Platform, content_type: ContentType) -> Option<&'static str> {
    TEMPLATES
        .iter()
        .find(|(p, c, _)| *p == platform && *c == content_type)
        .map(|(_, _, t)| *t)
}

/// Platform-default lookup.
fn platform_default(platform: Platform) -> Option<&'static str> {
    PLATFORM_DEFAULTS
        .iter()
        .find(|(p, _)| *p == platform)
        .map(|(_, t)| *t)
}
