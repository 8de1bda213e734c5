// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Merge order: compiled defaults, then `postloom.toml` in the working
//! directory, then `POSTLOOM_*` environment variable overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PostloomConfig;

/// Load configuration from `postloom.toml` with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `./postloom.toml`
/// 3. `POSTLOOM_*` environment variables
pub fn load_config() -> Result<PostloomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostloomConfig::default()))
        .merge(Toml::file("postloom.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<PostloomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostloomConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostloomConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostloomConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `POSTLOOM_ENGINE_MAX_RETRIES` must map
/// to `engine.max_retries`, not `engine.max.retries`.
fn env_provider() -> Env {
    Env::prefixed("POSTLOOM_").map(|key| map_env_key(key.as_str()).into())
}

/// Map a prefix-stripped environment key to a dotted config path.
///
/// `limits_` keys carry an action name between the section and the field,
/// and action names may themselves contain underscores, so the field is
/// recognized from the tail: `limits_generate_content_max_requests` maps
/// to `limits.generate_content.max_requests`.
fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    if let Some(rest) = key.strip_prefix("limits_") {
        if let Some(action) = rest.strip_suffix("_max_requests") {
            return format!("limits.{action}.max_requests");
        }
        if let Some(action) = rest.strip_suffix("_window_ms") {
            return format!("limits.{action}.window_ms");
        }
        return format!("limits.{rest}");
    }
    key.replacen("engine_", "engine.", 1)
        .replacen("backoff_", "backoff.", 1)
}
