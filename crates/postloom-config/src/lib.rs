// SPDX-FileCopyrightText: 2026 Postloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Postloom generation core.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), environment variable overrides, and range
//! checks on every tunable the engine recognizes.
//!
//! # Usage
//!
//! ```no_run
//! use postloom_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("max retries: {}", config.engine.max_retries);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ActionLimit, BackoffConfig, EngineConfig, LimitsConfig, PostloomConfig};
pub use validation::{ConfigError, validate_config};

/// Load configuration from `postloom.toml` + env vars and validate it.
pub fn load_and_validate() -> Result<PostloomConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<PostloomConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Parse(err.to_string())]),
    }
}
