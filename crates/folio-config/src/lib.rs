// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Folio assistant.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use folio_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Engine model: {}", config.engine.model);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

use thiserror::Error;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::FolioConfig;

/// A single configuration diagnostic.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML or environment input could not be deserialized.
    #[error("{message}")]
    Parse { message: String },

    /// A semantic constraint on a parsed value failed.
    #[error("{message}")]
    Validation { message: String },
}

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point that:
/// 1. Loads config from TOML files + env vars via Figment
/// 2. On success: runs post-deserialization validation
/// 3. On Figment error: converts to [`ConfigError::Parse`] diagnostics
///
/// Returns either a valid `FolioConfig` or a list of diagnostic errors.
pub fn load_and_validate() -> Result<FolioConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(figment_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<FolioConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(figment_errors(err)),
    }
}

/// Render collected configuration errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    eprintln!("folio: invalid configuration:");
    for err in errors {
        eprintln!("  - {err}");
    }
}

fn figment_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_inline_config_loads() {
        let config = load_and_validate_str(
            r#"
            [assistant]
            owner_name = "Yeamin"
            retrieval_top_n = 5
        "#,
        )
        .expect("config should validate");
        assert_eq!(config.assistant.owner_name, "Yeamin");
        assert_eq!(config.assistant.retrieval_top_n, 5);
    }

    #[test]
    fn invalid_value_surfaces_validation_error() {
        let errors = load_and_validate_str(
            r#"
            [engine]
            max_tokens = 0
        "#,
        )
        .unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| matches!(e, ConfigError::Validation { .. }))
        );
    }

    #[test]
    fn parse_error_surfaces_as_parse_variant() {
        let errors = load_and_validate_str("engine = 42").unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|e| matches!(e, ConfigError::Parse { .. })));
    }
}
