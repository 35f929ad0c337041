// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, URLs, and non-zero limits.

use crate::ConfigError;
use crate::model::FolioConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FolioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.assistant.retrieval_top_n == 0 {
        errors.push(ConfigError::Validation {
            message: "assistant.retrieval_top_n must be at least 1".to_string(),
        });
    }

    if config.engine.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.max_tokens must be at least 1".to_string(),
        });
    }

    let base_url = config.engine.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "engine.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("engine.base_url `{base_url}` must be an http(s) URL"),
        });
    }

    if config.engine.cache_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "engine.cache_dir must not be empty".to_string(),
        });
    }

    let host = config.relay.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "relay.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("relay.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // The relay only works as a unit: if SMTP is configured, a recipient
    // must be too, and vice versa.
    if config.relay.smtp_host.is_some() && config.relay.recipient.is_none() {
        errors.push(ConfigError::Validation {
            message: "relay.recipient is required when relay.smtp_host is set".to_string(),
        });
    }
    if config.relay.recipient.is_some() && config.relay.smtp_host.is_none() {
        errors.push(ConfigError::Validation {
            message: "relay.smtp_host is required when relay.recipient is set".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
