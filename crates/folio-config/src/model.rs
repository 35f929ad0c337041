// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Folio.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Folio configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Assistant identity, prompt, and retrieval settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Local generation runtime settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Contact-form mail relay settings.
    #[serde(default)]
    pub relay: RelayConfig,
}

/// Assistant identity, prompt, and retrieval configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    /// Display name of the assistant's owner, used in the default persona.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Inline persona prompt. Overridden by `system_prompt_file` if both set.
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Path to a file containing the persona prompt.
    /// Takes precedence over `system_prompt` if both are set.
    #[serde(default)]
    pub system_prompt_file: Option<String>,

    /// Path to the knowledge document about the portfolio owner.
    /// `None` falls back to the compiled-in sample document.
    #[serde(default)]
    pub knowledge_file: Option<String>,

    /// Number of knowledge chunks retrieved per user turn.
    #[serde(default = "default_retrieval_top_n")]
    pub retrieval_top_n: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            owner_name: default_owner_name(),
            log_level: default_log_level(),
            system_prompt: None,
            system_prompt_file: None,
            knowledge_file: None,
            retrieval_top_n: default_retrieval_top_n(),
        }
    }
}

fn default_owner_name() -> String {
    "the portfolio owner".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_retrieval_top_n() -> usize {
    3
}

/// Local generation runtime configuration.
///
/// The engine talks to an OpenAI-compatible local inference server
/// (llama-server, mlc serve, ollama with the compat endpoint) and caches
/// model artifacts on disk.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL of the local runtime.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier understood by the runtime.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Directory holding cached model artifacts.
    /// Defaults to `<data_dir>/folio/models`.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// URL of the model artifact to fetch into the cache on first load.
    /// `None` skips the download step (runtime manages its own weights).
    #[serde(default)]
    pub artifact_url: Option<String>,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            cache_dir: default_cache_dir(),
            artifact_url: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_model() -> String {
    "llama-3.2-1b-instruct-q4".to_string()
}

fn default_max_tokens() -> u32 {
    512
}

fn default_cache_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("folio").join("models"))
        .unwrap_or_else(|| std::path::PathBuf::from(".folio/models"))
        .display()
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

/// Contact-form mail relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RelayConfig {
    /// Host address to bind.
    #[serde(default = "default_relay_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_relay_port")]
    pub port: u16,

    /// SMTP server hostname. `None` disables the relay.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username.
    #[serde(default)]
    pub smtp_username: Option<String>,

    /// SMTP password. Prefer setting via `FOLIO_RELAY_SMTP_PASSWORD`.
    #[serde(default)]
    pub smtp_password: Option<String>,

    /// Inbox that receives forwarded contact-form submissions.
    #[serde(default)]
    pub recipient: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: default_relay_host(),
            port: default_relay_port(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            recipient: None,
        }
    }
}

fn default_relay_host() -> String {
    "127.0.0.1".to_string()
}

fn default_relay_port() -> u16 {
    5000
}

fn default_smtp_port() -> u16 {
    587
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = FolioConfig::default();
        assert_eq!(config.assistant.retrieval_top_n, 3);
        assert_eq!(config.engine.max_tokens, 512);
        assert_eq!(config.relay.port, 5000);
        assert!(config.relay.smtp_host.is_none());
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
            [assistant]
            owner_name = "Yeamin"
            typo_key = true
        "#;
        let result: Result<FolioConfig, _> = toml::from_str(toml);
        assert!(result.is_err(), "unknown key must be rejected");
    }
}
