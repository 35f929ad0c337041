// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Folio assistant.

use thiserror::Error;

/// The primary error type used across all Folio crates.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Generation engine errors (runtime unreachable, artifact download failure,
    /// malformed streaming response).
    #[error("engine error: {message}")]
    Engine {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A completion was requested while the model session is not ready.
    /// This is a contract violation by the caller, not a recoverable condition.
    #[error("model session not ready: {0}")]
    NotReady(String),

    /// A streaming completion failed mid-generation.
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Mail relay errors (SMTP transport failure, invalid submission).
    #[error("relay error: {message}")]
    Relay {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FolioError {
    /// Shorthand for an engine error with no underlying source.
    pub fn engine(message: impl Into<String>) -> Self {
        FolioError::Engine {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a generation error with no underlying source.
    pub fn generation(message: impl Into<String>) -> Self {
        FolioError::Generation {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_message() {
        let err = FolioError::engine("runtime unreachable");
        assert_eq!(err.to_string(), "engine error: runtime unreachable");

        let err = FolioError::NotReady("phase is loading".into());
        assert_eq!(err.to_string(), "model session not ready: phase is loading");
    }

    #[test]
    fn error_carries_source() {
        let io = std::io::Error::other("disk full");
        let err = FolioError::Engine {
            message: "artifact write failed".into(),
            source: Some(Box::new(io)),
        };
        assert!(std::error::Error::source(&err).is_some());
    }
}
