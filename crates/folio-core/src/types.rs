// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the Folio workspace: conversation messages
//! and the generation engine wire types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The author of a conversation message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// The body of a transcript message.
///
/// The assistant's in-progress reply is `Partial` while its stream is being
/// applied; every other message (and a finished reply) is `Text`. Modeling
/// the streaming reply as its own variant keeps transcript mutation explicit
/// instead of relying on last-index overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageContent {
    /// Finalized text.
    Text(String),
    /// An assistant reply still being generated (cumulative text so far).
    Partial(String),
}

impl MessageContent {
    /// Returns the text regardless of completion state.
    pub fn as_str(&self) -> &str {
        match self {
            MessageContent::Text(s) | MessageContent::Partial(s) => s,
        }
    }

    /// True while the message is still receiving stream increments.
    pub fn is_partial(&self) -> bool {
        matches!(self, MessageContent::Partial(_))
    }
}

/// A single role-tagged unit of conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    /// A finalized message with the given role and text.
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
        }
    }

    /// An empty assistant placeholder awaiting stream increments.
    pub fn assistant_placeholder() -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Partial(String::new()),
        }
    }

    /// The message text regardless of completion state.
    pub fn content_str(&self) -> &str {
        self.content.as_str()
    }
}

/// One message as sent to the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A completion request issued to the generation engine.
///
/// The model identifier and generation limits are fixed at engine
/// construction; per-call input is the transcript alone.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Full transcript including the system instruction, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// A single incremental fragment from a streaming completion.
///
/// Fragments are deltas at the engine boundary; the model session folds
/// them into cumulative text for consumers.
#[derive(Debug, Clone, Default)]
pub struct StreamDelta {
    /// New text in this fragment, if any.
    pub content: Option<String>,
    /// True when the engine has signaled end of stream.
    pub done: bool,
}

/// Health reported by the generation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    /// Runtime reachable and serving the configured model.
    Healthy,
    /// Runtime reachable but degraded (e.g. model still warming up).
    Degraded(String),
    /// Runtime not reachable.
    Unhealthy(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_display_round_trip() {
        for role in [Role::System, Role::User, Role::Assistant] {
            let s = role.to_string();
            let parsed = Role::from_str(&s).expect("should parse back");
            assert_eq!(role, parsed);
        }
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn role_serializes_lowercase() {
        let json = serde_json::to_string(&Role::User).expect("should serialize");
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn placeholder_is_empty_partial() {
        let msg = Message::assistant_placeholder();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.content.is_partial());
        assert_eq!(msg.content_str(), "");
    }

    #[test]
    fn content_as_str_covers_both_variants() {
        assert_eq!(MessageContent::Text("done".into()).as_str(), "done");
        assert_eq!(MessageContent::Partial("hal".into()).as_str(), "hal");
        assert!(!MessageContent::Text("done".into()).is_partial());
    }
}
