// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation controller: transcript ownership and turn orchestration.
//!
//! The controller owns the visible transcript and the "generating" flag,
//! triggers lazy session initialization on first open, and drives one
//! streaming completion at a time. Every mutation publishes a fresh
//! [`ChatSnapshot`] on a watch channel for the presentation layer.
//!
//! All initialization and generation errors are absorbed here and become
//! transcript entries or phase text; nothing propagates to the
//! presentation layer as a crash.

use std::sync::Arc;

use folio_core::{ChatMessage, FolioError, Message, MessageContent, Role};
use folio_knowledge::retrieve;
use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::prompt;
use crate::session::ModelSession;

/// A point-in-time view of the conversation for rendering.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    /// The transcript, oldest first. While a generation is in progress the
    /// streaming assistant message is the last element.
    pub messages: Vec<Message>,
    /// True while a completion is being streamed.
    pub generating: bool,
}

/// Owns the transcript and orchestrates retrieval and generation.
pub struct ConversationController {
    session: Arc<ModelSession>,
    persona: String,
    top_n: usize,
    transcript: Vec<Message>,
    generating: bool,
    snapshot_tx: watch::Sender<ChatSnapshot>,
}

impl ConversationController {
    /// Creates a controller over an existing session.
    ///
    /// `greeting`, when set, seeds the transcript with an assistant welcome
    /// message before any model work happens.
    pub fn new(
        session: Arc<ModelSession>,
        persona: String,
        top_n: usize,
        greeting: Option<String>,
    ) -> Self {
        let mut transcript = Vec::new();
        if let Some(text) = greeting {
            transcript.push(Message::text(Role::Assistant, text));
        }
        let (snapshot_tx, _) = watch::channel(ChatSnapshot {
            messages: transcript.clone(),
            generating: false,
        });
        Self {
            session,
            persona,
            top_n,
            transcript,
            generating: false,
            snapshot_tx,
        }
    }

    /// Subscribes to transcript and flag changes.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// The transcript, oldest first.
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// True while a completion is being streamed.
    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// The session this controller drives.
    pub fn session(&self) -> &Arc<ModelSession> {
        &self.session
    }

    /// Triggers session initialization.
    ///
    /// Idempotent (the session guards repeat calls); initialization failure
    /// is absorbed into the session's Failed phase, which subscribers render
    /// as progress text together with the cache-reset hint.
    pub async fn open(&self) {
        if let Err(e) = self.session.initialize().await {
            warn!(error = %e, "session initialization failed");
        }
    }

    /// Processes one user turn.
    ///
    /// Whitespace-only input and turns submitted while a generation is in
    /// flight are silently dropped (no transcript mutation, no queuing).
    /// Calling before the session is Ready is a contract violation and
    /// returns [`FolioError::NotReady`]. Generation failures do not error:
    /// the partial assistant text is retained and a system message
    /// describing the failure is appended.
    pub async fn send(&mut self, user_text: &str) -> Result<(), FolioError> {
        let trimmed = user_text.trim();
        if trimmed.is_empty() {
            debug!("ignoring empty input");
            return Ok(());
        }
        if self.generating {
            debug!("ignoring send while a generation is in flight");
            return Ok(());
        }
        if !self.session.is_ready() {
            return Err(FolioError::NotReady(format!(
                "session phase is {}",
                self.session.phase()
            )));
        }

        self.transcript.push(Message::text(Role::User, trimmed));
        self.transcript.push(Message::assistant_placeholder());
        self.generating = true;
        self.publish();

        let messages = self.build_request(trimmed);
        let result = self.session.complete(messages).await;

        let mut stream = match result {
            Ok(stream) => stream,
            Err(e) => {
                self.fail_turn(&e);
                return Ok(());
            }
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(cumulative) => {
                    self.overwrite_placeholder(MessageContent::Partial(cumulative));
                    self.publish();
                }
                Err(e) => {
                    self.fail_turn(&e);
                    return Ok(());
                }
            }
        }

        // Finalize: the streaming message becomes a completed reply.
        let full = self
            .streaming_message()
            .map(|m| m.content_str().to_string())
            .unwrap_or_default();
        self.overwrite_placeholder(MessageContent::Text(full));
        self.generating = false;
        self.publish();
        Ok(())
    }

    /// Assembles the per-turn request: augmented system instruction first,
    /// then the full transcript (minus the empty placeholder), built fresh
    /// each turn.
    fn build_request(&self, query: &str) -> Vec<ChatMessage> {
        let context = self
            .session
            .knowledge()
            .map(|store| retrieve(store, query, self.top_n))
            .unwrap_or_default();
        let system = prompt::build_system_prompt(&self.persona, &context);

        let mut messages = vec![ChatMessage {
            role: Role::System,
            content: system,
        }];
        messages.extend(
            self.transcript
                .iter()
                .filter(|m| !m.content.is_partial())
                .map(|m| ChatMessage {
                    role: m.role,
                    content: m.content_str().to_string(),
                }),
        );
        messages
    }

    /// The in-progress assistant message, while one exists.
    fn streaming_message(&self) -> Option<&Message> {
        self.transcript.last().filter(|m| m.content.is_partial())
    }

    fn overwrite_placeholder(&mut self, content: MessageContent) {
        if let Some(last) = self.transcript.last_mut()
            && last.content.is_partial()
        {
            last.content = content;
        }
    }

    /// Generation failed: keep the partial assistant text as-is, append a
    /// system message describing the failure, clear the flag.
    fn fail_turn(&mut self, error: &FolioError) {
        warn!(error = %error, "generation failed");
        self.transcript.push(Message::text(
            Role::System,
            format!("Sorry, something went wrong: {error}"),
        ));
        self.generating = false;
        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(ChatSnapshot {
            messages: self.transcript.clone(),
            generating: self.generating,
        });
    }
}
