// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation engine for deterministic testing.
//!
//! `MockEngine` implements `GenerationEngine` with pre-scripted replies,
//! enabling fast, CI-runnable tests without a local inference runtime.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;
use tokio::sync::{Mutex, mpsc};

use folio_core::{
    ChatRequest, DeltaStream, EngineStatus, FolioError, GenerationEngine, StreamDelta,
};

/// One scripted reply popped per `stream_chat` call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Stream the given fragments in order, then signal completion.
    Stream(Vec<String>),
    /// Stream the given fragments, then fail with the given message.
    FailAfter(Vec<String>, String),
}

impl MockReply {
    /// A reply streamed as a single fragment.
    pub fn text(text: impl Into<String>) -> Self {
        MockReply::Stream(vec![text.into()])
    }

    /// A reply streamed fragment by fragment.
    pub fn fragments(fragments: &[&str]) -> Self {
        MockReply::Stream(fragments.iter().map(|s| s.to_string()).collect())
    }
}

/// A mock generation engine that returns pre-scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a default
/// "mock reply" text is streamed. Load behavior is configurable so session
/// initialization failure paths can be exercised.
pub struct MockEngine {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    load_error: Option<String>,
    load_calls: AtomicUsize,
    transcripts: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockEngine {
    /// A mock engine with an empty reply queue and a successful load.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            load_error: None,
            load_calls: AtomicUsize::new(0),
            transcripts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock engine pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::new()
        }
    }

    /// Makes `load` fail with the given message.
    pub fn failing_load(message: impl Into<String>) -> Self {
        Self {
            load_error: Some(message.into()),
            ..Self::new()
        }
    }

    /// Appends a reply to the end of the queue.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of times `load` has been invoked.
    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    /// Requests received by `stream_chat`, oldest first.
    pub async fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.transcripts.lock().await.clone()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::text("mock reply"))
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationEngine for MockEngine {
    fn name(&self) -> &str {
        "mock-engine"
    }

    async fn load(&self, progress: mpsc::Sender<String>) -> Result<(), FolioError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        let _ = progress.send("loading model (mock)...".to_string()).await;
        if let Some(ref message) = self.load_error {
            return Err(FolioError::engine(message.clone()));
        }
        let _ = progress.send("model loaded".to_string()).await;
        Ok(())
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, FolioError> {
        self.transcripts.lock().await.push(request);

        let reply = self.next_reply().await;
        let items: Vec<Result<StreamDelta, FolioError>> = match reply {
            MockReply::Stream(fragments) => fragments
                .into_iter()
                .map(|fragment| {
                    Ok(StreamDelta {
                        content: Some(fragment),
                        done: false,
                    })
                })
                .chain(std::iter::once(Ok(StreamDelta {
                    content: None,
                    done: true,
                })))
                .collect(),
            MockReply::FailAfter(fragments, error) => fragments
                .into_iter()
                .map(|fragment| {
                    Ok(StreamDelta {
                        content: Some(fragment),
                        done: false,
                    })
                })
                .chain(std::iter::once(Err(FolioError::generation(error))))
                .collect(),
        };

        Ok(Box::pin(stream::iter(items)))
    }

    async fn reset_cache(&self) -> Result<(), FolioError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<EngineStatus, FolioError> {
        Ok(EngineStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    async fn collect(stream: DeltaStream) -> Vec<Result<StreamDelta, FolioError>> {
        stream.collect().await
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let engine = MockEngine::new();
        let deltas = collect(
            engine
                .stream_chat(ChatRequest { messages: vec![] })
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(
            deltas[0].as_ref().unwrap().content.as_deref(),
            Some("mock reply")
        );
        assert!(deltas[1].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn scripted_fragments_stream_in_order() {
        let engine = MockEngine::with_replies(vec![MockReply::fragments(&["Hel", "lo"])]);
        let deltas = collect(
            engine
                .stream_chat(ChatRequest { messages: vec![] })
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(deltas.len(), 3);
        assert_eq!(deltas[0].as_ref().unwrap().content.as_deref(), Some("Hel"));
        assert_eq!(deltas[1].as_ref().unwrap().content.as_deref(), Some("lo"));
        assert!(deltas[2].as_ref().unwrap().done);
    }

    #[tokio::test]
    async fn fail_after_emits_fragments_then_error() {
        let engine = MockEngine::with_replies(vec![MockReply::FailAfter(
            vec!["Hel".into()],
            "boom".into(),
        )]);
        let deltas = collect(
            engine
                .stream_chat(ChatRequest { messages: vec![] })
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(deltas.len(), 2);
        assert!(deltas[0].is_ok());
        assert!(matches!(
            deltas[1].as_ref().unwrap_err(),
            FolioError::Generation { .. }
        ));
    }

    #[tokio::test]
    async fn failing_load_reports_error_and_counts_calls() {
        let engine = MockEngine::failing_load("no weights");
        let (tx, _rx) = mpsc::channel(8);
        assert!(engine.load(tx).await.is_err());
        assert_eq!(engine.load_calls(), 1);
    }
}
