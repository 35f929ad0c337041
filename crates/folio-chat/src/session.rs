// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model session: lifecycle management for the generation engine.
//!
//! One session exists per process. It goes through phases
//! Uninitialized -> Loading -> Ready, with Failed reachable from Loading.
//! Ready is terminal-success; Failed is terminal until an explicit cache
//! reset plus restart. Knowledge preparation is part of the same atomic
//! initialization step as the engine load, so there is no partial-success
//! state between Loading and Ready.

use std::sync::Arc;

use folio_config::model::AssistantConfig;
use folio_core::{ChatMessage, ChatRequest, FolioError, GenerationEngine};
use folio_knowledge::{KnowledgeStore, SAMPLE_KNOWLEDGE};
use futures::StreamExt;
use futures::stream::Stream;
use std::pin::Pin;
use tokio::sync::{Mutex, OnceCell, mpsc, watch};
use tracing::{info, warn};

/// A finite stream of cumulative response text: each item is the full
/// response generated so far, not a delta.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String, FolioError>> + Send>>;

/// Phases of the model session lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// No load has been triggered yet.
    Uninitialized,
    /// Engine load or knowledge preparation in progress; carries the most
    /// recent progress text.
    Loading(String),
    /// Engine loaded and knowledge prepared; completions may be issued.
    Ready,
    /// Initialization failed; carries the error text. Recovery requires an
    /// explicit cache reset and restart.
    Failed(String),
}

impl SessionPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, SessionPhase::Ready)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Uninitialized => write!(f, "uninitialized"),
            SessionPhase::Loading(progress) => write!(f, "loading: {progress}"),
            SessionPhase::Ready => write!(f, "ready"),
            SessionPhase::Failed(error) => write!(f, "failed: {error}"),
        }
    }
}

/// Lifecycle-managed handle to the on-device generation capability.
///
/// Constructed once at the composition root and shared by reference;
/// idempotent initialization enforces the single-load invariant without a
/// global variable.
pub struct ModelSession {
    engine: Arc<dyn GenerationEngine>,
    config: AssistantConfig,
    phase_tx: watch::Sender<SessionPhase>,
    knowledge: OnceCell<KnowledgeStore>,
    /// Serializes concurrent initialize callers; phases make the winner's
    /// progress visible to the losers.
    init_lock: Mutex<()>,
}

impl ModelSession {
    /// Creates a session over the given engine. No work happens until
    /// [`initialize`](ModelSession::initialize).
    pub fn new(engine: Arc<dyn GenerationEngine>, config: AssistantConfig) -> Self {
        let (phase_tx, _) = watch::channel(SessionPhase::Uninitialized);
        Self {
            engine,
            config,
            phase_tx,
            knowledge: OnceCell::new(),
            init_lock: Mutex::new(()),
        }
    }

    /// Subscribes to phase transitions, including Loading progress text.
    pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
        self.phase_tx.subscribe()
    }

    /// The current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase_tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.phase().is_ready()
    }

    /// The knowledge store, available once the session is Ready.
    pub fn knowledge(&self) -> Option<&KnowledgeStore> {
        self.knowledge.get()
    }

    /// Loads the engine and prepares the knowledge store.
    ///
    /// Idempotent: a call while Ready or Loading performs no second engine
    /// load and reports no additional progress. A call after Failed returns
    /// the stored error without retrying; the only recovery path is
    /// [`reset_cache`](ModelSession::reset_cache) plus restart.
    pub async fn initialize(&self) -> Result<(), FolioError> {
        match self.phase() {
            SessionPhase::Ready | SessionPhase::Loading(_) => return Ok(()),
            SessionPhase::Failed(error) => return Err(FolioError::engine(error)),
            SessionPhase::Uninitialized => {}
        }

        let _guard = self.init_lock.lock().await;
        // A racing caller may have finished while we waited for the lock.
        if !matches!(self.phase(), SessionPhase::Uninitialized) {
            return Ok(());
        }

        self.phase_tx
            .send_replace(SessionPhase::Loading("loading model...".to_string()));

        match self.run_initialization().await {
            Ok(()) => {
                self.phase_tx.send_replace(SessionPhase::Ready);
                info!(engine = self.engine.name(), "model session ready");
                Ok(())
            }
            Err(e) => {
                let text = e.to_string();
                warn!(error = %text, "model session initialization failed");
                self.phase_tx.send_replace(SessionPhase::Failed(text));
                Err(e)
            }
        }
    }

    async fn run_initialization(&self) -> Result<(), FolioError> {
        // Forward engine progress milestones into the phase channel.
        let (progress_tx, mut progress_rx) = mpsc::channel::<String>(16);
        let phase_tx = self.phase_tx.clone();
        let forwarder = tokio::spawn(async move {
            while let Some(text) = progress_rx.recv().await {
                phase_tx.send_replace(SessionPhase::Loading(text));
            }
        });

        let load_result = self.engine.load(progress_tx).await;
        let _ = forwarder.await;
        load_result?;

        self.phase_tx.send_replace(SessionPhase::Loading(
            "model loaded, preparing knowledge...".to_string(),
        ));

        let store = match self.config.knowledge_file {
            Some(ref path) => KnowledgeStore::load_from_file(path).await?,
            None => KnowledgeStore::load(SAMPLE_KNOWLEDGE),
        };
        // First initialization to get here wins; racing callers are already
        // excluded by the init lock.
        let _ = self.knowledge.set(store);

        Ok(())
    }

    /// Issues the transcript to the engine and returns a stream of
    /// cumulative response text.
    ///
    /// Must only be called when Ready; any other phase is a caller contract
    /// violation and fails with [`FolioError::NotReady`]. The stream is
    /// finite and not restartable; increments arrive in emission order and
    /// each extends the previous one.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<CompletionStream, FolioError> {
        let phase = self.phase();
        if !phase.is_ready() {
            return Err(FolioError::NotReady(format!("session phase is {phase}")));
        }

        let deltas = self.engine.stream_chat(ChatRequest { messages }).await?;

        let cumulative = deltas
            .scan(String::new(), |acc, item| {
                let out = match item {
                    Ok(delta) => match delta.content {
                        Some(ref fragment) if !fragment.is_empty() => {
                            acc.push_str(fragment);
                            Some(Some(Ok(acc.clone())))
                        }
                        // Fragments without new text (keep-alives, the done
                        // marker) produce no increment.
                        _ => Some(None),
                    },
                    Err(e) => Some(Some(Err(e))),
                };
                futures::future::ready(out)
            })
            .filter_map(futures::future::ready);

        Ok(Box::pin(cumulative))
    }

    /// Clears cached model artifacts so a corrupted download can be retried.
    ///
    /// The session object itself is not safely reusable afterwards; the
    /// caller must restart the process, after which a fresh session observes
    /// Uninitialized and reports progress from the first milestone again.
    pub async fn reset_cache(&self) -> Result<(), FolioError> {
        self.engine.reset_cache().await
    }
}
