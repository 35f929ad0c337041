// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generation engine boundary.
//!
//! Folio treats the on-device text-generation runtime as an external
//! capability: load it once, stream completions from it, clear its cached
//! artifacts when a download went bad. Everything behind this trait is
//! opaque to the session and controller layers.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;
use tokio::sync::mpsc;

use crate::error::FolioError;
use crate::types::{ChatRequest, EngineStatus, StreamDelta};

/// A stream of incremental completion fragments.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<StreamDelta, FolioError>> + Send>>;

/// The on-device generation capability consumed by the model session.
#[async_trait]
pub trait GenerationEngine: Send + Sync + 'static {
    /// Human-readable engine name for logs and progress text.
    fn name(&self) -> &str;

    /// Loads the engine: fetches model artifacts into the local cache if
    /// missing and verifies the runtime is reachable.
    ///
    /// Coarse textual progress milestones are pushed through `progress`.
    /// Not retried automatically on failure; recovery is an explicit
    /// [`reset_cache`](GenerationEngine::reset_cache) plus restart.
    async fn load(&self, progress: mpsc::Sender<String>) -> Result<(), FolioError>;

    /// Issues a streaming completion request.
    ///
    /// The returned stream yields delta fragments in emission order and is
    /// finite; it terminates after a fragment with `done == true` or an error.
    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, FolioError>;

    /// Removes cached model artifacts keyed by the engine's known prefix so
    /// a corrupted or partial download can be retried from scratch.
    async fn reset_cache(&self) -> Result<(), FolioError>;

    /// Checks whether the underlying runtime is reachable.
    async fn health_check(&self) -> Result<EngineStatus, FolioError>;
}
