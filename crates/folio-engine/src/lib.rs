// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local generation engine for the Folio assistant.
//!
//! [`LocalEngine`] implements [`GenerationEngine`] against an
//! OpenAI-compatible local inference runtime (llama-server, mlc serve,
//! ollama's compat endpoint). Model artifacts are cached on disk by
//! [`cache::ArtifactCache`] and fetched once on first load.

pub mod cache;
pub mod client;
pub mod sse;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use folio_config::model::EngineConfig;
use folio_core::{
    ChatRequest, DeltaStream, EngineStatus, FolioError, GenerationEngine,
};
use tokio::sync::mpsc;
use tracing::info;

pub use cache::{ARTIFACT_PREFIX, ArtifactCache};
pub use client::RuntimeClient;
use types::CompletionRequest;

/// Generation engine backed by a local OpenAI-compatible runtime.
pub struct LocalEngine {
    client: RuntimeClient,
    cache: ArtifactCache,
    model: String,
    max_tokens: u32,
}

impl LocalEngine {
    /// Builds an engine from the `[engine]` config section.
    pub fn new(config: &EngineConfig) -> Result<Self, FolioError> {
        let client = RuntimeClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let cache = ArtifactCache::new(
            PathBuf::from(&config.cache_dir),
            config.model.clone(),
            config.artifact_url.clone(),
        );

        Ok(Self {
            client,
            cache,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl GenerationEngine for LocalEngine {
    fn name(&self) -> &str {
        "local-runtime"
    }

    async fn load(&self, progress: mpsc::Sender<String>) -> Result<(), FolioError> {
        let _ = progress
            .send(format!("loading model ({})...", self.model))
            .await;

        self.cache.ensure(&progress).await?;

        // The runtime must be up before the session can be declared ready.
        match self.client.health().await? {
            EngineStatus::Healthy => {}
            EngineStatus::Degraded(reason) => {
                let _ = progress.send(format!("runtime degraded: {reason}")).await;
            }
            EngineStatus::Unhealthy(reason) => {
                return Err(FolioError::engine(reason));
            }
        }

        info!(model = %self.model, "engine loaded");
        let _ = progress.send("model loaded".to_string()).await;
        Ok(())
    }

    async fn stream_chat(&self, request: ChatRequest) -> Result<DeltaStream, FolioError> {
        let wire_request = CompletionRequest {
            model: self.model.clone(),
            messages: request.messages,
            max_tokens: self.max_tokens,
            stream: true,
        };
        self.client.stream_completion(&wire_request).await
    }

    async fn reset_cache(&self) -> Result<(), FolioError> {
        self.cache.reset().await
    }

    async fn health_check(&self) -> Result<EngineStatus, FolioError> {
        self.client.health().await
    }
}
