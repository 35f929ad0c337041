// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model artifact cache: download-once storage for local model weights.
//!
//! Artifacts live under `<cache_dir>/` in entries named
//! `<PREFIX><model>/`. First load downloads the configured artifact URL;
//! subsequent loads find the file on disk and skip the network entirely.
//! A corrupted or partial download is recovered by [`ArtifactCache::reset`],
//! which sweeps every prefix-keyed entry so the next start re-fetches.

use std::path::{Path, PathBuf};

use folio_core::FolioError;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Cache entries are keyed by this prefix so a reset never touches
/// unrelated files sharing the cache directory.
pub const ARTIFACT_PREFIX: &str = "folio-model-";

/// Manages model artifact download and path resolution.
pub struct ArtifactCache {
    cache_dir: PathBuf,
    model: String,
    artifact_url: Option<String>,
    /// Ensures the artifact is downloaded only once even with concurrent callers.
    init_guard: OnceCell<()>,
}

impl ArtifactCache {
    /// Creates a cache rooted at `cache_dir` for the given model.
    pub fn new(cache_dir: PathBuf, model: String, artifact_url: Option<String>) -> Self {
        Self {
            cache_dir,
            model,
            artifact_url,
            init_guard: OnceCell::new(),
        }
    }

    /// Directory holding this model's artifacts.
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(format!("{ARTIFACT_PREFIX}{}", self.model))
    }

    /// Path to the cached weights file.
    pub fn artifact_path(&self) -> PathBuf {
        self.model_dir().join("weights.bin")
    }

    /// True if the artifact is already on disk.
    pub fn is_cached(&self) -> bool {
        self.artifact_path().exists()
    }

    /// Ensures the artifact is downloaded and available.
    ///
    /// No-op when no artifact URL is configured (the runtime manages its own
    /// weights) or when the file already exists. Guarded by `OnceCell` so
    /// concurrent callers cannot race the download.
    pub async fn ensure(&self, progress: &tokio::sync::mpsc::Sender<String>) -> Result<(), FolioError> {
        let Some(url) = self.artifact_url.clone() else {
            return Ok(());
        };

        self.init_guard
            .get_or_try_init(|| async {
                if self.is_cached() {
                    return Ok(());
                }

                let _ = progress
                    .send(format!("downloading model artifact ({})...", self.model))
                    .await;

                let model_dir = self.model_dir();
                tokio::fs::create_dir_all(&model_dir).await.map_err(|e| {
                    FolioError::Engine {
                        message: format!("failed to create cache directory: {e}"),
                        source: Some(Box::new(e)),
                    }
                })?;

                let dest = self.artifact_path();
                match download_file(&url, &dest).await {
                    Ok(size) => {
                        info!(model = %self.model, size, "model artifact downloaded");
                        let _ = progress.send("model artifact ready".to_string()).await;
                        Ok(())
                    }
                    Err(e) => {
                        // Clean up partial download so the next attempt starts fresh.
                        let _ = tokio::fs::remove_file(&dest).await;
                        Err(e)
                    }
                }
            })
            .await?;

        Ok(())
    }

    /// Removes every prefix-keyed entry under the cache directory.
    ///
    /// Used to recover from a corrupted or partial download; the caller is
    /// expected to restart so the next load re-fetches from scratch.
    pub async fn reset(&self) -> Result<(), FolioError> {
        let mut entries = match tokio::fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            // Nothing cached at all counts as a successful reset.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(FolioError::Engine {
                    message: format!("failed to read cache directory: {e}"),
                    source: Some(Box::new(e)),
                });
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await.map_err(|e| FolioError::Engine {
            message: format!("failed to enumerate cache directory: {e}"),
            source: Some(Box::new(e)),
        })? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(ARTIFACT_PREFIX) {
                continue;
            }

            let path = entry.path();
            let result = if path.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove cache entry");
                    return Err(FolioError::Engine {
                        message: format!("failed to remove cache entry {}: {e}", path.display()),
                        source: Some(Box::new(e)),
                    });
                }
            }
        }

        info!(removed, "model artifact cache cleared");
        Ok(())
    }
}

/// Download a file from a URL to a local path.
async fn download_file(url: &str, dest: &Path) -> Result<usize, FolioError> {
    let response = reqwest::get(url).await.map_err(|e| FolioError::Engine {
        message: format!("failed to download {url}: {e}"),
        source: Some(Box::new(e)),
    })?;

    if !response.status().is_success() {
        return Err(FolioError::engine(format!(
            "download failed with status {}: {url}",
            response.status()
        )));
    }

    let bytes = response.bytes().await.map_err(|e| FolioError::Engine {
        message: format!("failed to read artifact body: {e}"),
        source: Some(Box::new(e)),
    })?;

    tokio::fs::write(dest, &bytes).await.map_err(|e| FolioError::Engine {
        message: format!("failed to write artifact to {}: {e}", dest.display()),
        source: Some(Box::new(e)),
    })?;

    Ok(bytes.len())
}
