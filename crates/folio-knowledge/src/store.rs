// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge store: line-based chunking of the portfolio knowledge document.
//!
//! The document is free text; each non-blank line becomes one retrievable
//! chunk. Chunks are immutable for the lifetime of the session.

use folio_core::FolioError;
use tracing::info;

/// A compiled-in sample knowledge document, used when no
/// `assistant.knowledge_file` is configured.
pub const SAMPLE_KNOWLEDGE: &str = include_str!("sample_knowledge.txt");

/// The immutable set of knowledge chunks prepared at session initialization.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    chunks: Vec<String>,
}

impl KnowledgeStore {
    /// Builds a store by splitting `document` on line breaks and discarding
    /// whitespace-only lines. Order is preserved. Pure and infallible; a
    /// document with no non-blank lines yields an empty store.
    pub fn load(document: &str) -> Self {
        let chunks: Vec<String> = document
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();

        info!(chunks = chunks.len(), "knowledge chunks prepared");
        Self { chunks }
    }

    /// Loads the knowledge document from `path` and chunks it.
    pub async fn load_from_file(path: &str) -> Result<Self, FolioError> {
        let document = tokio::fs::read_to_string(path).await.map_err(|e| {
            FolioError::Config(format!("failed to read knowledge file `{path}`: {e}"))
        })?;
        Ok(Self::load(&document))
    }

    /// The prepared chunks, in original document order.
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
