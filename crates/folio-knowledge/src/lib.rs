// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge store and retriever for the Folio assistant.
//!
//! A static free-text document about the portfolio owner is split into
//! line-based chunks at session initialization; per user turn, the
//! retriever selects the most query-relevant chunks by lexical overlap.

pub mod retriever;
pub mod store;

pub use retriever::{DEFAULT_TOP_N, retrieve};
pub use store::{KnowledgeStore, SAMPLE_KNOWLEDGE};
