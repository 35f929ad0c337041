// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation layer for the Folio assistant.
//!
//! [`ModelSession`] manages the generation engine's lifecycle
//! (Uninitialized -> Loading -> Ready / Failed) and exposes streaming
//! completions as cumulative text; [`ConversationController`] owns the
//! transcript and orchestrates retrieval, prompt assembly, and per-turn
//! generation on top of it.

pub mod controller;
pub mod prompt;
pub mod session;

pub use controller::{ChatSnapshot, ConversationController};
pub use session::{CompletionStream, ModelSession, SessionPhase};
