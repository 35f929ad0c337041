// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Folio portfolio assistant.
//!
//! This crate provides the shared error type, conversation message types,
//! and the [`GenerationEngine`] boundary trait implemented by concrete
//! engine backends and test doubles.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::FolioError;
pub use traits::{DeltaStream, GenerationEngine};
pub use types::{
    ChatMessage, ChatRequest, EngineStatus, Message, MessageContent, Role, StreamDelta,
};
