// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the Folio workspace.
//!
//! Provides [`MockEngine`], a scriptable `GenerationEngine` implementation
//! for session and controller tests that must not touch a real runtime.

pub mod mock_engine;

pub use mock_engine::{MockEngine, MockReply};
