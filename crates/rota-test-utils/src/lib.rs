// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Rota integration tests.
//!
//! Provides a mock channel and a temp-database harness for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock message channel with capture and failure toggle
//! - [`TestHarness`] - Temp SQLite store + mock channel + fixture helpers

pub mod harness;
pub mod mock_channel;

pub use harness::{rule, TestHarness};
pub use mock_channel::MockChannel;
