// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the engine and its external collaborators.
//!
//! All adapters extend the [`Adapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod channel;
pub mod store;

pub use adapter::Adapter;
pub use channel::MessageChannel;
pub use store::RecordStore;
