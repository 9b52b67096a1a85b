// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message channel trait for outbound reminder delivery.

use async_trait::async_trait;

use crate::error::RotaError;
use crate::traits::adapter::Adapter;
use crate::types::{MessageId, OutboundMessage};

/// Outbound-only delivery capability for reminder messages.
///
/// Two interchangeable modes exist: a no-op/log channel and a live-delivery
/// channel. The engine never branches on which one is active.
#[async_trait]
pub trait MessageChannel: Adapter + std::fmt::Debug {
    /// Delivers one message, returning the channel's receipt identifier.
    ///
    /// A failed delivery must return an error rather than a synthetic
    /// receipt: the dispatcher only records a reminder as sent after this
    /// method succeeds.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RotaError>;
}
