// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock message channel for deterministic testing.
//!
//! `MockChannel` implements `MessageChannel` with captured outbound messages
//! for assertion in tests, plus a failure toggle for exercising delivery
//! error paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rota_core::traits::adapter::Adapter;
use rota_core::traits::channel::MessageChannel;
use rota_core::types::{HealthStatus, MessageId, OutboundMessage};
use rota_core::RotaError;

/// A mock messaging channel for testing.
///
/// Messages passed to `send()` are captured and retrievable via
/// `sent_messages()`. When the failure toggle is set, `send()` returns a
/// delivery error without capturing anything, so dispatcher tests can
/// verify that nothing gets logged for failed sends.
#[derive(Debug)]
pub struct MockChannel {
    sent: Mutex<Vec<OutboundMessage>>,
    failing: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with an empty capture list.
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `send()` fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Adapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, RotaError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), RotaError> {
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RotaError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RotaError::Channel {
                message: "mock channel set to fail".to_string(),
                source: None,
            });
        }
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }
}
