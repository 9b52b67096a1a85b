// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console message channel: the no-op delivery mode.
//!
//! Prints each reminder to stdout and returns a synthetic receipt, so
//! the whole pipeline can run without Twilio credentials.

use async_trait::async_trait;

use rota_core::traits::adapter::Adapter;
use rota_core::traits::channel::MessageChannel;
use rota_core::types::{HealthStatus, MessageId, OutboundMessage};
use rota_core::RotaError;

/// Message channel that prints instead of delivering.
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl ConsoleChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Adapter for ConsoleChannel {
    fn name(&self) -> &str {
        "console"
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
impl MessageChannel for ConsoleChannel {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RotaError> {
        println!("-- reminder to {} --", msg.to);
        println!("{}", msg.body);
        println!("--");
        Ok(MessageId(format!("console-{}", uuid::Uuid::new_v4())))
    }
}
