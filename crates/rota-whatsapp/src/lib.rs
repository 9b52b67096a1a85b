// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel adapter for Rota.
//!
//! Implements [`MessageChannel`] over the Twilio Messages API. Outbound
//! addresses get the `whatsapp:` prefix Twilio requires, and the channel
//! only reports success once Twilio has accepted the message.

pub mod client;

use async_trait::async_trait;
use tracing::debug;

use rota_config::model::TwilioConfig;
use rota_core::traits::adapter::Adapter;
use rota_core::traits::channel::MessageChannel;
use rota_core::types::{HealthStatus, MessageId, OutboundMessage};
use rota_core::RotaError;

use crate::client::TwilioClient;

/// WhatsApp delivery channel backed by Twilio.
#[derive(Debug)]
pub struct TwilioWhatsApp {
    client: TwilioClient,
    from_address: String,
}

impl TwilioWhatsApp {
    /// Creates the channel from the `[twilio]` configuration section.
    ///
    /// All three credentials must be present and non-empty. Config
    /// validation reports missing ones earlier with better diagnostics.
    pub fn new(config: &TwilioConfig) -> Result<Self, RotaError> {
        let account_sid = require(config.account_sid.as_deref(), "twilio.account_sid")?;
        let auth_token = require(config.auth_token.as_deref(), "twilio.auth_token")?;
        let from_address = require(config.from_address.as_deref(), "twilio.from_address")?;

        Ok(Self {
            client: TwilioClient::new(account_sid.to_string(), auth_token.to_string())?,
            from_address: whatsapp_address(from_address),
        })
    }
}

fn require<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, RotaError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(RotaError::Config(format!(
            "{key} is required for WhatsApp delivery"
        ))),
    }
}

/// Prepends the `whatsapp:` scheme Twilio expects, if not already there.
fn whatsapp_address(addr: &str) -> String {
    if addr.starts_with("whatsapp:") {
        addr.to_string()
    } else {
        format!("whatsapp:{addr}")
    }
}

#[async_trait]
impl Adapter for TwilioWhatsApp {
    fn name(&self) -> &str {
        "twilio-whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, RotaError> {
        // Fetching the account resource verifies both reachability and
        // credentials.
        match self.client.check_account().await {
            Ok(()) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!("Twilio unreachable: {e}"))),
        }
    }

    async fn shutdown(&self) -> Result<(), RotaError> {
        debug!("WhatsApp channel shutting down");
        Ok(())
    }
}

#[async_trait]
impl MessageChannel for TwilioWhatsApp {
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, RotaError> {
        let to = whatsapp_address(&msg.to);
        let sid = self
            .client
            .send_message(&self.from_address, &to, &msg.body)
            .await?;
        Ok(MessageId(sid))
    }
}
