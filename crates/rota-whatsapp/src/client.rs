// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Twilio Messages API.
//!
//! Provides [`TwilioClient`] which handles request construction, basic
//! auth, and error decoding for message sends and the account probe used
//! by health checks.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use rota_core::RotaError;

/// Base URL for the Twilio REST API.
const API_BASE_URL: &str = "https://api.twilio.com";

/// HTTP client for Twilio API communication.
#[derive(Debug, Clone)]
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    base_url: String,
}

/// Successful send response; only the receipt SID is kept.
#[derive(Debug, Deserialize)]
struct MessageResponse {
    sid: String,
}

/// Twilio's error envelope, e.g. `{"code": 21211, "message": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    code: i64,
    message: String,
}

impl TwilioClient {
    /// Creates a new Twilio API client authenticated as `account_sid`.
    pub fn new(account_sid: String, auth_token: String) -> Result<Self, RotaError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RotaError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            account_sid,
            auth_token,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Sends one message and returns Twilio's message SID.
    pub async fn send_message(
        &self,
        from: &str,
        to: &str,
        body: &str,
    ) -> Result<String, RotaError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let params = [("From", from), ("To", to), ("Body", body)];

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await
            .map_err(|e| RotaError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, to, "send response received");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RotaError::Channel {
                message: decode_error(status, &text),
                source: None,
            });
        }

        let text = response.text().await.map_err(|e| RotaError::Channel {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        let parsed: MessageResponse =
            serde_json::from_str(&text).map_err(|e| RotaError::Channel {
                message: format!("failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(parsed.sid)
    }

    /// Fetches the account resource; used as a reachability probe.
    pub async fn check_account(&self) -> Result<(), RotaError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}.json",
            self.base_url, self.account_sid
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await
            .map_err(|e| RotaError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RotaError::Channel {
                message: decode_error(status, &text),
                source: None,
            });
        }
        Ok(())
    }
}

/// Prefers Twilio's structured error body, falling back to raw text.
fn decode_error(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(body) {
        format!("Twilio API error ({}): {}", api_err.code, api_err.message)
    } else {
        format!("Twilio API returned {status}: {body}")
    }
}
