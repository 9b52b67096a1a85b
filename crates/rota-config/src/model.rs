// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Rota scheduling engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Rota configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RotaConfig {
    /// Scheduler identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Outbound message channel settings.
    #[serde(default)]
    pub channel: ChannelConfig,

    /// Twilio WhatsApp credentials, used when `channel.mode = "whatsapp"`.
    #[serde(default)]
    pub twilio: TwilioConfig,

    /// HTTP control surface settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Scheduler identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in log output and the health endpoint.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "rota".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("rota").join("rota.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("rota.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Outbound message channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Delivery mode: "console" logs reminders locally,
    /// "whatsapp" sends them through the Twilio Messages API.
    #[serde(default = "default_channel_mode")]
    pub mode: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            mode: default_channel_mode(),
        }
    }
}

fn default_channel_mode() -> String {
    "console".to_string()
}

/// Twilio WhatsApp credentials.
///
/// All fields are required when `channel.mode = "whatsapp"`; validation
/// reports each missing one separately.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TwilioConfig {
    /// Twilio account SID.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Twilio auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender address, e.g. `whatsapp:+14155238886`. The `whatsapp:` prefix
    /// is added automatically when missing.
    #[serde(default)]
    pub from_address: Option<String>,
}

/// HTTP control surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required for the `/v1` operator API.
    /// `None` disables that API entirely (fail closed).
    #[serde(default)]
    pub admin_token: Option<String>,

    /// Shared secret required in the `X-Cron-Secret` header for the
    /// `/cron` trigger endpoints. `None` disables those endpoints.
    #[serde(default)]
    pub cron_secret: Option<String>,

    /// Run the in-process hourly generate-and-remind tick inside `serve`.
    /// Disable when an external scheduler drives the `/cron` endpoints.
    #[serde(default = "default_tick_enabled")]
    pub tick_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            admin_token: None,
            cron_secret: None,
            tick_enabled: default_tick_enabled(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_tick_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_console_mode() {
        let config = RotaConfig::default();
        assert_eq!(config.agent.name, "rota");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.channel.mode, "console");
        assert!(config.twilio.account_sid.is_none());
        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert!(config.server.admin_token.is_none());
        assert!(config.server.tick_enabled);
    }

    #[test]
    fn default_database_path_ends_with_rota_db() {
        let config = RotaConfig::default();
        assert!(config.storage.database_path.ends_with("rota.db"));
        assert!(config.storage.wal_mode);
    }

    #[test]
    fn partial_toml_fills_remaining_defaults() {
        let toml_str = r#"
[agent]
name = "rota-test"

[channel]
mode = "whatsapp"
"#;
        let config: RotaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.agent.name, "rota-test");
        assert_eq!(config.agent.log_level, "info");
        assert_eq!(config.channel.mode, "whatsapp");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn twilio_section_deserializes() {
        let toml_str = r#"
[twilio]
account_sid = "AC123"
auth_token = "secret"
from_address = "whatsapp:+14155238886"
"#;
        let config: RotaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.twilio.account_sid.as_deref(), Some("AC123"));
        assert_eq!(config.twilio.auth_token.as_deref(), Some("secret"));
        assert_eq!(
            config.twilio.from_address.as_deref(),
            Some("whatsapp:+14155238886")
        );
    }

    #[test]
    fn unknown_key_is_rejected() {
        let toml_str = r#"
[agent]
naem = "oops"
"#;
        let result = toml::from_str::<RotaConfig>(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        let toml_str = r#"
[telegrm]
bot_token = "x"
"#;
        let result = toml::from_str::<RotaConfig>(toml_str);
        assert!(result.is_err());
    }
}
