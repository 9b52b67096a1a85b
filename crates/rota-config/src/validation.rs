// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as valid bind addresses, known channel modes, and complete Twilio
//! credentials when the WhatsApp channel is selected.

use crate::diagnostic::ConfigError;
use crate::model::RotaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const CHANNEL_MODES: [&str; 2] = ["console", "whatsapp"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &RotaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level `{}` is not one of: {}",
                config.agent.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate bind_address is not empty
    if config.server.bind_address.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.bind_address must not be empty".to_string(),
        });
    }

    // Validate bind_address looks like a valid IP or hostname
    if !config.server.bind_address.trim().is_empty() {
        let addr = config.server.bind_address.trim();
        let is_valid_ip = addr.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!(
                    "server.bind_address `{addr}` is not a valid IP address or hostname"
                ),
            });
        }
    }

    if config.server.port == 0 {
        errors.push(ConfigError::Validation {
            message: "server.port must be non-zero".to_string(),
        });
    }

    if !CHANNEL_MODES.contains(&config.channel.mode.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "channel.mode `{}` is not one of: {}",
                config.channel.mode,
                CHANNEL_MODES.join(", ")
            ),
        });
    }

    // WhatsApp mode needs the full Twilio credential set; report each
    // missing field separately so the operator can fix all at once.
    if config.channel.mode == "whatsapp" {
        let required = [
            ("twilio.account_sid", &config.twilio.account_sid),
            ("twilio.auth_token", &config.twilio.auth_token),
            ("twilio.from_address", &config.twilio.from_address),
        ];
        for (key, value) in required {
            let missing = match value {
                None => true,
                Some(v) => v.trim().is_empty(),
            };
            if missing {
                errors.push(ConfigError::Validation {
                    message: format!("{key} is required when channel.mode = \"whatsapp\""),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = RotaConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = RotaConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn bad_log_level_fails_validation() {
        let mut config = RotaConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log_level"))));
    }

    #[test]
    fn unknown_channel_mode_fails_validation() {
        let mut config = RotaConfig::default();
        config.channel.mode = "sms".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("channel.mode"))));
    }

    #[test]
    fn whatsapp_without_credentials_reports_each_missing_field() {
        let mut config = RotaConfig::default();
        config.channel.mode = "whatsapp".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        for key in ["account_sid", "auth_token", "from_address"] {
            assert!(errors
                .iter()
                .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(key))));
        }
    }

    #[test]
    fn whatsapp_with_full_credentials_passes() {
        let mut config = RotaConfig::default();
        config.channel.mode = "whatsapp".to_string();
        config.twilio.account_sid = Some("AC123".to_string());
        config.twilio.auth_token = Some("secret".to_string());
        config.twilio.from_address = Some("+14155238886".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn blank_twilio_credential_counts_as_missing() {
        let mut config = RotaConfig::default();
        config.channel.mode = "whatsapp".to_string();
        config.twilio.account_sid = Some("AC123".to_string());
        config.twilio.auth_token = Some("  ".to_string());
        config.twilio.from_address = Some("+14155238886".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(
            matches!(&errors[0], ConfigError::Validation { message } if message.contains("auth_token"))
        );
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = RotaConfig::default();
        config.server.port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("port"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = RotaConfig::default();
        config.server.bind_address = "0.0.0.0".to_string();
        config.server.port = 9090;
        config.storage.database_path = "/tmp/rota-test.db".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
