// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./rota.toml` > `~/.config/rota/rota.toml` > `/etc/rota/rota.toml`
//! with environment variable overrides via `ROTA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RotaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rota/rota.toml` (system-wide)
/// 3. `~/.config/rota/rota.toml` (user XDG config)
/// 4. `./rota.toml` (local directory)
/// 5. `ROTA_*` environment variables
pub fn load_config() -> Result<RotaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RotaConfig::default()))
        .merge(Toml::file("/etc/rota/rota.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("rota/rota.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("rota.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a specific TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RotaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RotaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RotaConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading config from explicit path");
    Figment::new()
        .merge(Serialized::defaults(RotaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `ROTA_TWILIO_ACCOUNT_SID` must
/// map to `twilio.account_sid`, not `twilio.account.sid`.
fn env_provider() -> Env {
    Env::prefixed("ROTA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: ROTA_TWILIO_ACCOUNT_SID -> "twilio_account_sid"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("channel_", "channel.", 1)
            .replacen("twilio_", "twilio.", 1)
            .replacen("server_", "server.", 1);
        mapped.into()
    })
}
