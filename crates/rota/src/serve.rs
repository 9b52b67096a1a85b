// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rota serve` command implementation.
//!
//! Starts the HTTP control surface together with an in-process hourly
//! tick that creates the week's assignments and dispatches due
//! reminders. The one-shot `generate` and `remind` commands live here
//! too, sharing the same wiring.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use rota_config::model::RotaConfig;
use rota_core::types::HealthStatus;
use rota_core::{Adapter, MessageChannel, RecordStore, RotaError};
use rota_engine::{ReminderDispatcher, Scheduler};
use rota_storage::SqliteStore;
use rota_whatsapp::TwilioWhatsApp;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::console::ConsoleChannel;
use crate::server::{self, AppState, AuthConfig};

/// Seconds between scheduling passes. Reminder rules address hours, so
/// an hourly cadence is exactly enough to hit every rule once.
const TICK_INTERVAL_SECS: u64 = 3600;

/// Everything the commands need once configuration is resolved.
struct Runtime {
    store: Arc<SqliteStore>,
    channel: Arc<dyn MessageChannel>,
    scheduler: Arc<Scheduler>,
    dispatcher: Arc<ReminderDispatcher>,
}

/// Builds the outbound channel selected by `channel.mode`.
fn build_channel(config: &RotaConfig) -> Result<Arc<dyn MessageChannel>, RotaError> {
    match config.channel.mode.as_str() {
        "console" => Ok(Arc::new(ConsoleChannel::new())),
        "whatsapp" => {
            let channel = TwilioWhatsApp::new(&config.twilio)?;
            Ok(Arc::new(channel))
        }
        other => Err(RotaError::Config(format!(
            "unknown channel.mode {other:?} (expected \"console\" or \"whatsapp\")"
        ))),
    }
}

/// Opens storage, builds the channel, and wires the engine onto them.
async fn build_runtime(config: &RotaConfig) -> Result<Runtime, RotaError> {
    let store = Arc::new(SqliteStore::open(&config.storage).await?);
    let channel = build_channel(config)?;

    let record_store: Arc<dyn RecordStore> = store.clone();
    let scheduler = Arc::new(Scheduler::new(record_store.clone()));
    let dispatcher = Arc::new(ReminderDispatcher::new(record_store, channel.clone()));

    Ok(Runtime {
        store,
        channel,
        scheduler,
        dispatcher,
    })
}

fn log_health(name: &str, status: &Result<HealthStatus, RotaError>) {
    match status {
        Ok(HealthStatus::Healthy) => info!(adapter = name, "adapter healthy"),
        Ok(HealthStatus::Degraded(reason)) => {
            warn!(adapter = name, reason = reason.as_str(), "adapter degraded");
        }
        Ok(HealthStatus::Unhealthy(reason)) => {
            warn!(adapter = name, reason = reason.as_str(), "adapter unhealthy");
        }
        Err(e) => warn!(adapter = name, error = %e, "adapter health check failed"),
    }
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal
/// is received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// One scheduling pass: create this week's assignments, then send any
/// reminders whose rules match the current hour.
async fn tick(scheduler: &Scheduler, dispatcher: &ReminderDispatcher) {
    let now = Local::now().naive_local();

    match scheduler.generate(now.date()).await {
        Ok(created) if !created.is_empty() => {
            info!(count = created.len(), "tick created assignments");
        }
        Ok(_) => debug!("tick: no new assignments"),
        Err(e) => warn!(error = %e, "assignment generation failed (non-fatal)"),
    }

    match dispatcher.dispatch(now, false).await {
        Ok(sent) if sent > 0 => info!(sent, "tick dispatched reminders"),
        Ok(_) => debug!("tick: no reminders due"),
        Err(e) => warn!(error = %e, "reminder dispatch failed (non-fatal)"),
    }
}

/// Runs the `rota serve` command.
///
/// Wires storage, channel, and engine, reports adapter health, spawns
/// the hourly tick (unless disabled), and serves the HTTP surface until
/// a shutdown signal arrives.
pub async fn run_serve(config: RotaConfig) -> Result<(), RotaError> {
    info!("starting rota serve");

    let runtime = build_runtime(&config).await?;

    let status = runtime.store.health_check().await;
    log_health(runtime.store.name(), &status);
    let status = runtime.channel.health_check().await;
    log_health(runtime.channel.name(), &status);

    let cancel = install_signal_handler();

    if config.server.tick_enabled {
        let tick_scheduler = runtime.scheduler.clone();
        let tick_dispatcher = runtime.dispatcher.clone();
        let tick_cancel = cancel.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(TICK_INTERVAL_SECS));
            // The first interval tick fires immediately, so a freshly
            // started server generates the current week without waiting
            // an hour.
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        tick(&tick_scheduler, &tick_dispatcher).await;
                    }
                    _ = tick_cancel.cancelled() => {
                        info!("scheduling tick shutting down");
                        break;
                    }
                }
            }
        });
        info!(
            interval_secs = TICK_INTERVAL_SECS,
            "in-process scheduling tick started"
        );
    } else {
        info!("in-process scheduling tick disabled by configuration");
    }

    if config.server.admin_token.is_none() {
        warn!("server.admin_token unset -- /v1 API disabled (fail closed)");
    }
    if config.server.cron_secret.is_none() {
        warn!("server.cron_secret unset -- /cron endpoints disabled (fail closed)");
    }

    let state = AppState {
        store: runtime.store.clone() as Arc<dyn RecordStore>,
        scheduler: runtime.scheduler.clone(),
        dispatcher: runtime.dispatcher.clone(),
        auth: AuthConfig {
            admin_token: config.server.admin_token.clone(),
            cron_secret: config.server.cron_secret.clone(),
        },
        agent_name: config.agent.name.clone(),
        start_time: std::time::Instant::now(),
    };
    let app = server::build_router(state);

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RotaError::Internal(format!("failed to bind control server to {addr}: {e}")))?;
    info!("control server listening on {addr}");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| RotaError::Internal(format!("control server error: {e}")))?;

    if let Err(e) = runtime.channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    if let Err(e) = runtime.store.shutdown().await {
        warn!(error = %e, "store shutdown failed");
    }

    info!("rota serve shutdown complete");
    Ok(())
}

/// Runs the `rota generate` command: one generation pass for today's
/// week, printing what was created.
pub async fn run_generate(config: &RotaConfig) -> Result<(), RotaError> {
    let runtime = build_runtime(config).await?;
    let today = Local::now().date_naive();
    let created = runtime.scheduler.generate(today).await?;

    println!("Created {} assignment(s).", created.len());
    for assignment in &created {
        let chore_name = match runtime.store.chore(assignment.chore_id).await? {
            Some(chore) => chore.name,
            None => format!("chore {}", assignment.chore_id),
        };
        let person_name = match runtime.store.person(assignment.person_id).await? {
            Some(person) => person.name,
            None => format!("person {}", assignment.person_id),
        };
        println!("  {chore_name} -> {person_name} (due {})", assignment.due_date);
    }

    runtime.store.shutdown().await?;
    Ok(())
}

/// Runs the `rota remind` command: one dispatch pass at the current
/// local time. With `force`, every not-yet-sent rule fires.
pub async fn run_remind(config: &RotaConfig, force: bool) -> Result<(), RotaError> {
    let runtime = build_runtime(config).await?;
    let now = Local::now().naive_local();
    let sent = runtime.dispatcher.dispatch(now, force).await?;

    println!("Sent {sent} reminder(s).");

    runtime.store.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_mode_builds_a_channel() {
        let config = RotaConfig::default();
        let channel = build_channel(&config).unwrap();
        assert_eq!(channel.name(), "console");
    }

    #[test]
    fn whatsapp_mode_requires_credentials() {
        let mut config = RotaConfig::default();
        config.channel.mode = "whatsapp".to_string();
        let err = build_channel(&config).unwrap_err();
        assert!(matches!(err, RotaError::Config(_)));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let mut config = RotaConfig::default();
        config.channel.mode = "carrier-pigeon".to_string();
        let err = build_channel(&config).unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[tokio::test]
    async fn signal_handler_token_starts_uncancelled() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
    }
}
