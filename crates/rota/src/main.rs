// SPDX-FileCopyrightText: 2026 Rota Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rota - fair chore assignment and reminder scheduling.
//!
//! This is the binary entry point: CLI parsing, configuration loading,
//! tracing setup, and command dispatch.

mod console;
mod seed;
mod serve;
mod server;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rota_config::{ConfigError, RotaConfig};

/// Rota - fair chore assignment and reminder scheduling.
#[derive(Parser, Debug)]
#[command(name = "rota", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (otherwise the standard locations are searched).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP surface and the hourly scheduling tick.
    Serve,
    /// Create this week's assignments and exit.
    Generate,
    /// Send due reminders and exit.
    Remind {
        /// Fire every not-yet-sent rule regardless of the clock.
        #[arg(long)]
        force: bool,
    },
    /// Insert the demo household fixture (safe to rerun).
    Seed,
    /// Inspect Rota configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// `rota config` subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Load and validate configuration, reporting the effective settings.
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load and validate configuration before anything else; diagnostics
    // render with source spans and suggestions.
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            rota_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Generate => serve::run_generate(&config).await,
        Commands::Remind { force } => serve::run_remind(&config, force).await,
        Commands::Seed => seed::run_seed(&config).await,
        Commands::Config {
            command: ConfigCommands::Check,
        } => run_config_check(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<RotaConfig, Vec<ConfigError>> {
    match path {
        Some(path) => rota_config::load_and_validate_path(path),
        None => rota_config::load_and_validate(),
    }
}

/// Runs `rota config check`: the config already loaded and validated, so
/// report the effective settings with secrets elided.
fn run_config_check(config: &RotaConfig) -> Result<(), rota_core::RotaError> {
    println!("configuration ok");
    println!("  agent.name       = {}", config.agent.name);
    println!("  agent.log_level  = {}", config.agent.log_level);
    println!("  storage.database = {}", config.storage.database_path);
    println!("  channel.mode     = {}", config.channel.mode);
    println!(
        "  server.bind      = {}:{}",
        config.server.bind_address, config.server.port
    );
    println!(
        "  server.admin_token = {}",
        if config.server.admin_token.is_some() {
            "[set]"
        } else {
            "[unset -- /v1 API disabled]"
        }
    );
    println!(
        "  server.cron_secret = {}",
        if config.server.cron_secret.is_some() {
            "[set]"
        } else {
            "[unset -- /cron endpoints disabled]"
        }
    );
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "rota={log_level},rota_engine={log_level},rota_storage={log_level},rota_whatsapp={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn remind_accepts_force_flag() {
        let cli = Cli::parse_from(["rota", "remind", "--force"]);
        assert!(matches!(cli.command, Commands::Remind { force: true }));
    }

    #[test]
    fn config_flag_applies_globally() {
        let cli = Cli::parse_from(["rota", "serve", "--config", "/tmp/rota.toml"]);
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/rota.toml")));
    }
}
