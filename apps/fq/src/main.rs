//! fq - query and edit Firestore from the command line.
//!
//! Reads documents from Firestore (or the local emulator) with where-clause
//! filters, and seeds or clears emulator data from JSON.
//!
//! # Usage
//!
//! ```text
//! fq query -p demo-app --path users -w "age >= 18" -w "role in ['admin', 'dev']"
//! fq set -p demo-app --path users --data users.json --progress
//! fq delete -p demo-app --path users -w "active == false"
//! fq completions zsh > ~/.zfunc/_fq
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GCLOUD_PROJECT` | *(unset)* | Project id when `--project` is not given |
//! | `GCLOUD_PROJECT_ID` | *(unset)* | Fallback project id |
//! | `FIRESTORE_DATABASE` | `(default)` | Database id |
//! | `FIRESTORE_EMULATOR_HOST` | `localhost:8080` | Emulator address for `demo-*` projects |
//! | `FIREBASE_EMULATOR_HUB` | `localhost:4400` | Emulator hub address for `demo-*` projects |
//! | `FQ_ACCESS_TOKEN` | *(unset)* | Bearer token for production projects |
//! | `LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod commands;
mod input;
mod output;
mod progress;

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use fq_core::FirestoreConfig;
use fq_http::HttpDatastore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::TriggerGuard;

/// Initialize the tracing subscriber. Logs go to stderr so stdout carries
/// only command output.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Command::Completions(args) = &cli.command {
        cli::write_completions(args.shell, &mut io::stdout());
        return Ok(());
    }
    init_tracing(&cli.log_level)?;

    let config = FirestoreConfig::from_env(cli.project.clone())?
        .with_database(cli.database.clone())
        .with_timeout(Duration::from_secs(cli.timeout));
    debug!(
        project = %config.project_id,
        database = %config.database_id,
        emulator = ?config.emulator_host,
        "resolved configuration"
    );

    if cli.command.write_options().is_some() {
        commands::ensure_emulator_project(&config)?;
    }
    let data = match &cli.command {
        Command::Set(args) => Some(input::read_data(&args.data).await?),
        _ => None,
    };

    let store = HttpDatastore::from_config(&config).context("failed to create firestore client")?;
    let triggers = match cli.command.write_options() {
        Some(write) if write.disable_triggers => Some(TriggerGuard::pause(&config).await),
        _ => None,
    };

    let mut stdout = io::stdout().lock();
    let pretty = io::stdout().is_terminal();
    let run = async {
        match &cli.command {
            Command::Query(args) => commands::query::run(&store, args, &mut stdout, pretty).await,
            Command::Set(args) => {
                let source = if args.data.as_os_str() == "-" {
                    "stdin".to_owned()
                } else {
                    args.data.display().to_string()
                };
                let data = data.as_deref().unwrap_or_default();
                commands::set::run(&store, args, data, &source, &mut stdout).await
            }
            Command::Delete(args) => commands::delete::run(&store, args, &mut stdout).await,
            Command::Completions(_) => Ok(()),
        }
    };
    let result = tokio::time::timeout(config.timeout, run).await;

    if let Some(triggers) = triggers {
        triggers.resume().await;
    }

    match result {
        Ok(outcome) => outcome,
        Err(_) => bail!("timed-out after {} seconds", config.timeout.as_secs()),
    }
}
