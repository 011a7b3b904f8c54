//! CLI entrypoint for teamvote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::{Cli, Command};
use teamvote_application::{
    CreateSessionInput, InviteCoordinator, Notifier, RetryPolicy, SubmitError,
};
use teamvote_domain::{ResponseLink, ResponseValue};
use teamvote_infrastructure::{ConfigLoader, FileConfig, JsonVoteStore, OutboxNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if matches!(cli.command, Command::ConfigSources) {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Could not load configuration")?
    };

    // === Dependency Injection ===
    let store = Arc::new(
        JsonVoteStore::new(&config.storage.data_dir)
            .context("Could not open the session store")?,
    );

    #[cfg(feature = "webhook")]
    if let Some(url) = config.notify.webhook_url.clone() {
        tracing::info!("Delivering notifications via webhook {}", url);
        let notifier = Arc::new(teamvote_infrastructure::WebhookNotifier::new(url));
        return run(cli, &config, store, notifier).await;
    }

    let notifier = Arc::new(
        OutboxNotifier::new(&config.notify.outbox_path)
            .context("Could not open the notification outbox")?,
    );
    run(cli, &config, store, notifier).await
}

async fn run<N: Notifier>(
    cli: Cli,
    config: &FileConfig,
    store: Arc<JsonVoteStore>,
    notifier: Arc<N>,
) -> Result<()> {
    let coordinator = InviteCoordinator::with_retry(
        store,
        notifier,
        ResponseLink::new(config.coordinator.link_base_url.clone()),
        RetryPolicy {
            attempts: config.coordinator.retry_attempts,
            initial_backoff: Duration::from_millis(config.coordinator.retry_backoff_ms),
        },
    );

    match cli.command {
        Command::Create {
            invite,
            team,
            tournament,
            members,
        } => {
            let input = CreateSessionInput::new(&invite, team, tournament, members);
            // Repeated addresses collapse into one roster entry, so report
            // the deduplicated count rather than the raw argument list.
            let count = input.roster.len();
            coordinator.create_session(input).await?;
            println!("Session {} created; {} member(s) notified.", invite, count);
        }

        Command::Respond {
            invite,
            member,
            value,
        } => {
            let value: ResponseValue = match value.parse() {
                Ok(v) => v,
                Err(e) => bail!("{}", e),
            };

            match coordinator.submit_response(&invite, &member, value).await {
                Ok(decision) => println!("Session {}: {}", invite, decision),
                // Both cases read as "invalid link" to the clicking party,
                // but the operator running the CLI sees which one it was.
                Err(e @ SubmitError::UnknownSession(_))
                | Err(e @ SubmitError::NotAMember { .. }) => {
                    bail!("Invalid link: {}", e)
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Status { invite, json } => {
            let status = coordinator.status(&invite).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Session:    {}", status.invite_id);
                println!("Team:       {}", status.team_id);
                println!("Tournament: {}", status.tournament_id);
                println!("Decision:   {}", status.decision);
                println!("Responses:");
                for member in &status.roster {
                    match status.responses.get(member) {
                        Some(value) => println!("  {:<30} {}", member, value),
                        None => println!("  {:<30} (no response)", member),
                    }
                }
            }
        }

        Command::ConfigSources => unreachable!("handled before wiring"),
    }

    Ok(())
}
