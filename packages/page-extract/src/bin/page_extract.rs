// Command-line driver for the extraction workflow

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use page_extract::{Config, Severity, WorkflowController, WorkflowEvent};
use page_extract_client::ExtractServiceClient;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "page-extract", about = "Extract page ranges from a record's document")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request an extraction and follow it while it is queued
    Run {
        #[arg(long)]
        parent_id: String,
        /// Page ranges, e.g. 1-2,6-7
        #[arg(long)]
        ranges: String,
        /// Return right after the request instead of waiting for follow-up checks
        #[arg(long)]
        no_wait: bool,
    },
    /// Show the status of an earlier extraction
    Status {
        #[arg(long)]
        parent_id: String,
        #[arg(long)]
        ranges: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,page_extract=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let mut client = ExtractServiceClient::new(&config.service_url);
    if let Some(token) = &config.service_token {
        client = client.with_token(token);
    }
    let service = Arc::new(client);

    let controller = match &cli.command {
        Command::Run { parent_id, .. } => {
            WorkflowController::new(parent_id, service, config.workflow.clone())
        }
        Command::Status { parent_id, ranges } => {
            WorkflowController::new(parent_id, service, config.workflow.clone())
                .with_ranges(ranges)
        }
    };
    tracing::debug!(session = %controller.session_id(), "Session started");

    let printer = tokio::spawn(print_events(controller.subscribe()));

    let outcome = drive(&controller, &cli.command).await;

    let view = controller.view();
    controller.close().await;
    if let Err(e) = printer.await {
        tracing::warn!(error = %e, "Event printer task failed");
    }

    println!("{}", serde_json::to_string_pretty(&view)?);
    outcome
}

async fn drive(controller: &WorkflowController, command: &Command) -> Result<()> {
    controller.init().await?;

    if let Command::Run {
        ranges, no_wait, ..
    } = command
    {
        controller.set_ranges(ranges.as_str());
        controller.extract().await?;
        if !no_wait {
            controller.settled().await;
        }
    }

    Ok(())
}

/// Print notifications and status changes until the session closes.
async fn print_events(mut events: tokio::sync::broadcast::Receiver<WorkflowEvent>) {
    loop {
        match events.recv().await {
            Ok(WorkflowEvent::Notify(n)) => {
                let title = match n.severity {
                    Severity::Error => n.title.red().bold(),
                    Severity::Warning => n.title.yellow().bold(),
                    Severity::Success => n.title.green().bold(),
                    Severity::Info => n.title.cyan().bold(),
                };
                eprintln!("{} {}", title, n.message);
            }
            Ok(WorkflowEvent::StatusChanged(report)) => {
                eprintln!("{}", report.status_text().bold());
            }
            Ok(WorkflowEvent::DocumentLoaded(doc)) => {
                eprintln!("{} {}", "Document".dimmed(), doc.file_name);
            }
            Ok(_) => {}
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Event printer lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
