use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::serve;
use clap::{Parser, Subcommand};
use dispo_relay::{RelayConfig, function, http::build_router, relay_from_config};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "disposition-relay",
    version,
    about = "Relay call dispositions from the agent desktop to the automation webhook"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the long-lived HTTP server (default)
    Serve,
    /// Handle one function invocation event and print the response document
    Invoke {
        /// Event JSON file; reads stdin when omitted.
        #[arg(long, value_name = "PATH")]
        event: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    dispo_telemetry::install("disposition-relay")?;

    let cli = Cli::parse();
    let config = RelayConfig::from_env()?;
    if config.webhook_url.is_none() {
        warn!("N8N_DISPOSITION_WEBHOOK not set; every submission will fail with 500");
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(config).await,
        Command::Invoke { event } => run_invoke(config, event).await,
    }
}

async fn run_server(config: RelayConfig) -> Result<()> {
    let addr = config.addr;
    let router = build_router(relay_from_config(config)?);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("disposition-relay listening on {}", addr);

    serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}

async fn run_invoke(config: RelayConfig, event: Option<PathBuf>) -> Result<()> {
    let raw = match event {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read event from stdin")?;
            buf
        }
    };
    let relay = relay_from_config(config)?;
    let response = function::invoke_raw(&relay, &raw).await;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
