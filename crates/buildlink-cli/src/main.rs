//! Command-line interface for BuildLink.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use buildlink_api::ServerState;
use buildlink_core::config::env_vars;
use buildlink_core::{AppConfig, ReqwestTransport};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

/// BuildLink - building telemetry aggregation.
#[derive(Parser, Debug)]
#[command(name = "buildlink")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// TOML configuration file (falls back to BUILDLINK_CONFIG).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the API server.
    Serve {
        /// Host to bind to (overrides configuration).
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides configuration).
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List buildings.
    Buildings {
        /// Comma-separated building ids to keep.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },
    /// Print the full building hierarchy.
    Tree,
    /// Print trend values of one sensor.
    Values {
        /// Sensor external id.
        sensor: String,
        /// Range start (RFC 3339).
        #[arg(long)]
        start: DateTime<Utc>,
        /// Range end (RFC 3339), defaults to now.
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
    /// Print merged door-counter counts.
    DoorCounts {
        /// Range start (RFC 3339).
        #[arg(long)]
        start: DateTime<Utc>,
        /// Range end (RFC 3339), defaults to now.
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var(env_vars::CONFIG).ok().map(PathBuf::from));
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    tracing::debug!(?config, "Configuration loaded");

    let transport = Arc::new(ReqwestTransport::new(config.http.timeout())?);
    let state = ServerState::new(transport, &config);

    match args.command {
        Command::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            run_server(state, host, port).await
        }
        Command::Buildings { ids } => {
            let buildings = state.bms.index.buildings(Some(ids.as_slice())).await?;
            print_json(&buildings)
        }
        Command::Tree => print_json(&state.bms.index.tree().await?),
        Command::Values { sensor, start, end } => {
            print_json(&state.bms.values.values(&sensor, start, end).await?)
        }
        Command::DoorCounts { start, end } => print_json(&state.doors.counts(start, end).await?),
    }
}

fn init_logging(verbose: bool) {
    // JSON format for production/container environments
    let json_logging = std::env::var(env_vars::LOG_JSON)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);

    let default_directive = if verbose { "buildlink=debug" } else { "buildlink=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .compact()
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run_server(state: ServerState, host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid address: {}:{}", host, port))?;

    buildlink_api::run(addr, state).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
