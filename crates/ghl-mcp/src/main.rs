//! GoHighLevel MCP Server
//!
//! # Usage
//!
//! ```bash
//! ghl-mcp [--access-token <token>] [--location-id <id>] [--base-url <url>]
//! ```
//!
//! # Environment Variables
//!
//! - `GHL_ACCESS_TOKEN`: private integration token (required)
//! - `GHL_LOCATION_ID`: sub-account the server acts for (required)
//! - `GHL_API_BASE_URL`: API root (default: `https://services.leadconnectorhq.com`)
//! - `RUST_LOG`: log verbosity (default: `ghl_mcp=info,ghl_core=info`)
//!
//! A `.env` file in the working directory is read first; variables already
//! set in the environment take precedence.
//!
//! # Protocol
//!
//! JSON-RPC 2.0 over stdio: messages on stdin, responses on stdout, logs
//! on stderr.

use std::process::ExitCode;

use clap::Parser;
use ghl_core::{Config, Dispatcher};
use ghl_mcp::GhlMcpServer;
use tracing_subscriber::EnvFilter;

/// MCP server for the GoHighLevel CRM
#[derive(Parser)]
#[command(name = "ghl-mcp")]
#[command(about = "MCP server for the GoHighLevel CRM")]
#[command(version)]
struct Args {
    /// Private integration access token
    #[arg(long, env = "GHL_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Location (sub-account) ID used to scope every request
    #[arg(long, env = "GHL_LOCATION_ID", hide_env_values = true)]
    location_id: Option<String>,

    /// API base URL
    #[arg(long, env = "GHL_API_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is the normal case
    let _ = dotenvy::dotenv();

    // stdout is reserved for the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ghl_mcp=info,ghl_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> ghl_mcp::Result<()> {
    let config = Config::new(args.access_token, args.location_id, args.base_url)?;
    tracing::info!(?config, "Starting ghl-mcp server");

    let dispatcher = Dispatcher::from_config(&config)?;
    GhlMcpServer::new(dispatcher).run().await
}
