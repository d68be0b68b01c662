//! Bounty Board Server
//!
//! Funds, assigns and settles bounties on registered repos

use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bounty_board::config::Config;
use bounty_board::escrow::{EscrowDirectory, InMemoryEscrow};
use bounty_board::server::{run_server, AppState};
use bounty_board::vault::InMemoryVault;
use bounty_board::BountyBoard;

#[derive(Debug, Parser)]
#[command(name = "bounty-board-server", version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long, env = "BOARD_CONFIG", default_value = "config.toml")]
    config: String,

    /// Override the configured bind host
    #[arg(long, env = "BOARD_HOST")]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(long, env = "BOARD_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Starting Bounty Board Server");

    let config = Config::load_from(&args.config)?;

    let vault = Arc::new(InMemoryVault::new(config.vault.address));
    let escrow = Arc::new(InMemoryEscrow::new(config.escrow.address));

    let escrows = EscrowDirectory::new();
    escrows.register(escrow.clone());

    let board = Arc::new(BountyBoard::with_settings(
        escrow,
        vault,
        config.bounty.to_settings(),
    )?);
    info!("Board initialized, allocator {}", board.settings().bounty_allocator);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);

    let state = Arc::new(AppState {
        board,
        escrows,
        started_at: std::time::Instant::now(),
    });

    run_server(&host, port, state).await
}
