use anyhow::Result;
use clap::Parser;
use quinn::Endpoint;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod net;
mod pilot;
mod session;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Arena host: authoritative match peer", long_about = None)]
struct Args {
    // Address to bind the QUIC endpoint to (PvP mode)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,

    // Run an offline single-player match against the bot instead of hosting
    #[arg(long, default_value_t = false)]
    bot: bool,

    // RNG seed for the arena layout and all match randomness
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(|| std::process::id().into());

    if args.bot {
        info!("starting single-player match, seed {seed}");
        return session::run_bot_match(seed).await;
    }

    let addr: SocketAddr = args.bind.parse()?;
    let server_config = config::configure_host()?;
    let endpoint = Endpoint::server(server_config, addr)?;
    info!("quic host listening on {addr}");

    session::run_pvp(endpoint, seed).await
}
