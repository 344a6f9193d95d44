use anyhow::{Context, Result, bail};
use clap::Parser;
use quinn::Endpoint;
use std::net::SocketAddr;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::constants::{CONNECT_TIMEOUT, TICK_RATE_HZ};
use common::net::MessageChannel;
use common::protocol::{ClientEnvelope, ClientMessage, HostMessage, MPing};
use common::sim::Intent;

const PING_INTERVAL: f32 = 2.0; // seconds

mod config;
mod game;
mod net;
mod pilot;

use game::{ClientGame, Phase};
use pilot::DemoPilot;

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Arena client: predictive match peer", long_about = None)]
struct Args {
    // Host address to connect to
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    connect: String,
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
    let addr: SocketAddr = args.connect.parse()?;

    let mut endpoint = Endpoint::client("0.0.0.0:0".parse()?)?;
    endpoint.set_default_client_config(config::configure_client()?);

    let connection = endpoint
        .connect(addr, "localhost")?
        .await
        .context("failed to connect to host")?;
    info!("connected to host at {addr}");

    let (to_game, mut from_host) = unbounded_channel();
    tokio::spawn(net::host_receive_task(connection.clone(), to_game));
    let channel = MessageChannel::new(&connection);

    let mut game = ClientGame::default();
    let mut intent_source = DemoPilot::default();

    let tick_duration = Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ);
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let mut since_ping = 0.0_f32;

    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt = (now - last_tick).as_secs_f32();
        last_tick = now;

        // Mailbox drain; the newest snapshot simply replaces older ones.
        while let Ok(msg) = from_host.try_recv() {
            match msg {
                HostMessage::Init(init) => {
                    info!("received Init: {} walls, seed {}", init.walls.len(), init.seed);
                    game.on_init(init);
                }
                HostMessage::State(state) => game.on_state(state),
                HostMessage::GameOver(over) => game.on_game_over(over.winner),
                HostMessage::Ping(_) => {}
            }
        }

        match game.phase {
            Phase::AwaitingInit => {
                // A dropped Init would stall us forever; give up loudly.
                if started.elapsed().as_secs_f32() > CONNECT_TIMEOUT {
                    bail!("no Init from host within {CONNECT_TIMEOUT}s");
                }
            }
            Phase::Playing => {
                since_ping += dt;
                if since_ping >= PING_INTERVAL {
                    since_ping = 0.0;
                    let _ = channel.send_unreliable(&ClientEnvelope {
                        timestamp_ms: net::wall_clock_ms(),
                        msg: ClientMessage::Ping(MPing {
                            timestamp_ms: net::wall_clock_ms(),
                        }),
                    });
                }

                let intent: Intent = intent_source.intent(dt);
                if let Some(input) = game.tick(&intent, dt) {
                    if let Err(err) = channel.send_unreliable(&ClientEnvelope {
                        timestamp_ms: net::wall_clock_ms(),
                        msg: ClientMessage::Input(input),
                    }) {
                        warn!("input send failed: {err}");
                    }
                }
            }
            Phase::Finished(winner) => {
                info!("match over, winner: {winner:?}");
                connection.close(0u32.into(), b"done");
                return Ok(());
            }
        }
    }
}
