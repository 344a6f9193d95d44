use anyhow::{Context, Result};
use quinn::Endpoint;
use tokio::sync::mpsc::unbounded_channel;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use common::constants::{HUD_UPDATE_INTERVAL, INPUT_GRACE, STATE_BROADCAST_INTERVAL, TICK_RATE_HZ};
use common::events::SimEvent;
use common::net::MessageChannel;
use common::protocol::{ClientMessage, HostEnvelope, HostMessage, MGameOver, SInit};
use common::sim::{Intent, MatchMode, RemoteIntent, Simulation};

use crate::net::{client_receive_task, wall_clock_ms};
use crate::pilot::DemoPilot;

// ============================================================================
// PvP Session (authoritative peer)
// ============================================================================

pub async fn run_pvp(endpoint: Endpoint, seed: u64) -> Result<()> {
    let incoming = endpoint.accept().await.context("endpoint closed before a client connected")?;
    let connection = incoming.await.context("client connection failed")?;
    info!("client connected from {}", connection.remote_address());

    let mut sim = Simulation::new(MatchMode::PvpHost, seed);

    // Init must arrive: reliable stream, sent once before the first tick.
    let channel = MessageChannel::new(&connection);
    channel
        .send_reliable(&HostEnvelope {
            timestamp_ms: wall_clock_ms(),
            msg: HostMessage::Init(SInit {
                walls: sim.walls.clone(),
                player_start: sim.player.pos.into(),
                opponent_start: sim.opponent.pos.into(),
                seed,
            }),
        })
        .await
        .context("failed to send Init")?;

    let (to_session, mut from_client) = unbounded_channel();
    tokio::spawn(client_receive_task(connection.clone(), to_session));

    let tick_duration = Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ);
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut pilot = DemoPilot::default();
    let mut remote = RemoteIntent::default();
    let mut last_tick = Instant::now();
    let mut last_input = Instant::now();
    let mut input_starved = false;
    let mut since_broadcast = 0.0_f32;

    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt = (now - last_tick).as_secs_f32();
        last_tick = now;

        // Mailbox drain: only the latest intent matters, by design.
        while let Ok(msg) = from_client.try_recv() {
            match msg {
                ClientMessage::Input(input) => {
                    remote = RemoteIntent {
                        intent: Intent {
                            movement: input.movement.into(),
                            aim: input.aim.into(),
                            sprint: input.sprint,
                            fire: input.fire,
                        },
                        angle: input.angle,
                    };
                    last_input = now;
                    input_starved = false;
                }
                ClientMessage::Ping(ping) => {
                    let _ = channel.send_unreliable(&HostEnvelope {
                        timestamp_ms: wall_clock_ms(),
                        msg: HostMessage::Ping(ping),
                    });
                }
                ClientMessage::GameOver(over) => {
                    debug!("client reported game over: {:?}", over.winner);
                }
            }
        }

        // The match never pauses for a silent peer; their combatant just
        // coasts to a stop until input resumes.
        if now.duration_since(last_input).as_secs_f32() > INPUT_GRACE {
            if !input_starved {
                warn!("no client input for {INPUT_GRACE}s, decaying remote intent to neutral");
                input_starved = true;
            }
            remote.intent = Intent::default();
        }

        let local = pilot.intent(dt);
        sim.tick(&local, Some(&remote), dt);
        log_events(&mut sim);

        since_broadcast += dt;
        if since_broadcast >= STATE_BROADCAST_INTERVAL {
            since_broadcast = 0.0;
            if let Err(err) = channel.send_unreliable(&HostEnvelope {
                timestamp_ms: wall_clock_ms(),
                msg: HostMessage::State(sim.snapshot()),
            }) {
                warn!("state broadcast failed: {err}");
            }
        }

        if let Some(winner) = sim.outcome {
            info!("match over, winner: {winner:?}");
            channel
                .send_reliable(&HostEnvelope {
                    timestamp_ms: wall_clock_ms(),
                    msg: HostMessage::GameOver(MGameOver { winner }),
                })
                .await
                .context("failed to send GameOver")?;
            connection.close(0u32.into(), b"match over");
            return Ok(());
        }
    }
}

// ============================================================================
// Single-Player Session (local bot match)
// ============================================================================

pub async fn run_bot_match(seed: u64) -> Result<()> {
    let mut sim = Simulation::new(MatchMode::SinglePlayer, seed);
    let mut pilot = DemoPilot::default();

    let tick_duration = Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ);
    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut last_tick = Instant::now();
    let mut since_hud = 0.0_f32;

    loop {
        interval.tick().await;
        let now = Instant::now();
        let dt = (now - last_tick).as_secs_f32();
        last_tick = now;

        let local = pilot.intent(dt);
        sim.tick(&local, None, dt);
        log_events(&mut sim);

        since_hud += dt;
        if since_hud >= HUD_UPDATE_INTERVAL * 20.0 {
            since_hud = 0.0;
            let hud = sim.hud();
            info!(
                "hp {:.0}/{:.0} armor {:.0} ammo {} zone {:.0} time {:.0}s",
                hud.hp, hud.max_hp, hud.armor, hud.ammo, hud.zone_radius, hud.time_remaining
            );
        }

        if let Some(winner) = sim.outcome {
            info!("match over, winner: {winner:?}");
            return Ok(());
        }
    }
}

fn log_events(sim: &mut Simulation) {
    for event in sim.drain_events() {
        match event {
            SimEvent::CombatantHit { target, damage, .. } => {
                debug!("{target:?} hit for {damage:.0}");
            }
            SimEvent::MatchEnded { winner } => debug!("match ended: {winner:?}"),
            other => trace!(?other, "sim event"),
        }
    }
}
