use bevy_math::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

use crate::aim::{AimAssist, resolve_facing};
use crate::bot::BotController;
use crate::combat;
use crate::constants::{BOT_DAMAGE_DROP_CHANCE, MATCH_DURATION, MAX_TICK_DT};
use crate::entities::{Bullet, Combatant, LootItem, PlayerId, Side, Wall};
use crate::events::SimEvent;
use crate::loot::{LootDirector, resolve_pickups};
use crate::map::{arena_center, generate_walls, opponent_spawn, player_spawn};
use crate::movement::integrate;
use crate::protocol::{BulletState, CombatantState, LootState, SState};
use crate::weapons::WeaponKind;
use crate::zone::{Zone, apply_zone_damage};

// ============================================================================
// Input Intents
// ============================================================================

// Latest-wins analog intent; asynchronous sources overwrite a mailbox copy
// and the tick reads it once. No queueing: stale intents are worthless.
#[derive(Debug, Clone, Copy, Default)]
pub struct Intent {
    pub movement: Vec2,
    pub aim: Vec2,
    pub sprint: bool,
    pub fire: bool,
}

// Intent of the remote peer plus its self-owned facing angle, which
// overrides any locally-computed aim for that combatant.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteIntent {
    pub intent: Intent,
    pub angle: f32,
}

// ============================================================================
// Simulation Context
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    // Local player versus the bot; loot drops on bot damage are enabled.
    SinglePlayer,
    // Authoritative side of a peer-to-peer match; the opponent is remote.
    PvpHost,
}

// The whole mutable match state, exclusively owned by whoever calls tick().
// External writers (input handlers, the network receive task) never touch
// this directly; they fill mailboxes that the embedding loop hands in.
pub struct Simulation {
    pub mode: MatchMode,
    pub walls: Vec<Wall>,
    pub player: Combatant,
    pub opponent: Combatant,
    pub bullets: Vec<Bullet>,
    pub loot: Vec<LootItem>,
    pub zone: Zone,
    pub elapsed: f32,
    pub outcome: Option<Side>,
    rng: StdRng,
    loot_director: LootDirector,
    bot: Option<BotController>,
    assist: AimAssist,
    next_bullet_id: u32,
    events: Vec<SimEvent>,
}

impl Simulation {
    #[must_use]
    pub fn new(mode: MatchMode, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let walls = generate_walls(&mut rng);

        let mut player = Combatant::spawn(PlayerId(1), player_spawn(), false);
        let mut opponent = Combatant::spawn(PlayerId(2), opponent_spawn(), mode == MatchMode::SinglePlayer);
        // Both sides start from the same baseline whatever mode produced them.
        player.normalize_for_match();
        opponent.normalize_for_match();
        opponent.is_bot = mode == MatchMode::SinglePlayer;

        Self {
            mode,
            walls,
            player,
            opponent,
            bullets: Vec::new(),
            loot: Vec::new(),
            zone: Zone::new(arena_center()),
            elapsed: 0.0,
            outcome: None,
            rng,
            loot_director: LootDirector::default(),
            bot: (mode == MatchMode::SinglePlayer).then(BotController::default),
            assist: AimAssist::default(),
            next_bullet_id: 1,
            events: Vec::new(),
        }
    }

    // One fixed-order tick. The order matters: firing uses this tick's
    // facing, and the win check observes this tick's damage.
    pub fn tick(&mut self, local: &Intent, remote: Option<&RemoteIntent>, dt: f32) {
        if self.outcome.is_some() {
            return;
        }
        let dt = dt.clamp(0.0, MAX_TICK_DT);
        if dt <= 0.0 {
            return;
        }
        self.elapsed += dt;

        // Opponent intent: bot decision in single-player, mailbox in PvP.
        let (opp_intent, opp_angle, opp_fire) = match (&mut self.bot, remote) {
            (Some(bot), _) => {
                let decision = bot.think(
                    &self.opponent,
                    &self.player,
                    &self.loot,
                    self.elapsed,
                    dt,
                    &mut self.rng,
                );
                (
                    Intent {
                        movement: decision.movement,
                        aim: Vec2::ZERO,
                        sprint: false,
                        fire: decision.fire,
                    },
                    Some(decision.angle),
                    decision.fire,
                )
            }
            (None, Some(remote)) => (remote.intent, Some(remote.angle), remote.intent.fire),
            (None, None) => (Intent::default(), None, false),
        };

        // 1. Movement integration.
        integrate(&mut self.player, local.movement, local.sprint, &self.walls, dt);
        integrate(&mut self.opponent, opp_intent.movement, opp_intent.sprint, &self.walls, dt);

        // 2. Aim and fire, on this tick's positions.
        combat::finish_reload(&mut self.player, Duration::from_secs_f32(dt));
        combat::finish_reload(&mut self.opponent, Duration::from_secs_f32(dt));

        if self.player.alive() {
            let resolution = resolve_facing(
                &mut self.assist,
                self.player.pos,
                self.player.angle,
                self.opponent.pos,
                self.opponent.alive(),
                local.aim,
                local.movement,
                dt,
            );
            self.player.angle = resolution.angle;
            if resolution.wants_fire || local.fire {
                combat::try_fire(
                    &mut self.player,
                    Side::Player,
                    self.elapsed,
                    &mut self.rng,
                    &mut self.next_bullet_id,
                    &mut self.bullets,
                    &mut self.events,
                );
            }
        }

        if self.opponent.alive() {
            // The opponent's angle is authoritative from its controller: the
            // bot's exact lead, or the remote client's own smoothed aim.
            if let Some(angle) = opp_angle {
                self.opponent.angle = angle;
            }
            if opp_fire {
                combat::try_fire(
                    &mut self.opponent,
                    Side::Opponent,
                    self.elapsed,
                    &mut self.rng,
                    &mut self.next_bullet_id,
                    &mut self.bullets,
                    &mut self.events,
                );
            }
        }

        // 3. Projectiles.
        let hits = combat::advance_bullets(
            &mut self.bullets,
            &self.walls,
            &mut self.player,
            &mut self.opponent,
            self.elapsed,
            dt,
            &mut self.events,
        );
        if self.mode == MatchMode::SinglePlayer {
            for hit in &hits {
                if hit.target == Side::Opponent && self.rng.gen_bool(BOT_DAMAGE_DROP_CHANCE) {
                    self.loot_director
                        .drop_consumable_near(hit.pos, &mut self.loot, &mut self.rng, &mut self.events);
                }
            }
        }

        // 4. Loot and zone.
        self.loot_director
            .update(&mut self.loot, &self.walls, &mut self.rng, dt, &mut self.events);
        resolve_pickups(&mut self.player, &mut self.opponent, &mut self.loot, &mut self.events);
        apply_zone_damage(&mut self.player, &self.zone, self.elapsed, dt);
        apply_zone_damage(&mut self.opponent, &self.zone, self.elapsed, dt);

        // 5. Win condition, on this tick's damage.
        self.check_outcome();
    }

    fn check_outcome(&mut self) {
        let winner = if !self.opponent.alive() {
            // A mutual kill in one tick goes to the local player.
            Some(Side::Player)
        } else if !self.player.alive() {
            Some(Side::Opponent)
        } else if self.elapsed >= MATCH_DURATION {
            // Timer expiry: the healthier combatant takes it.
            Some(if self.player.hp >= self.opponent.hp {
                Side::Player
            } else {
                Side::Opponent
            })
        } else {
            None
        };

        if let Some(winner) = winner {
            self.outcome = Some(winner);
            self.events.push(SimEvent::MatchEnded { winner });
        }
    }

    // ------------------------------------------------------------------
    // Read-only views for the embedding loop
    // ------------------------------------------------------------------

    #[must_use]
    pub fn zone_radius(&self) -> f32 {
        self.zone.radius_at(self.elapsed)
    }

    #[must_use]
    pub fn time_remaining(&self) -> f32 {
        (MATCH_DURATION - self.elapsed).max(0.0)
    }

    // The authoritative snapshot broadcast to the network client.
    #[must_use]
    pub fn snapshot(&self) -> SState {
        SState {
            players: [
                CombatantState::capture(&self.player),
                CombatantState::capture(&self.opponent),
            ],
            bullets: self.bullets.iter().map(BulletState::capture).collect(),
            loot: self.loot.iter().map(LootState::capture).collect(),
            zone_radius: self.zone_radius(),
            time_remaining: self.time_remaining(),
        }
    }

    // Drained by the embedding loop once per tick; audio/VFX/UI only.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn hud(&self) -> HudStats {
        HudStats {
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            armor: self.player.armor,
            weapon: self.player.weapon,
            ammo: self.player.ammo,
            reloading: self.player.reloading,
            sprint_cooldown_remaining: self.player.sprint_cooldown.remaining_secs(),
            time_remaining: self.time_remaining(),
            zone_radius: self.zone_radius(),
        }
    }
}

// Throttled side-channel for the on-screen display; never read back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub hp: f32,
    pub max_hp: f32,
    pub armor: f32,
    pub weapon: WeaponKind,
    pub ammo: u32,
    pub reloading: bool,
    pub sprint_cooldown_remaining: f32,
    pub time_remaining: f32,
    pub zone_radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn neutral() -> Intent {
        Intent::default()
    }

    #[test]
    fn tick_is_inert_after_an_outcome() {
        let mut sim = Simulation::new(MatchMode::SinglePlayer, 1);
        sim.opponent.hp = 0.0;
        sim.tick(&neutral(), None, DT);
        assert_eq!(sim.outcome, Some(Side::Player));

        let elapsed = sim.elapsed;
        sim.tick(&neutral(), None, DT);
        assert!((sim.elapsed - elapsed).abs() < f32::EPSILON);
    }

    #[test]
    fn dt_is_clamped_against_long_pauses() {
        let mut sim = Simulation::new(MatchMode::SinglePlayer, 1);
        sim.tick(&neutral(), None, 5.0); // tab-background style stall
        assert!((sim.elapsed - MAX_TICK_DT).abs() < 1e-6);
    }

    #[test]
    fn invariants_hold_over_a_long_scripted_match() {
        let mut sim = Simulation::new(MatchMode::SinglePlayer, 42);
        let mut intent = Intent {
            movement: Vec2::new(1.0, 0.2),
            aim: Vec2::X,
            sprint: false,
            fire: false,
        };

        for i in 0..3600 {
            intent.sprint = i % 200 < 20;
            intent.aim = Vec2::from_angle(i as f32 * 0.01);
            sim.tick(&intent, None, DT);

            for c in [&sim.player, &sim.opponent] {
                assert!(c.hp >= 0.0 && c.hp <= c.max_hp);
                assert!(c.armor >= 0.0 && c.armor <= crate::constants::ARMOR_MAX);
                assert!(c.ammo <= c.weapon.clip_size());
            }
            if sim.outcome.is_some() {
                break;
            }
        }
    }

    #[test]
    fn identical_seeds_and_inputs_replay_identically() {
        let mut a = Simulation::new(MatchMode::SinglePlayer, 7);
        let mut b = Simulation::new(MatchMode::SinglePlayer, 7);

        for i in 0..600 {
            let intent = Intent {
                movement: Vec2::from_angle(i as f32 * 0.02),
                aim: Vec2::from_angle(i as f32 * 0.03),
                sprint: i % 90 == 0,
                fire: false,
            };
            a.tick(&intent, None, DT);
            b.tick(&intent, None, DT);
        }

        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.opponent.pos, b.opponent.pos);
        assert_eq!(a.player.hp, b.player.hp);
        assert_eq!(a.opponent.hp, b.opponent.hp);
        assert_eq!(a.bullets.len(), b.bullets.len());
        assert_eq!(a.loot.len(), b.loot.len());
    }

    #[test]
    fn remote_angle_overrides_opponent_facing() {
        let mut sim = Simulation::new(MatchMode::PvpHost, 3);
        let remote = RemoteIntent {
            intent: Intent::default(),
            angle: 2.5,
        };
        sim.tick(&neutral(), Some(&remote), DT);
        assert!((sim.opponent.angle - 2.5).abs() < f32::EPSILON);
    }

    #[test]
    fn pvp_host_has_no_bot_and_idle_remote_stays_put() {
        let mut sim = Simulation::new(MatchMode::PvpHost, 3);
        let start = sim.opponent.pos;
        for _ in 0..120 {
            sim.tick(&neutral(), None, DT);
        }
        assert!(sim.opponent.pos.distance(start) < 1.0);
    }

    #[test]
    fn snapshot_mirrors_sim_state() {
        let mut sim = Simulation::new(MatchMode::PvpHost, 9);
        sim.tick(&neutral(), None, DT);

        let snap = sim.snapshot();
        assert!((Vec2::from(snap.players[0].pos) - sim.player.pos).length() < 1e-5);
        assert!((Vec2::from(snap.players[1].pos) - sim.opponent.pos).length() < 1e-5);
        assert!((snap.zone_radius - sim.zone_radius()).abs() < 1e-5);
        assert_eq!(snap.bullets.len(), sim.bullets.len());
    }

    #[test]
    fn match_timer_expiry_awards_the_healthier_side() {
        let mut sim = Simulation::new(MatchMode::PvpHost, 5);
        sim.elapsed = MATCH_DURATION + 1.0;
        sim.player.hp = 80.0;
        sim.opponent.hp = 30.0;
        // Park both inside the (fully shrunk) zone so no last-tick damage.
        sim.player.pos = arena_center();
        sim.opponent.pos = arena_center() + Vec2::new(30.0, 0.0);
        sim.tick(&neutral(), None, DT);
        assert_eq!(sim.outcome, Some(Side::Player));
    }
}
