use bevy_math::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::constants::{
    BOT_ACCURACY, BOT_ADVANTAGE_MARGIN, BOT_AIM_LEAD_FACTOR, BOT_CRITICAL_HP, BOT_DANGER_DISTANCE,
    BOT_FIRE_RANGE_MULTIPLIER, BOT_LOOT_SEARCH_RADIUS, BOT_LOW_HP, BOT_OPTIMAL_RANGE_FRACTION,
    BOT_PRESSING_RANGE_FRACTION, BOT_RANGE_BAND, BOT_STRAFE_FLIP_RATE, BOT_STRAFE_WOBBLE, BOT_STUCK_SPEED,
    BOT_STUCK_TIME, BOT_UNSTUCK_DURATION, BOT_UNSTUCK_SWEEP_RATE, BOT_WEAVE_FREQUENCY, BOT_WEAVE_GAIN,
    BOT_ZIGZAG_FREQUENCY, BOT_ZIGZAG_GAIN, PHYSICS_EPSILON,
};
use crate::entities::{Combatant, LootItem};
use crate::math::vec_angle;

// ============================================================================
// Bot AI
// ============================================================================

// The decision logic is an explicit state machine so each behavior is
// testable on its own; states are re-derived every tick in priority order
// rather than transitioned edge-by-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Seeking,
    Fleeing,
    Approaching,
    Retreating,
    Strafing,
    Unstuck,
}

#[derive(Debug, Clone, Copy)]
pub struct BotDecision {
    pub movement: Vec2, // intent vector, clamped by the integrator
    pub angle: f32,     // exact facing, no smoothing for bots
    pub fire: bool,
}

#[derive(Debug)]
pub struct BotController {
    pub state: BotState,
    stuck_for: f32,
    unstuck_until: f32,
}

impl Default for BotController {
    fn default() -> Self {
        Self {
            state: BotState::Strafing,
            stuck_for: 0.0,
            unstuck_until: f32::NEG_INFINITY,
        }
    }
}

impl BotController {
    // Produce this tick's movement intent, facing angle, and trigger intent.
    pub fn think(
        &mut self,
        me: &Combatant,
        opponent: &Combatant,
        loot: &[LootItem],
        elapsed: f32,
        dt: f32,
        rng: &mut StdRng,
    ) -> BotDecision {
        let to_opponent = opponent.pos - me.pos;
        let distance = to_opponent.length().max(PHYSICS_EPSILON);
        let toward = to_opponent / distance;

        let mut movement = self.steer(me, opponent, loot, elapsed, distance, toward);

        // Independent stuck override: intent without progress means the
        // steering is pushing into geometry it cannot resolve.
        self.track_stuck(me, movement, elapsed, dt);
        if elapsed < self.unstuck_until {
            self.state = BotState::Unstuck;
            movement = Vec2::from_angle(elapsed * BOT_UNSTUCK_SWEEP_RATE);
        }

        BotDecision {
            movement,
            angle: self.aim_angle(me, opponent, distance),
            fire: self.wants_fire(me, elapsed, distance, rng),
        }
    }

    fn steer(
        &mut self,
        me: &Combatant,
        opponent: &Combatant,
        loot: &[LootItem],
        elapsed: f32,
        distance: f32,
        toward: Vec2,
    ) -> Vec2 {
        let perpendicular = toward.perp();
        let advantage = me.hp - opponent.hp >= BOT_ADVANTAGE_MARGIN;

        // 1. Critically hurt and a restorative item is nearby: go get it,
        //    with a small oscillation so the path is not a straight line.
        if me.hp < BOT_CRITICAL_HP {
            if let Some(item) = nearest_restorative(me.pos, loot) {
                self.state = BotState::Seeking;
                let to_item = (item.pos - me.pos).normalize_or_zero();
                let weave = to_item.perp() * ((elapsed * BOT_WEAVE_FREQUENCY).sin() * BOT_WEAVE_GAIN);
                return to_item + weave;
            }
        }

        // 2. Hurt, close to a stronger opponent: run, zigzagging.
        if me.hp < BOT_LOW_HP && distance < BOT_DANGER_DISTANCE && !advantage {
            self.state = BotState::Fleeing;
            let zigzag = perpendicular * ((elapsed * BOT_ZIGZAG_FREQUENCY).sin() * BOT_ZIGZAG_GAIN);
            return -toward + zigzag;
        }

        // 3. Hold the engagement band for the equipped weapon; press closer
        //    when ahead on health.
        let range = me.weapon.stats().range;
        let fraction = if advantage && opponent.hp < BOT_LOW_HP {
            BOT_PRESSING_RANGE_FRACTION
        } else {
            BOT_OPTIMAL_RANGE_FRACTION
        };
        let optimal = range * fraction;

        if distance > optimal * (1.0 + BOT_RANGE_BAND) {
            self.state = BotState::Approaching;
            let weave = perpendicular * ((elapsed * BOT_WEAVE_FREQUENCY).sin() * BOT_WEAVE_GAIN);
            toward + weave
        } else if distance < optimal * (1.0 - BOT_RANGE_BAND) {
            self.state = BotState::Retreating;
            -toward
        } else {
            self.state = BotState::Strafing;
            let strafe_dir = if (elapsed * BOT_STRAFE_FLIP_RATE).sin() >= 0.0 { 1.0 } else { -1.0 };
            let wobble = toward * ((elapsed * BOT_ZIGZAG_FREQUENCY).sin() * BOT_STRAFE_WOBBLE);
            perpendicular * strafe_dir + wobble
        }
    }

    fn track_stuck(&mut self, me: &Combatant, movement: Vec2, elapsed: f32, dt: f32) {
        let wants_to_move = movement.length_squared() > PHYSICS_EPSILON;
        if wants_to_move && me.vel.length() < BOT_STUCK_SPEED {
            self.stuck_for += dt;
        } else {
            self.stuck_for = 0.0;
        }
        if self.stuck_for >= BOT_STUCK_TIME && elapsed >= self.unstuck_until {
            self.unstuck_until = elapsed + BOT_UNSTUCK_DURATION;
            self.stuck_for = 0.0;
        }
    }

    // Exact angle to the opponent plus crude linear lead from its velocity.
    fn aim_angle(&self, me: &Combatant, opponent: &Combatant, distance: f32) -> f32 {
        let flight_time = distance / me.weapon.stats().bullet_speed;
        let predicted = opponent.pos + opponent.vel * flight_time * BOT_AIM_LEAD_FACTOR;
        vec_angle(predicted - me.pos)
    }

    // Range gate, reload gate, a slower-than-human fire cadence, and the
    // accuracy roll that keeps bots beatable.
    fn wants_fire(&self, me: &Combatant, elapsed: f32, distance: f32, rng: &mut StdRng) -> bool {
        let stats = me.weapon.stats();
        if distance > stats.range * BOT_FIRE_RANGE_MULTIPLIER {
            return false;
        }
        if me.reloading {
            return false;
        }
        if elapsed - me.last_fired_at < stats.fire_interval * stats.bot_fire_interval_multiplier {
            return false;
        }
        rng.gen_bool(BOT_ACCURACY)
    }
}

fn nearest_restorative(pos: Vec2, loot: &[LootItem]) -> Option<&LootItem> {
    loot.iter()
        .filter(|item| item.kind.restores_health_or_armor())
        .filter(|item| item.pos.distance(pos) <= BOT_LOOT_SEARCH_RADIUS)
        .min_by(|a, b| {
            a.pos
                .distance_squared(pos)
                .total_cmp(&b.pos.distance_squared(pos))
        })
}
