use bevy_math::Vec2;
use std::time::Duration;

use crate::collision::{resolve_combatant_walls, unstuck_from_walls};
use crate::constants::{
    ACCEL_RATE, FRICTION_RATE, MOVE_SPEED, PHYSICS_EPSILON, REGEN_HEAL, REGEN_INTERVAL, SPRINT_MULTIPLIER,
    TURN_ACCEL_RATE, VELOCITY_SNAP_EPSILON,
};
use crate::entities::{Combatant, Wall};

// ============================================================================
// Movement & Collision Integrator
// ============================================================================

// Advance one combatant by one tick: regeneration, the sprint state machine,
// acceleration-based velocity, and wall resolution. Fully deterministic —
// randomness lives in weapon spread, loot rolls, and the bot, never here.
pub fn integrate(combatant: &mut Combatant, move_intent: Vec2, sprint_wanted: bool, walls: &[Wall], dt: f32) {
    if !combatant.alive() {
        return;
    }

    let delta = Duration::from_secs_f32(dt);
    tick_regen(combatant, delta);
    tick_sprint(combatant, sprint_wanted, delta);

    let intent = clamp_intent(move_intent);
    let max_speed = MOVE_SPEED * combatant.speed_multiplier;
    let target = intent * max_speed;

    combatant.vel.x = approach_axis(combatant.vel.x, target.x, dt);
    combatant.vel.y = approach_axis(combatant.vel.y, target.y, dt);

    resolve_combatant_walls(&mut combatant.pos, &mut combatant.vel, combatant.radius, walls, dt);
    unstuck_from_walls(&mut combatant.pos, combatant.radius, walls);
}

fn clamp_intent(intent: Vec2) -> Vec2 {
    if intent.length_squared() > 1.0 { intent.normalize() } else { intent }
}

// ============================================================================
// Regeneration
// ============================================================================

// Heal a fixed amount each time a full damage-free interval passes. Taking
// damage resets the stopwatch (see combat::apply_damage), so regeneration
// only resumes after the whole interval has re-elapsed.
fn tick_regen(combatant: &mut Combatant, delta: Duration) {
    if combatant.hp <= 0.0 || combatant.hp >= combatant.max_hp {
        return;
    }
    combatant.regen.tick(delta);
    if combatant.regen.elapsed_secs() >= REGEN_INTERVAL {
        combatant.heal(REGEN_HEAL);
        combatant.regen.reset();
    }
}

// ============================================================================
// Sprint State Machine
// ============================================================================

// Both windows count down every tick. A request only succeeds when the
// previous sprint AND its cooldown have both run out; the cooldown starts
// counting at sprint start, not sprint end.
fn tick_sprint(combatant: &mut Combatant, sprint_wanted: bool, delta: Duration) {
    combatant.sprint_active.tick(delta);
    combatant.sprint_cooldown.tick(delta);

    if sprint_wanted && combatant.sprint_active.is_finished() && combatant.sprint_cooldown.is_finished() {
        combatant.sprint_active.reset();
        combatant.sprint_cooldown.reset();
    }

    combatant.speed_multiplier = if combatant.sprint_active.is_finished() {
        1.0
    } else {
        SPRINT_MULTIPLIER
    };
}

// ============================================================================
// Acceleration Model
// ============================================================================

// Exponential approach toward the target velocity with three rate constants:
// decelerating to rest (friction), reversing direction (fastest), or plain
// acceleration. Near-zero results snap to exactly zero to kill drift.
fn approach_axis(velocity: f32, target: f32, dt: f32) -> f32 {
    let rate = if target.abs() <= PHYSICS_EPSILON {
        FRICTION_RATE
    } else if velocity != 0.0 && (velocity > 0.0) != (target > 0.0) {
        TURN_ACCEL_RATE
    } else {
        ACCEL_RATE
    };

    let next = crate::math::approach(velocity, target, rate, dt);
    if target.abs() <= PHYSICS_EPSILON && next.abs() < VELOCITY_SNAP_EPSILON {
        0.0
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SPRINT_COOLDOWN, SPRINT_DURATION};
    use crate::entities::PlayerId;

    const DT: f32 = 1.0 / 60.0;

    fn combatant() -> Combatant {
        Combatant::spawn(PlayerId(1), Vec2::new(800.0, 800.0), false)
    }

    #[test]
    fn accelerates_toward_intent_and_coasts_to_exact_zero() {
        let mut c = combatant();
        for _ in 0..120 {
            integrate(&mut c, Vec2::X, false, &[], DT);
        }
        assert!(c.vel.x > MOVE_SPEED * 0.9);
        assert!(c.vel.y.abs() < f32::EPSILON);

        for _ in 0..300 {
            integrate(&mut c, Vec2::ZERO, false, &[], DT);
        }
        assert!(c.vel.x.abs() < f32::EPSILON); // snapped, not merely small
    }

    #[test]
    fn integration_is_deterministic() {
        let script = [
            (Vec2::new(1.0, 0.0), false),
            (Vec2::new(0.7, 0.7), true),
            (Vec2::new(0.0, -1.0), false),
            (Vec2::ZERO, false),
        ];
        let walls = [Wall::rect(900.0, 800.0, 60.0, 60.0)];

        let mut a = combatant();
        let mut b = combatant();
        for _ in 0..200 {
            for (intent, sprint) in script {
                integrate(&mut a, intent, sprint, &walls, DT);
                integrate(&mut b, intent, sprint, &walls, DT);
            }
        }
        assert_eq!(a.pos, b.pos);
        assert_eq!(a.vel, b.vel);
    }

    #[test]
    fn sprint_request_honors_both_windows() {
        let mut c = combatant();

        integrate(&mut c, Vec2::X, true, &[], DT);
        assert!((c.speed_multiplier - SPRINT_MULTIPLIER).abs() < f32::EPSILON);

        // Mid-sprint and mid-cooldown requests do not restart the sprint.
        let ticks_to_expiry = (SPRINT_DURATION / DT).ceil() as u32 + 2;
        for _ in 0..ticks_to_expiry {
            integrate(&mut c, Vec2::X, true, &[], DT);
        }
        // Sprint over, cooldown still running: multiplier back to 1.
        assert!((c.speed_multiplier - 1.0).abs() < f32::EPSILON);

        // After the cooldown runs out a request works again.
        let ticks_to_ready = ((SPRINT_COOLDOWN - SPRINT_DURATION) / DT).ceil() as u32 + 2;
        for _ in 0..ticks_to_ready {
            integrate(&mut c, Vec2::X, false, &[], DT);
        }
        integrate(&mut c, Vec2::X, true, &[], DT);
        assert!((c.speed_multiplier - SPRINT_MULTIPLIER).abs() < f32::EPSILON);
    }

    #[test]
    fn regen_heals_only_after_a_quiet_interval() {
        let mut c = combatant();
        c.hp = 50.0;

        let quiet_ticks = (REGEN_INTERVAL / DT).ceil() as u32 + 1;
        for _ in 0..quiet_ticks {
            integrate(&mut c, Vec2::ZERO, false, &[], DT);
        }
        assert!((c.hp - (50.0 + REGEN_HEAL)).abs() < 1e-4);

        // Damage resets the window: the same number of ticks minus a few
        // after a hit heals nothing.
        crate::combat::apply_damage(&mut c, 10.0, 10.0);
        let hp_after_hit = c.hp;
        for _ in 0..quiet_ticks - 5 {
            integrate(&mut c, Vec2::ZERO, false, &[], DT);
        }
        assert!((c.hp - hp_after_hit).abs() < f32::EPSILON);
    }

    #[test]
    fn full_health_does_not_accumulate_regen() {
        let mut c = combatant();
        for _ in 0..200 {
            integrate(&mut c, Vec2::ZERO, false, &[], DT);
        }
        assert!((c.hp - c.max_hp).abs() < f32::EPSILON);
        assert!(c.regen.elapsed_secs() < f32::EPSILON);
    }

    #[test]
    fn walks_into_wall_and_never_penetrates() {
        let walls = [Wall::rect(900.0, 800.0, 60.0, 200.0)];
        let mut c = combatant();
        for _ in 0..600 {
            integrate(&mut c, Vec2::X, false, &walls, DT);
            assert!(
                !crate::collision::circle_overlaps_wall(c.pos, c.radius - 1.0, &walls[0]),
                "penetrated wall at {:?}",
                c.pos
            );
        }
        // Parked against the left face of the wall.
        assert!(c.pos.x < 900.0 - 30.0);
        assert!(c.pos.x > 800.0);
    }

    #[test]
    fn diagonal_corner_approach_gets_unstuck() {
        let walls = [
            Wall::rect(900.0, 850.0, 100.0, 100.0),
            Wall::rect(850.0, 900.0, 100.0, 100.0),
        ];
        let mut c = combatant();
        c.pos = Vec2::new(810.0, 810.0);
        for _ in 0..300 {
            integrate(&mut c, Vec2::new(0.7, 0.7), false, &walls, DT);
        }
        for wall in &walls {
            assert!(!crate::collision::circle_overlaps_wall(c.pos, c.radius - 1.0, wall));
        }
    }
}
