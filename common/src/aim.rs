use bevy_math::Vec2;

use crate::constants::{
    AIM_DEADZONE, AIM_TURN_RATE, AUTO_FIRE_THRESHOLD, PHYSICS_EPSILON, SNAP_ACQUIRE_CONE, SNAP_BLEND_STRENGTH,
    SNAP_FIRE_THRESHOLD, SNAP_MAINTAIN_CONE, SNAP_MAX_RANGE,
};
use crate::math::{angle_difference, approach_angle, lerp_angle, vec_angle};

// ============================================================================
// Aim Assist / Snap Targeting
// ============================================================================

// Magnetizes stick aiming toward the opponent. A pure UX affordance for the
// locally-controlled combatant: bots aim exactly, and the remote peer runs
// its own snap on its own input.
#[derive(Debug, Clone, Copy, Default)]
pub struct AimAssist {
    pub snapped: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct AimResolution {
    pub angle: f32,
    pub wants_fire: bool,
}

// Resolve the facing angle for one tick from the aim stick, falling back to
// the movement direction when unaimed, and decide auto-fire. Hysteresis: the
// acquire cone is strictly narrower than the maintain cone, so a snap at the
// boundary neither flickers on nor off.
pub fn resolve_facing(
    assist: &mut AimAssist,
    my_pos: Vec2,
    current_angle: f32,
    opponent_pos: Vec2,
    opponent_alive: bool,
    aim: Vec2,
    movement: Vec2,
    dt: f32,
) -> AimResolution {
    let aim_magnitude = aim.length();

    if aim_magnitude <= AIM_DEADZONE {
        // Not aiming: no snap, no fire; an unaimed moving character still
        // turns to face its direction of travel.
        assist.snapped = false;
        let angle = if movement.length_squared() > PHYSICS_EPSILON {
            approach_angle(current_angle, vec_angle(movement), AIM_TURN_RATE, dt)
        } else {
            current_angle
        };
        return AimResolution {
            angle,
            wants_fire: false,
        };
    }

    let raw_angle = vec_angle(aim);
    let to_opponent = opponent_pos - my_pos;
    let distance = to_opponent.length();
    let angle_to_opponent = vec_angle(to_opponent);
    let off_target = angle_difference(current_angle, angle_to_opponent).abs();

    let in_range = opponent_alive && distance <= SNAP_MAX_RANGE;
    assist.snapped = if assist.snapped {
        in_range && off_target <= SNAP_MAINTAIN_CONE
    } else {
        in_range && off_target < SNAP_ACQUIRE_CONE
    };

    let desired = if assist.snapped {
        lerp_angle(raw_angle, angle_to_opponent, SNAP_BLEND_STRENGTH)
    } else {
        raw_angle
    };
    let angle = approach_angle(current_angle, desired, AIM_TURN_RATE, dt);

    let fire_threshold = if assist.snapped {
        SNAP_FIRE_THRESHOLD
    } else {
        AUTO_FIRE_THRESHOLD
    };

    AimResolution {
        angle,
        wants_fire: aim_magnitude >= fire_threshold,
    }
}
