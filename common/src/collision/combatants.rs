use bevy_math::Vec2;

use super::helpers::{circle_overlaps_wall, wall_penetration};
use crate::constants::{UNSTUCK_ITERATIONS, UNSTUCK_PADDING, WALL_BOUNCE_DAMPING, WALL_SLIDE_DAMPING};
use crate::entities::Wall;

// ============================================================================
// Predictive Axis-Separated Blocking
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct WallResponse {
    pub blocked_x: bool,
    pub blocked_y: bool,
}

// Move a circle by vel*dt, testing each axis independently against every
// wall. A blocked axis keeps its old coordinate and gets a small inverted
// bounce; when exactly one axis is blocked the other is damped so the entity
// slides along the obstacle instead of stopping dead.
pub fn resolve_combatant_walls(
    pos: &mut Vec2,
    vel: &mut Vec2,
    radius: f32,
    walls: &[Wall],
    dt: f32,
) -> WallResponse {
    let candidate_x = Vec2::new(vel.x.mul_add(dt, pos.x), pos.y);
    let blocked_x = walls.iter().any(|w| circle_overlaps_wall(candidate_x, radius, w));
    if blocked_x {
        vel.x = -vel.x * WALL_BOUNCE_DAMPING;
    } else {
        pos.x = candidate_x.x;
    }

    let candidate_y = Vec2::new(pos.x, vel.y.mul_add(dt, pos.y));
    let blocked_y = walls.iter().any(|w| circle_overlaps_wall(candidate_y, radius, w));
    if blocked_y {
        vel.y = -vel.y * WALL_BOUNCE_DAMPING;
    } else {
        pos.y = candidate_y.y;
    }

    if blocked_x != blocked_y {
        if blocked_x {
            vel.y *= WALL_SLIDE_DAMPING;
        } else {
            vel.x *= WALL_SLIDE_DAMPING;
        }
    }

    WallResponse { blocked_x, blocked_y }
}

// ============================================================================
// Corrective Unstuck Pass
// ============================================================================

// Axis-separated blocking can still end penetrating when a corner is
// approached diagonally. Nudge out along the summed penetration pushes,
// iterating a bounded number of times. Returns true if still stuck after the
// final iteration; the next tick tries again.
pub fn unstuck_from_walls(pos: &mut Vec2, radius: f32, walls: &[Wall]) -> bool {
    for _ in 0..UNSTUCK_ITERATIONS {
        let mut push = Vec2::ZERO;
        let mut penetrating = false;

        for wall in walls {
            if let Some((dir, depth)) = wall_penetration(*pos, radius, wall) {
                push += dir * (depth + UNSTUCK_PADDING);
                penetrating = true;
            }
        }

        if !penetrating {
            return false;
        }
        *pos += push;
    }

    walls.iter().any(|w| circle_overlaps_wall(*pos, radius, w))
}
