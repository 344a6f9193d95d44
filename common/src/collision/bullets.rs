use bevy_math::Vec2;

use super::helpers::{segment_vs_circle, segment_vs_rect};
use crate::entities::{Combatant, Wall, WallShape};

// ============================================================================
// Bullet Sweeps
// ============================================================================

// Bullets are treated as points against static geometry; sweeping the whole
// per-tick path prevents fast rounds from tunneling through thin walls.
#[must_use]
pub fn segment_hits_wall(start: Vec2, end: Vec2, wall: &Wall) -> Option<f32> {
    match wall.shape {
        WallShape::Rect { half_width, half_height } => {
            segment_vs_rect(start, end, wall.center(), Vec2::new(half_width, half_height), 0.0)
        }
        WallShape::Circle { radius } => segment_vs_circle(start, end, wall.center(), radius),
    }
}

// Against combatants the bullet keeps its radius: sweep versus a circle
// inflated by both radii.
#[must_use]
pub fn segment_hits_combatant(start: Vec2, end: Vec2, bullet_radius: f32, target: &Combatant) -> Option<f32> {
    segment_vs_circle(start, end, target.pos, bullet_radius + target.radius)
}
