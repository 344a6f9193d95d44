use bevy_math::Vec2;

use crate::constants::{
    ZONE_DAMAGE_PER_SECOND, ZONE_INITIAL_RADIUS, ZONE_MIN_RADIUS, ZONE_SHRINK_DURATION, ZONE_SHRINK_START,
};
use crate::entities::Combatant;
use crate::math::lerp;

// ============================================================================
// Shrinking Safe Zone
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub center: Vec2,
    pub initial_radius: f32,
    pub min_radius: f32,
    pub shrink_start: f32,
    pub shrink_duration: f32,
}

impl Zone {
    #[must_use]
    pub const fn new(center: Vec2) -> Self {
        Self {
            center,
            initial_radius: ZONE_INITIAL_RADIUS,
            min_radius: ZONE_MIN_RADIUS,
            shrink_start: ZONE_SHRINK_START,
            shrink_duration: ZONE_SHRINK_DURATION,
        }
    }

    // Constant until the shrink starts, then linear down to the minimum.
    // Monotonic: never re-expands.
    #[must_use]
    pub fn radius_at(&self, elapsed: f32) -> f32 {
        if elapsed <= self.shrink_start {
            return self.initial_radius;
        }
        let progress = ((elapsed - self.shrink_start) / self.shrink_duration).clamp(0.0, 1.0);
        lerp(self.initial_radius, self.min_radius, progress)
    }

    #[must_use]
    pub fn contains(&self, pos: Vec2, elapsed: f32) -> bool {
        pos.distance(self.center) <= self.radius_at(elapsed)
    }
}

// Rate-based damage outside the zone; resets the same damage/regen timers a
// projectile hit does so regeneration cannot race zone ticks.
pub fn apply_zone_damage(combatant: &mut Combatant, zone: &Zone, elapsed: f32, dt: f32) {
    if !combatant.alive() || zone.contains(combatant.pos, elapsed) {
        return;
    }
    crate::combat::apply_damage(combatant, ZONE_DAMAGE_PER_SECOND * dt, elapsed);
}
