use bevy_math::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::collision::circle_overlaps_wall;
use crate::constants::{
    ARENA_HEIGHT, ARENA_WIDTH, BOUNDARY_THICKNESS, OBSTACLE_COUNT, OBSTACLE_MAX_SIZE, OBSTACLE_MIN_SIZE,
    PILLAR_RADIUS, SPAWN_CLEARANCE,
};
use crate::entities::Wall;

// ============================================================================
// Arena Layout
// ============================================================================

#[must_use]
pub const fn arena_center() -> Vec2 {
    Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
}

#[must_use]
pub const fn player_spawn() -> Vec2 {
    Vec2::new(ARENA_WIDTH * 0.15, ARENA_HEIGHT / 2.0)
}

#[must_use]
pub const fn opponent_spawn() -> Vec2 {
    Vec2::new(ARENA_WIDTH * 0.85, ARENA_HEIGHT / 2.0)
}

// Four oversized rectangles enclosing the playfield.
#[must_use]
pub fn boundary_walls() -> [Wall; 4] {
    let half_t = BOUNDARY_THICKNESS / 2.0;
    let span_w = ARENA_WIDTH + 2.0 * BOUNDARY_THICKNESS;
    let span_h = ARENA_HEIGHT + 2.0 * BOUNDARY_THICKNESS;
    [
        Wall::rect(ARENA_WIDTH / 2.0, -half_t, span_w, BOUNDARY_THICKNESS),
        Wall::rect(ARENA_WIDTH / 2.0, ARENA_HEIGHT + half_t, span_w, BOUNDARY_THICKNESS),
        Wall::rect(-half_t, ARENA_HEIGHT / 2.0, BOUNDARY_THICKNESS, span_h),
        Wall::rect(ARENA_WIDTH + half_t, ARENA_HEIGHT / 2.0, BOUNDARY_THICKNESS, span_h),
    ]
}

// Generate the match layout: boundary plus a scattering of rectangular
// obstacles and round pillars, keeping both spawn points clear. Seeded by the
// host so the client receives an identical layout in Init.
#[must_use]
pub fn generate_walls(rng: &mut StdRng) -> Vec<Wall> {
    let mut walls: Vec<Wall> = boundary_walls().to_vec();

    let spawns = [player_spawn(), opponent_spawn()];
    let margin = OBSTACLE_MAX_SIZE / 2.0;

    for i in 0..OBSTACLE_COUNT {
        // Every third obstacle is a pillar.
        let candidate = if i % 3 == 2 {
            let x = rng.gen_range(margin..ARENA_WIDTH - margin);
            let y = rng.gen_range(margin..ARENA_HEIGHT - margin);
            Wall::pillar(x, y, PILLAR_RADIUS)
        } else {
            let w = rng.gen_range(OBSTACLE_MIN_SIZE..OBSTACLE_MAX_SIZE);
            let h = rng.gen_range(OBSTACLE_MIN_SIZE..OBSTACLE_MAX_SIZE);
            let x = rng.gen_range(margin..ARENA_WIDTH - margin);
            let y = rng.gen_range(margin..ARENA_HEIGHT - margin);
            Wall::rect(x, y, w, h)
        };

        let blocks_spawn = spawns
            .iter()
            .any(|s| circle_overlaps_wall(*s, SPAWN_CLEARANCE, &candidate));
        if !blocks_spawn {
            walls.push(candidate);
        }
    }

    walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn boundary_encloses_the_playfield() {
        let walls = boundary_walls();
        assert_eq!(walls.len(), 4);
        // A point in the middle of the arena touches nothing.
        for wall in &walls {
            assert!(!circle_overlaps_wall(arena_center(), 50.0, wall));
        }
        // Points past each edge are inside a boundary rect.
        let outside = [
            Vec2::new(ARENA_WIDTH / 2.0, -10.0),
            Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT + 10.0),
            Vec2::new(-10.0, ARENA_HEIGHT / 2.0),
            Vec2::new(ARENA_WIDTH + 10.0, ARENA_HEIGHT / 2.0),
        ];
        for p in outside {
            assert!(walls.iter().any(|w| circle_overlaps_wall(p, 1.0, w)));
        }
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let a = generate_walls(&mut StdRng::seed_from_u64(7));
        let b = generate_walls(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);

        let c = generate_walls(&mut StdRng::seed_from_u64(8));
        assert_ne!(a, c);
    }

    #[test]
    fn spawn_points_stay_clear() {
        let walls = generate_walls(&mut StdRng::seed_from_u64(42));
        for wall in walls.iter().skip(4) {
            assert!(!circle_overlaps_wall(player_spawn(), SPAWN_CLEARANCE, wall));
            assert!(!circle_overlaps_wall(opponent_spawn(), SPAWN_CLEARANCE, wall));
        }
    }
}
