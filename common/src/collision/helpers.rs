use bevy_math::Vec2;

use crate::constants::PHYSICS_EPSILON;
use crate::entities::{Wall, WallShape};

// ============================================================================
// Overlap Tests
// ============================================================================

#[must_use]
pub fn circle_overlaps_circle(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let combined = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= combined * combined
}

// Closest point of a wall's footprint to `p`.
#[must_use]
pub fn closest_point_on_wall(wall: &Wall, p: Vec2) -> Vec2 {
    match wall.shape {
        WallShape::Rect { half_width, half_height } => Vec2::new(
            p.x.clamp(wall.x - half_width, wall.x + half_width),
            p.y.clamp(wall.y - half_height, wall.y + half_height),
        ),
        WallShape::Circle { radius } => {
            let offset = p - wall.center();
            let dist = offset.length();
            if dist <= PHYSICS_EPSILON {
                wall.center()
            } else {
                wall.center() + offset * (radius.min(dist) / dist)
            }
        }
    }
}

#[must_use]
pub fn circle_overlaps_wall(pos: Vec2, radius: f32, wall: &Wall) -> bool {
    match wall.shape {
        WallShape::Rect { .. } => {
            let closest = closest_point_on_wall(wall, pos);
            pos.distance_squared(closest) <= radius * radius
        }
        WallShape::Circle { radius: wall_radius } => {
            circle_overlaps_circle(pos, radius, wall.center(), wall_radius)
        }
    }
}

// Push direction and estimated depth for a circle penetrating a wall, or None
// if the circle is clear. The direction points away from the wall center so a
// circle swallowed whole still gets pushed somewhere consistent.
#[must_use]
pub fn wall_penetration(pos: Vec2, radius: f32, wall: &Wall) -> Option<(Vec2, f32)> {
    if !circle_overlaps_wall(pos, radius, wall) {
        return None;
    }

    let depth = match wall.shape {
        WallShape::Rect { .. } => {
            let closest = closest_point_on_wall(wall, pos);
            radius - pos.distance(closest)
        }
        WallShape::Circle { radius: wall_radius } => radius + wall_radius - pos.distance(wall.center()),
    };

    let away = pos - wall.center();
    let dir = if away.length_squared() <= PHYSICS_EPSILON {
        Vec2::X
    } else {
        away.normalize()
    };
    Some((dir, depth.max(0.0)))
}

// ============================================================================
// Segment Sweeps
// ============================================================================

// Intersection interval of a 1D ray with a slab (used in segment-AABB tests).
#[must_use]
pub fn sweep_slab_interval(
    local_coord: f32,
    ray_dir: f32,
    half_extent: f32,
    t_min: f32,
    t_max: f32,
) -> Option<(f32, f32)> {
    if ray_dir.abs() > PHYSICS_EPSILON {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        if new_min <= new_max { Some((new_min, new_max)) } else { None }
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}

// Earliest t in [0, 1] at which the segment start..end enters an axis-aligned
// rect inflated by `inflate` on each side.
#[must_use]
pub fn segment_vs_rect(start: Vec2, end: Vec2, center: Vec2, half: Vec2, inflate: f32) -> Option<f32> {
    let dir = end - start;
    let local = start - center;

    let mut t_min = 0.0_f32;
    let mut t_max = 1.0_f32;

    if let Some((new_min, new_max)) = sweep_slab_interval(local.x, dir.x, half.x + inflate, t_min, t_max) {
        t_min = new_min;
        t_max = new_max;
    } else {
        return None;
    }

    if let Some((new_min, new_max)) = sweep_slab_interval(local.y, dir.y, half.y + inflate, t_min, t_max) {
        t_min = new_min;
        t_max = new_max;
    } else {
        return None;
    }

    (t_min <= t_max && t_max >= 0.0 && t_min <= 1.0).then(|| t_min.clamp(0.0, 1.0))
}

// Earliest t in [0, 1] at which the segment start..end enters a circle.
#[must_use]
pub fn segment_vs_circle(start: Vec2, end: Vec2, center: Vec2, radius: f32) -> Option<f32> {
    let d = end - start;
    let f = start - center;

    let a = d.length_squared();
    if a <= PHYSICS_EPSILON {
        // Degenerate segment: a plain point-in-circle test.
        return (f.length_squared() <= radius * radius).then_some(0.0);
    }

    let b = 2.0 * f.dot(d);
    let c = radius.mul_add(-radius, f.length_squared());
    let discriminant = b.mul_add(b, -4.0 * a * c);
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 >= 0.0 && t1 <= 1.0 {
        Some(t1)
    } else if t2 >= 0.0 && t2 <= 1.0 {
        // Started inside the circle.
        Some(0.0)
    } else {
        None
    }
}
