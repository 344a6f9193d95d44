use bevy_math::Vec2;
use std::f32::consts::{PI, TAU};

// ============================================================================
// Scalar & Angular Interpolation
// ============================================================================

#[must_use]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    (b - a).mul_add(t, a)
}

// Wrap an angle to (-PI, PI].
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}

// Signed shortest difference from `from` to `to`, in (-PI, PI].
#[must_use]
pub fn angle_difference(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

// Interpolate between angles along the shortest arc.
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(angle_difference(from, to).mul_add(t, from))
}

// Frame-rate independent exponential approach: the result covers the same
// fraction of the gap per second regardless of dt.
#[must_use]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = 1.0 - (-rate * dt).exp();
    (target - current).mul_add(t, current)
}

#[must_use]
pub fn approach_angle(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = 1.0 - (-rate * dt).exp();
    lerp_angle(current, target, t)
}

// Facing angle of a non-zero vector; zero vectors map to zero.
#[must_use]
pub fn vec_angle(v: Vec2) -> f32 {
    if v.length_squared() < f32::EPSILON { 0.0 } else { v.y.atan2(v.x) }
}
