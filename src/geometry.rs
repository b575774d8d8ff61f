//! Small 2D math helpers shared by the simulation
//!
//! Positions are plain `Vec2` values in world units with y growing downward.
//! All angles are in radians.

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::{PI, TAU};

/// Euclidean distance between two points
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Angle of the segment from `a` to `b`, measured with `atan2(dy, dx)`
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.y.atan2(d.x)
}

/// Unit vector in the direction of `v`, or zero when `v` has no length
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v / len } else { Vec2::ZERO }
}

pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}

/// Rotate `point` around `center` by `angle`
pub fn rotate_around(point: Vec2, center: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    let d = point - center;
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + center
}

/// Fold an angle into (-PI, PI]
pub fn wrap_angle(mut angle: f32) -> f32 {
    if !angle.is_finite() {
        return angle;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

/// Uniformly pick an angle and a radius, then place a point around `center`
pub fn random_point_in_circle(center: Vec2, radius: f32, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let r = if radius > 0.0 { rng.gen_range(0.0..radius) } else { 0.0 };
    center + Vec2::new(r * angle.cos(), r * angle.sin())
}

/// Random point inside the rectangle `[min, max]`
pub fn random_point_in_rect(min: Vec2, max: Vec2, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y))
}

/// Point `distance` units from `from`, on the far side of `threat`
pub fn escape_point(from: Vec2, threat: Vec2, distance: f32) -> Vec2 {
    from + normalize_or_zero(from - threat) * distance
}
