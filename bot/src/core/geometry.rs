// walls_bot/bot/src/core/geometry.rs
//! Angle and firepower math. Angles are in degrees; 0 points east and
//! headings grow counter-clockwise.

use crate::core::constants::{MAX_FIREPOWER, MAX_SPEED, MAX_TURN_RATE, MIN_FIREPOWER, WALL_TURN_DEGREES};
use crate::core::types::Vec2;

/// Normalizes to [0, 360).
pub fn normalize_absolute_angle(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a >= 0.0 { a } else { a + 360.0 }
}

/// Normalizes to (-180, 180].
pub fn normalize_relative_angle(angle: f64) -> f64 {
    let a = angle % 360.0;
    if a > 180.0 {
        a - 360.0
    } else if a <= -180.0 {
        a + 360.0
    } else {
        a
    }
}

/// Shortest signed turn from `source` to `target`.
pub fn calc_delta_angle(target: f64, source: f64) -> f64 {
    normalize_relative_angle(target - source)
}

pub fn direction_to(from: Vec2, to: Vec2) -> f64 {
    normalize_absolute_angle((to.y - from.y).atan2(to.x - from.x).to_degrees())
}

/// Signed offset from `heading` to the point `to`, as seen from `from`.
pub fn bearing_to(from: Vec2, heading: f64, to: Vec2) -> f64 {
    normalize_relative_angle(direction_to(from, to) - heading)
}

/// Clockwise turn that lines an arbitrary heading up with the wall grid.
pub fn wall_alignment_turn(heading: f64) -> f64 {
    heading.rem_euclid(WALL_TURN_DEGREES)
}

pub fn clamp_firepower(firepower: f64) -> f64 {
    firepower.clamp(MIN_FIREPOWER, MAX_FIREPOWER)
}

pub fn calc_gun_heat(firepower: f64) -> f64 {
    1.0 + clamp_firepower(firepower) / 5.0
}

pub fn calc_max_turn_rate(speed: f64) -> f64 {
    MAX_TURN_RATE - 0.75 * speed.clamp(-MAX_SPEED, MAX_SPEED).abs()
}

/// Moves `distance` units along `direction`.
pub fn advance(position: Vec2, direction: f64, distance: f64) -> Vec2 {
    let radians = direction.to_radians();
    Vec2::new(position.x + radians.cos() * distance, position.y + radians.sin() * distance)
}
