// walls_bot/bot/src/systems/physics/collision.rs
use crate::core::types::Vec2;

/// Overshoot tolerated before a position counts as outside the arena.
const WALL_TOLERANCE: f64 = 1e-6;

/// Keeps a bot's center `radius` away from every wall.
///
/// Returns the corrected position and whether a wall was hit.
pub fn clamp_to_arena(position: Vec2, radius: f64, width: f64, height: f64) -> (Vec2, bool) {
    let (min_x, max_x) = (radius, width - radius);
    let (min_y, max_y) = (radius, height - radius);
    let hit_wall = position.x < min_x - WALL_TOLERANCE
        || position.x > max_x + WALL_TOLERANCE
        || position.y < min_y - WALL_TOLERANCE
        || position.y > max_y + WALL_TOLERANCE;
    (
        Vec2::new(position.x.clamp(min_x, max_x), position.y.clamp(min_y, max_y)),
        hit_wall,
    )
}

/// Fraction of the move `from -> to` after which the mover touches `other`,
/// where touching means centers `min_distance` apart.
///
/// Moves that end clear of `other`, or that increase the gap, never collide.
pub fn bot_contact(from: Vec2, to: Vec2, other: Vec2, min_distance: f64) -> Option<f64> {
    let end_distance = to.distance_to(other);
    if end_distance >= min_distance || end_distance >= from.distance_to(other) {
        return None;
    }

    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let (fx, fy) = (from.x - other.x, from.y - other.y);
    let a = dx * dx + dy * dy;
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - min_distance * min_distance;
    if c <= 0.0 {
        // Already overlapping and closing in: no movement allowed.
        return Some(0.0);
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    Some(((-b - discriminant.sqrt()) / (2.0 * a)).clamp(0.0, 1.0))
}
