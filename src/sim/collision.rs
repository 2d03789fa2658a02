//! Circle-overlap queries for combat, loot, and zone resolution
//!
//! Everything in the arena collides as a circle, so the whole contact model
//! reduces to center-distance checks against radius sums.

use glam::Vec2;

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};

/// True when two circles overlap (center distance strictly below radius sum)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// True when `point` lies inside or on the circle
#[inline]
pub fn inside_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// True when `pos` has left the world rectangle
#[inline]
pub fn out_of_bounds(pos: Vec2) -> bool {
    pos.x < 0.0 || pos.x > WORLD_WIDTH || pos.y < 0.0 || pos.y > WORLD_HEIGHT
}
