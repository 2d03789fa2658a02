//! Zonefall - an arena-survival battle royale simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, AI, combat, zone, win/lose)
//! - `tuning`: Data-driven game balance (weapons, archetypes, loot tables)
//!
//! Rendering, audio, and input capture are host concerns. A host samples
//! elapsed time and an [`InputState`](sim::InputState) snapshot, calls
//! [`Engine::update`](sim::Engine::update), and reads the returned state.
//! The engine is the sole state mutator.

pub mod sim;
pub mod tuning;

pub use sim::{Engine, GameState, InputState};

use glam::Vec2;
use rand::Rng;

/// World configuration constants, fixed at build time
pub mod consts {
    /// World dimensions (units)
    pub const WORLD_WIDTH: f32 = 2000.0;
    pub const WORLD_HEIGHT: f32 = 2000.0;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const LOOT_RADIUS: f32 = 15.0;

    /// Player movement speed (units/sec)
    pub const PLAYER_SPEED: f32 = 200.0;

    /// Distance at which an enemy acquires a target
    pub const DETECTION_RANGE: f32 = 350.0;
    /// Distance at which an enemy is allowed to fire
    pub const FIRING_RANGE: f32 = 280.0;
    /// Enemy bullet speed (units/sec)
    pub const ENEMY_BULLET_SPEED: f32 = 350.0;
    /// Distance at which a wander waypoint counts as reached
    pub const WANDER_ARRIVE_DIST: f32 = 20.0;

    /// Safe zone
    pub const INITIAL_ZONE_RADIUS: f32 = 900.0;
    pub const MIN_ZONE_RADIUS: f32 = 100.0;
    pub const ZONE_SHRINK_INTERVAL_MS: f32 = 30_000.0;
    /// Linear shrink rate (units/sec)
    pub const ZONE_SHRINK_SPEED: f32 = 20.0;
    pub const ZONE_DAMAGE_PER_SEC: f32 = 5.0;
    /// Each shrink targets this fraction of the current radius
    pub const ZONE_SHRINK_FACTOR: f32 = 0.7;
    /// Maximum per-axis center drift on each shrink
    pub const ZONE_CENTER_JITTER: f32 = 100.0;

    /// Spawn counts and margins
    pub const INITIAL_ENEMIES: usize = 30;
    pub const LOOT_SPAWN_COUNT: usize = 40;
    pub const ENEMY_SPAWN_MARGIN: f32 = 100.0;
    pub const LOOT_SPAWN_MARGIN: f32 = 50.0;

    /// Kill feed
    pub const KILL_FEED_MAX: usize = 5;
    pub const KILL_FEED_TTL_MS: f32 = 5_000.0;
}

/// Angle (radians) from `from` toward `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Random point inside world bounds, inset by `margin` on every side
pub fn random_position(rng: &mut impl Rng, margin: f32) -> Vec2 {
    Vec2::new(
        rng.random_range(margin..consts::WORLD_WIDTH - margin),
        rng.random_range(margin..consts::WORLD_HEIGHT - margin),
    )
}
