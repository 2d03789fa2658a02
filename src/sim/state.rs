//! Game state and core simulation types
//!
//! Everything the engine mutates per tick lives here. All types derive serde
//! so a consumer can snapshot the full match at any point.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{Archetype, Rarity, Weapon, WeaponKind};

/// Entity id reserved for the player
pub const PLAYER_ID: u32 = 0;

/// Input snapshot consumed once at the start of each tick
///
/// Written by the host's input collaborator, read by the engine. One
/// consistent snapshot per step keeps the tick a pure state transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim point in world coordinates (camera-corrected by the host)
    pub aim: Vec2,
    pub shooting: bool,
}

/// The player entity
///
/// Created at match start, mutated every tick, never removed. Death only
/// clears the alive flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians, toward the aim point)
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub shield: f32,
    pub max_shield: f32,
    /// Owned copy of a weapon template
    pub weapon: Weapon,
    pub alive: bool,
    pub kills: u32,
    /// Game-clock time of the last shot; `None` means the next pull fires
    pub last_shot_at: Option<f32>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            id: PLAYER_ID,
            pos: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: 100.0,
            max_health: 100.0,
            shield: 0.0,
            max_shield: 100.0,
            weapon: WeaponKind::Pistol.template(),
            alive: true,
            kills: 0,
            last_shot_at: None,
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// An AI-controlled opponent
///
/// Dead enemies stay in the collection with `alive = false` so indices and
/// ids remain stable for observers; they are never targeted and never move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    /// Current wander waypoint, re-picked on arrival
    pub wander_target: Option<Vec2>,
    pub last_shot_at: Option<f32>,
    pub archetype: Archetype,
}

/// A projectile in flight
///
/// Removed when it leaves the world or lands its first hit. A spent bullet
/// no longer collides within the same tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub owner: u32,
    pub from_player: bool,
    /// Id of the entity this was aimed at, if any
    pub target: Option<u32>,
    pub spent: bool,
}

/// Effect carried by a loot drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LootKind {
    /// Replaces the player's weapon outright, ammo included
    Weapon(Weapon),
    Health(f32),
    Shield(f32),
    Ammo(u32),
}

/// A lootable ground item, removed on pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub id: u32,
    pub pos: Vec2,
    pub kind: LootKind,
    pub rarity: Rarity,
}

/// The shrinking circular safe area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub center: Vec2,
    pub current_radius: f32,
    pub target_radius: f32,
    /// Linear shrink rate (units/sec)
    pub shrink_speed: f32,
    pub damage_per_sec: f32,
    /// Game-clock time of the next scheduled shrink
    pub next_shrink_at: f32,
}

impl SafeZone {
    pub fn new() -> Self {
        Self {
            center: Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0),
            current_radius: INITIAL_ZONE_RADIUS,
            target_radius: INITIAL_ZONE_RADIUS,
            shrink_speed: ZONE_SHRINK_SPEED,
            damage_per_sec: ZONE_DAMAGE_PER_SEC,
            next_shrink_at: ZONE_SHRINK_INTERVAL_MS,
        }
    }
}

impl Default for SafeZone {
    fn default() -> Self {
        Self::new()
    }
}

/// One elimination event for display, newest first in the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillFeedEntry {
    pub id: u32,
    pub killer: String,
    pub victim: String,
    pub weapon: String,
    /// Game-clock time the entry was created
    pub at_ms: f32,
}

/// Complete match state, owned by the [`Engine`](super::Engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub loot: Vec<LootItem>,
    pub safe_zone: SafeZone,
    /// Living enemies plus one if the player is alive
    pub players_alive: u32,
    /// Accumulated simulated time (ms); all cooldowns compare against this
    pub game_time_ms: f32,
    pub game_over: bool,
    pub victory: bool,
    pub kill_feed: Vec<KillFeedEntry>,
    next_id: u32,
}

impl GameState {
    /// Empty match shell: player at world center, fresh zone, no spawns yet
    pub fn new() -> Self {
        Self {
            player: Player::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            loot: Vec::new(),
            safe_zone: SafeZone::new(),
            players_alive: 1,
            game_time_ms: 0.0,
            game_over: false,
            victory: false,
            kill_feed: Vec::new(),
            next_id: PLAYER_ID + 1,
        }
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an elimination at the front of the feed, keeping it bounded
    pub fn push_kill(&mut self, killer: &str, victim: &str, weapon: &str) {
        log::debug!("{killer} eliminated {victim} ({weapon})");
        let id = self.next_entity_id();
        self.kill_feed.insert(
            0,
            KillFeedEntry {
                id,
                killer: killer.to_owned(),
                victim: victim.to_owned(),
                weapon: weapon.to_owned(),
                at_ms: self.game_time_ms,
            },
        );
        self.kill_feed.truncate(KILL_FEED_MAX);
    }

    /// Drop feed entries older than the display TTL
    pub fn prune_kill_feed(&mut self) {
        let now = self.game_time_ms;
        self.kill_feed.retain(|e| now - e.at_ms < KILL_FEED_TTL_MS);
    }

    /// Living enemies
    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
