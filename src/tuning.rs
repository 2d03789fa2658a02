//! Data-driven game balance
//!
//! Weapon templates, enemy archetype stats, and spawn-roll tables. Every
//! lookup is keyed by a closed enum so a new weapon or archetype is a
//! compile-time change, never a string match.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ordinal rarity tier affecting loot strength and spawn probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Closed set of weapon templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Smg,
    Rifle,
    Shotgun,
    Sniper,
    Minigun,
}

/// An instantiated weapon
///
/// Always a copy of a template: picking one up or equipping one clones the
/// template, so mutating the carried copy's ammo never aliases another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Damage dealt per pellet
    pub damage: f32,
    /// Minimum interval between shots (game-clock ms)
    pub fire_rate_ms: f32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Bullet travel speed (units/sec)
    pub bullet_speed: f32,
    /// Total angular spread; each pellet deviates within +/- half of this
    pub spread: f32,
    pub rarity: Rarity,
    /// Pellets emitted per shot (one ammo per shot regardless)
    pub pellet_count: u32,
}

impl Weapon {
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

impl WeaponKind {
    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Pistol => "Pistol",
            WeaponKind::Smg => "SMG",
            WeaponKind::Rifle => "Assault Rifle",
            WeaponKind::Shotgun => "Shotgun",
            WeaponKind::Sniper => "Sniper",
            WeaponKind::Minigun => "Minigun",
        }
    }

    /// Fresh fully-loaded instance of this weapon
    pub fn template(self) -> Weapon {
        match self {
            WeaponKind::Pistol => Weapon {
                kind: self,
                damage: 15.0,
                fire_rate_ms: 400.0,
                ammo: 12,
                max_ammo: 12,
                bullet_speed: 500.0,
                spread: 0.05,
                rarity: Rarity::Common,
                pellet_count: 1,
            },
            WeaponKind::Smg => Weapon {
                kind: self,
                damage: 10.0,
                fire_rate_ms: 100.0,
                ammo: 30,
                max_ammo: 30,
                bullet_speed: 450.0,
                spread: 0.15,
                rarity: Rarity::Common,
                pellet_count: 1,
            },
            WeaponKind::Rifle => Weapon {
                kind: self,
                damage: 20.0,
                fire_rate_ms: 150.0,
                ammo: 25,
                max_ammo: 25,
                bullet_speed: 600.0,
                spread: 0.08,
                rarity: Rarity::Rare,
                pellet_count: 1,
            },
            WeaponKind::Shotgun => Weapon {
                kind: self,
                damage: 16.0,
                fire_rate_ms: 800.0,
                ammo: 6,
                max_ammo: 6,
                bullet_speed: 400.0,
                spread: 0.3,
                rarity: Rarity::Rare,
                pellet_count: 5,
            },
            WeaponKind::Sniper => Weapon {
                kind: self,
                damage: 100.0,
                fire_rate_ms: 1500.0,
                ammo: 5,
                max_ammo: 5,
                bullet_speed: 1000.0,
                spread: 0.01,
                rarity: Rarity::Epic,
                pellet_count: 1,
            },
            WeaponKind::Minigun => Weapon {
                kind: self,
                damage: 8.0,
                fire_rate_ms: 50.0,
                ammo: 100,
                max_ammo: 100,
                bullet_speed: 550.0,
                spread: 0.2,
                rarity: Rarity::Legendary,
                pellet_count: 1,
            },
        }
    }
}

/// Enemy behavioral/stat class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    Normal,
    Fast,
    Tank,
}

/// Per-archetype parameters
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeStats {
    /// Chase speed (units/sec); wandering moves at half this
    pub speed: f32,
    pub max_health: f32,
    /// Minimum interval between shots (game-clock ms)
    pub fire_interval_ms: f32,
    pub bullet_damage: f32,
    /// Display label for kill-feed entries
    pub label: &'static str,
    /// Weapon label credited on friendly-fire kills
    pub sidearm: &'static str,
}

impl Archetype {
    pub fn stats(self) -> ArchetypeStats {
        match self {
            Archetype::Normal => ArchetypeStats {
                speed: 80.0,
                max_health: 80.0,
                fire_interval_ms: 1000.0,
                bullet_damage: 10.0,
                label: "Enemy normal",
                sidearm: "Pistol",
            },
            Archetype::Fast => ArchetypeStats {
                speed: 140.0,
                max_health: 60.0,
                fire_interval_ms: 800.0,
                bullet_damage: 10.0,
                label: "Enemy fast",
                sidearm: "SMG",
            },
            Archetype::Tank => ArchetypeStats {
                speed: 50.0,
                max_health: 150.0,
                fire_interval_ms: 1500.0,
                bullet_damage: 20.0,
                label: "Enemy tank",
                sidearm: "Cannon",
            },
        }
    }
}

/// Roll an archetype for a fresh spawn: 60% normal, then 70/30 fast/tank
pub fn roll_archetype(rng: &mut impl Rng) -> Archetype {
    if rng.random::<f32>() < 0.6 {
        Archetype::Normal
    } else if rng.random::<f32>() < 0.7 {
        Archetype::Fast
    } else {
        Archetype::Tank
    }
}

/// Roll a weapon drop weighted by rarity tier
///
/// 50% pistol, 25% smg/rifle, 15% shotgun/sniper, 10% minigun.
pub fn roll_weapon(rng: &mut impl Rng) -> Weapon {
    let roll = rng.random::<f32>();
    let kind = if roll < 0.5 {
        WeaponKind::Pistol
    } else if roll < 0.75 {
        if rng.random::<f32>() < 0.5 {
            WeaponKind::Smg
        } else {
            WeaponKind::Rifle
        }
    } else if roll < 0.9 {
        if rng.random::<f32>() < 0.5 {
            WeaponKind::Shotgun
        } else {
            WeaponKind::Sniper
        }
    } else {
        WeaponKind::Minigun
    };
    kind.template()
}
