//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Step-driven only: one `update` call is one atomic state transition
//! - Seeded RNG only, owned by the engine alongside the state
//! - No rendering, audio, or platform dependencies
//!
//! Consumers observe state through read-only borrows or owned snapshots;
//! the engine is the only mutator.

pub mod collision;
pub mod state;
pub mod tick;

pub use state::{
    Bullet, Enemy, GameState, InputState, KillFeedEntry, LootItem, LootKind, Player, SafeZone,
    PLAYER_ID,
};
pub use tick::{new_match, tick};

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Owns the authoritative match state and the seeded RNG that feeds it
pub struct Engine {
    seed: u64,
    rng: Pcg32,
    state: GameState,
}

impl Engine {
    /// Build a fresh match from `seed`
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = tick::new_match(&mut rng);
        Self { seed, rng, state }
    }

    /// Advance the simulation by `dt_ms` milliseconds and return a read-only
    /// view of the result. A terminal match is a frozen no-op, so a host loop
    /// may keep calling this after game over.
    pub fn update(&mut self, dt_ms: f32, input: &InputState) -> &GameState {
        tick::tick(&mut self.state, input, dt_ms, &mut self.rng);
        &self.state
    }

    /// Read-only view of the current state
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Owned copy for consumers that outlive the borrow
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// The seed this match was built from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Discard the match and reinitialize from the same seed
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.state = tick::new_match(&mut self.rng);
    }
}
