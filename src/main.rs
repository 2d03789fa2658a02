//! Headless demo host
//!
//! Drives the engine on a fixed 60 Hz cadence with a scripted bot: strafe,
//! aim at the nearest living enemy, hold the trigger. Real hosts replace
//! this loop with rendering and input collaborators; the engine contract is
//! the same either way.

use glam::Vec2;
use zonefall::sim::{Engine, InputState};

/// 10 minute cap so a stalemate still terminates
const MAX_FRAMES: u64 = 60 * 600;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut engine = Engine::new(seed);
    log::info!("match started with seed {seed}");

    let dt_ms = 1000.0 / 60.0;
    for frame in 0..MAX_FRAMES {
        let input = scripted_input(&engine, frame);
        let state = engine.update(dt_ms, &input);
        if state.game_over {
            break;
        }
    }

    let state = engine.state();
    let outcome = if state.victory {
        "VICTORY"
    } else if state.game_over {
        "DEFEAT"
    } else {
        "TIMEOUT"
    };
    println!(
        "{outcome} after {:.1}s: {} kills, {} combatants left",
        state.game_time_ms / 1000.0,
        state.player.kills,
        state.players_alive
    );
}

/// Crude bot: oscillating strafe toward the zone, aim at the nearest enemy
fn scripted_input(engine: &Engine, frame: u64) -> InputState {
    let state = engine.state();
    let player = &state.player;

    let aim = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .min_by(|a, b| {
            let da = a.pos.distance_squared(player.pos);
            let db = b.pos.distance_squared(player.pos);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos)
        .unwrap_or(player.pos + Vec2::X);

    // Drift toward the zone center so the storm never wins by default
    let to_zone = state.safe_zone.center - player.pos;
    let strafe = frame % 120 < 60;

    InputState {
        up: to_zone.y < -10.0,
        down: to_zone.y > 10.0,
        left: to_zone.x < -10.0 || strafe,
        right: to_zone.x > 10.0 || !strafe,
        aim,
        shooting: true,
    }
}
