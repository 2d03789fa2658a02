//! Per-frame simulation step
//!
//! [`tick`] advances the match by one discrete time step: player motion and
//! fire, enemy AI, projectile travel, collision resolution, zone shrink,
//! kill-feed pruning, and the terminal check. Match setup lives here too.

use glam::Vec2;
use rand::Rng;

use super::collision::{circles_overlap, inside_circle, out_of_bounds};
use super::state::{
    Bullet, Enemy, GameState, InputState, LootItem, LootKind, Player, PLAYER_ID,
};
use crate::consts::*;
use crate::tuning::{self, Rarity};
use crate::{angle_to, random_position};

/// Advance the match by `dt_ms` milliseconds
///
/// A terminal match is a frozen no-op, and a non-finite or negative delta
/// rejects the whole step so NaN can never reach position or health fields.
pub fn tick(state: &mut GameState, input: &InputState, dt_ms: f32, rng: &mut impl Rng) {
    if state.game_over {
        return;
    }
    if !dt_ms.is_finite() || dt_ms < 0.0 {
        log::warn!("rejected step with invalid dt {dt_ms}");
        return;
    }

    let dt = dt_ms / 1000.0;
    state.game_time_ms += dt_ms;

    update_player(state, input, dt, rng);
    update_enemies(state, dt, rng);
    update_bullets(state, dt);
    resolve_collisions(state, dt);
    update_safe_zone(state, dt, rng);
    state.prune_kill_feed();
    check_game_over(state);
}

fn update_player(state: &mut GameState, input: &InputState, dt: f32, rng: &mut impl Rng) {
    if !state.player.alive {
        return;
    }

    let mut dir = Vec2::ZERO;
    if input.up {
        dir.y -= 1.0;
    }
    if input.down {
        dir.y += 1.0;
    }
    if input.left {
        dir.x -= 1.0;
    }
    if input.right {
        dir.x += 1.0;
    }
    // Normalized so diagonals are not faster
    let dir = dir.normalize_or_zero();

    let player = &mut state.player;
    player.vel = dir * PLAYER_SPEED;
    player.pos += player.vel * dt;
    player.pos.x = player.pos.x.clamp(PLAYER_RADIUS, WORLD_WIDTH - PLAYER_RADIUS);
    player.pos.y = player.pos.y.clamp(PLAYER_RADIUS, WORLD_HEIGHT - PLAYER_RADIUS);

    // A non-finite aim point would poison rotation with NaN; keep prior facing
    if input.aim.is_finite() {
        player.rotation = angle_to(player.pos, input.aim);
    }

    if input.shooting && player.weapon.ammo > 0 {
        let now = state.game_time_ms;
        let ready = player
            .last_shot_at
            .is_none_or(|t| now - t >= player.weapon.fire_rate_ms);
        if ready {
            state.player.last_shot_at = Some(now);
            fire_player_weapon(state, rng);
        }
    }
}

/// Spawn one shot from the player's weapon: one ammo, `pellet_count` bullets
fn fire_player_weapon(state: &mut GameState, rng: &mut impl Rng) {
    let weapon = state.player.weapon.clone();
    let pos = state.player.pos;
    let rotation = state.player.rotation;

    for _ in 0..weapon.pellet_count {
        let spread = (rng.random::<f32>() - 0.5) * weapon.spread;
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::from_angle(rotation + spread) * weapon.bullet_speed,
            damage: weapon.damage,
            owner: PLAYER_ID,
            from_player: true,
            target: None,
            spent: false,
        });
    }
    state.player.weapon.ammo -= 1;
}

fn update_enemies(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    // Snapshot living positions up front so every enemy targets the same frame
    let living: Vec<(u32, Vec2)> = state
        .living_enemies()
        .map(|e| (e.id, e.pos))
        .collect();
    let player_pos = state.player.alive.then_some(state.player.pos);
    let now = state.game_time_ms;
    let zone_center = state.safe_zone.center;
    let zone_radius = state.safe_zone.current_radius;
    let zone_dps = state.safe_zone.damage_per_sec;

    let mut shots: Vec<(u32, Vec2, f32, f32, u32)> = Vec::new();
    let mut zone_deaths: Vec<&'static str> = Vec::new();

    for i in 0..state.enemies.len() {
        if !state.enemies[i].alive {
            continue;
        }
        let (eid, epos) = (state.enemies[i].id, state.enemies[i].pos);
        let stats = state.enemies[i].archetype.stats();

        // Nearest living target: the player or any other living enemy
        let mut nearest: Option<(u32, Vec2, f32)> = None;
        if let Some(ppos) = player_pos {
            nearest = Some((PLAYER_ID, ppos, epos.distance(ppos)));
        }
        for &(oid, opos) in &living {
            if oid == eid {
                continue;
            }
            let d = epos.distance(opos);
            if nearest.is_none_or(|(_, _, nd)| d < nd) {
                nearest = Some((oid, opos, d));
            }
        }

        let enemy = &mut state.enemies[i];
        match nearest {
            Some((tid, tpos, dist)) if dist < DETECTION_RANGE => {
                let dir = (tpos - enemy.pos).normalize_or_zero();
                enemy.vel = dir * stats.speed;
                enemy.rotation = angle_to(enemy.pos, tpos);

                let ready = enemy
                    .last_shot_at
                    .is_none_or(|t| now - t >= stats.fire_interval_ms);
                if dist < FIRING_RANGE && ready {
                    enemy.last_shot_at = Some(now);
                    shots.push((eid, enemy.pos, enemy.rotation, stats.bullet_damage, tid));
                }
            }
            _ => {
                // Wander at half speed, re-picking the waypoint on arrival
                if enemy
                    .wander_target
                    .is_none_or(|t| enemy.pos.distance(t) < WANDER_ARRIVE_DIST)
                {
                    enemy.wander_target = Some(random_position(rng, ENEMY_SPAWN_MARGIN));
                }
                if let Some(target) = enemy.wander_target {
                    let dir = (target - enemy.pos).normalize_or_zero();
                    enemy.vel = dir * stats.speed * 0.5;
                    enemy.rotation = angle_to(enemy.pos, target);
                }
            }
        }

        enemy.pos += enemy.vel * dt;
        enemy.pos.x = enemy.pos.x.clamp(ENEMY_RADIUS, WORLD_WIDTH - ENEMY_RADIUS);
        enemy.pos.y = enemy.pos.y.clamp(ENEMY_RADIUS, WORLD_HEIGHT - ENEMY_RADIUS);

        // Storm attrition
        if !inside_circle(enemy.pos, zone_center, zone_radius) {
            enemy.health -= zone_dps * dt;
            if enemy.health <= 0.0 {
                enemy.health = 0.0;
                enemy.alive = false;
                zone_deaths.push(stats.label);
            }
        }
    }

    for label in zone_deaths {
        state.players_alive -= 1;
        state.push_kill("Zone", label, "Storm");
    }

    for (owner, pos, rotation, damage, tid) in shots {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::from_angle(rotation) * ENEMY_BULLET_SPEED,
            damage,
            owner,
            from_player: false,
            target: Some(tid),
            spent: false,
        });
    }
}

fn update_bullets(state: &mut GameState, dt: f32) {
    for bullet in &mut state.bullets {
        bullet.pos += bullet.vel * dt;
    }
    state.bullets.retain(|b| !out_of_bounds(b.pos));
}

fn resolve_collisions(state: &mut GameState, dt: f32) {
    for bi in 0..state.bullets.len() {
        if state.bullets[bi].spent {
            continue;
        }
        let (bpos, damage, owner, from_player) = {
            let b = &state.bullets[bi];
            (b.pos, b.damage, b.owner, b.from_player)
        };

        if from_player {
            for ei in 0..state.enemies.len() {
                if !state.enemies[ei].alive {
                    continue;
                }
                if circles_overlap(bpos, BULLET_RADIUS, state.enemies[ei].pos, ENEMY_RADIUS) {
                    state.bullets[bi].spent = true;
                    let enemy = &mut state.enemies[ei];
                    enemy.health -= damage;
                    if enemy.health <= 0.0 {
                        enemy.health = 0.0;
                        enemy.alive = false;
                        let victim = enemy.archetype.stats().label;
                        state.player.kills += 1;
                        state.players_alive -= 1;
                        let weapon = state.player.weapon.name();
                        state.push_kill("You", victim, weapon);
                    }
                    break;
                }
            }
        } else {
            // Enemy bullet vs the player: shield soaks damage before health
            if state.player.alive
                && circles_overlap(bpos, BULLET_RADIUS, state.player.pos, PLAYER_RADIUS)
            {
                let player = &mut state.player;
                let absorbed = damage.min(player.shield);
                player.shield -= absorbed;
                player.health -= damage - absorbed;
                if player.health <= 0.0 {
                    player.health = 0.0;
                    player.alive = false;
                    state.players_alive -= 1;
                }
                state.bullets[bi].spent = true;
                continue;
            }

            // Friendly fire: only the shooter itself is exempt
            for ei in 0..state.enemies.len() {
                if !state.enemies[ei].alive || state.enemies[ei].id == owner {
                    continue;
                }
                if circles_overlap(bpos, BULLET_RADIUS, state.enemies[ei].pos, ENEMY_RADIUS) {
                    state.bullets[bi].spent = true;
                    let enemy = &mut state.enemies[ei];
                    enemy.health -= damage;
                    if enemy.health <= 0.0 {
                        enemy.health = 0.0;
                        enemy.alive = false;
                        let victim = enemy.archetype.stats().label;
                        let (killer, weapon) = state
                            .enemies
                            .iter()
                            .find(|e| e.id == owner)
                            .map(|e| {
                                let s = e.archetype.stats();
                                (s.label, s.sidearm)
                            })
                            .unwrap_or(("Enemy", "Pistol"));
                        state.players_alive -= 1;
                        state.push_kill(killer, victim, weapon);
                    }
                    break;
                }
            }
        }
    }
    state.bullets.retain(|b| !b.spent);

    // Loot pickup
    if state.player.alive {
        let mut i = 0;
        while i < state.loot.len() {
            if circles_overlap(state.player.pos, PLAYER_RADIUS, state.loot[i].pos, LOOT_RADIUS) {
                let item = state.loot.remove(i);
                apply_loot(&mut state.player, item);
            } else {
                i += 1;
            }
        }
    }

    // Storm damage to the player, scaled by the true step duration just like
    // enemies take it
    if state.player.alive
        && !inside_circle(
            state.player.pos,
            state.safe_zone.center,
            state.safe_zone.current_radius,
        )
    {
        let dps = state.safe_zone.damage_per_sec;
        let player = &mut state.player;
        player.health -= dps * dt;
        if player.health <= 0.0 {
            player.health = 0.0;
            player.alive = false;
            state.players_alive -= 1;
        }
    }
}

fn apply_loot(player: &mut Player, item: LootItem) {
    match item.kind {
        // Full replacement: the drop's ammo comes with it, nothing carries over
        LootKind::Weapon(weapon) => player.weapon = weapon,
        LootKind::Health(amount) => {
            player.health = (player.health + amount).min(player.max_health);
        }
        LootKind::Shield(amount) => {
            player.shield = (player.shield + amount).min(player.max_shield);
        }
        LootKind::Ammo(rounds) => {
            player.weapon.ammo = (player.weapon.ammo + rounds).min(player.weapon.max_ammo);
        }
    }
}

fn update_safe_zone(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let zone = &mut state.safe_zone;

    if state.game_time_ms >= zone.next_shrink_at && zone.current_radius > MIN_ZONE_RADIUS {
        zone.target_radius = (zone.current_radius * ZONE_SHRINK_FACTOR).max(MIN_ZONE_RADIUS);
        zone.next_shrink_at = state.game_time_ms + ZONE_SHRINK_INTERVAL_MS;

        // Drift the center, then clamp so the target circle stays in bounds
        zone.center.x += rng.random_range(-ZONE_CENTER_JITTER..=ZONE_CENTER_JITTER);
        zone.center.y += rng.random_range(-ZONE_CENTER_JITTER..=ZONE_CENTER_JITTER);
        zone.center.x = zone
            .center
            .x
            .clamp(zone.target_radius, WORLD_WIDTH - zone.target_radius);
        zone.center.y = zone
            .center
            .y
            .clamp(zone.target_radius, WORLD_HEIGHT - zone.target_radius);

        log::info!(
            "zone shrinking toward r={:.0} around ({:.0}, {:.0})",
            zone.target_radius,
            zone.center.x,
            zone.center.y
        );
    }

    // Monotonic linear shrink, never overshooting the target
    if zone.current_radius > zone.target_radius {
        zone.current_radius =
            (zone.current_radius - zone.shrink_speed * dt).max(zone.target_radius);
    }
}

fn check_game_over(state: &mut GameState) {
    if !state.player.alive {
        state.game_over = true;
        state.victory = false;
        log::info!("defeat after {:.1}s", state.game_time_ms / 1000.0);
    } else if state.players_alive <= 1 {
        state.game_over = true;
        state.victory = true;
        log::info!(
            "last one standing after {:.1}s with {} kills",
            state.game_time_ms / 1000.0,
            state.player.kills
        );
    }
}

/// Build a fresh match: centered player, enemies, ground loot, full zone
pub fn new_match(rng: &mut impl Rng) -> GameState {
    let mut state = GameState::new();
    spawn_enemies(&mut state, rng);
    spawn_loot(&mut state, rng);
    state.players_alive = state.living_enemies().count() as u32 + 1;
    log::info!(
        "match ready: {} enemies, {} loot drops, zone r={:.0}",
        state.enemies.len(),
        state.loot.len(),
        state.safe_zone.current_radius
    );
    state
}

fn spawn_enemies(state: &mut GameState, rng: &mut impl Rng) {
    for _ in 0..INITIAL_ENEMIES {
        let archetype = tuning::roll_archetype(rng);
        let stats = archetype.stats();

        // A few rejection attempts bias spawns apart; overlap is still legal
        let mut pos = random_position(rng, ENEMY_SPAWN_MARGIN);
        for _ in 0..8 {
            if state
                .enemies
                .iter()
                .all(|e| e.pos.distance(pos) > ENEMY_RADIUS * 4.0)
            {
                break;
            }
            pos = random_position(rng, ENEMY_SPAWN_MARGIN);
        }

        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: stats.max_health,
            max_health: stats.max_health,
            alive: true,
            wander_target: None,
            last_shot_at: None,
            archetype,
        });
    }
}

fn spawn_loot(state: &mut GameState, rng: &mut impl Rng) {
    for _ in 0..LOOT_SPAWN_COUNT {
        let (kind, rarity) = roll_loot(rng);
        let id = state.next_entity_id();
        state.loot.push(LootItem {
            id,
            pos: random_position(rng, LOOT_SPAWN_MARGIN),
            kind,
            rarity,
        });
    }
}

/// Loot distribution: 30% weapon, 20% health, 20% shield, 30% ammo
fn roll_loot(rng: &mut impl Rng) -> (LootKind, Rarity) {
    let roll = rng.random::<f32>();
    if roll < 0.3 {
        let weapon = tuning::roll_weapon(rng);
        let rarity = weapon.rarity;
        (LootKind::Weapon(weapon), rarity)
    } else if roll < 0.5 {
        if rng.random::<f32>() < 0.7 {
            (LootKind::Health(25.0), Rarity::Common)
        } else {
            (LootKind::Health(50.0), Rarity::Rare)
        }
    } else if roll < 0.7 {
        let tier = rng.random::<f32>();
        if tier < 0.6 {
            (LootKind::Shield(25.0), Rarity::Common)
        } else if rng.random::<f32>() < 0.8 {
            (LootKind::Shield(50.0), Rarity::Rare)
        } else {
            (LootKind::Shield(100.0), Rarity::Epic)
        }
    } else {
        (LootKind::Ammo(30), Rarity::Common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Engine;
    use crate::tuning::{Archetype, WeaponKind};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const STEP_MS: f32 = 16.0;

    fn test_rng() -> Pcg32 {
        Pcg32::seed_from_u64(0xDEAD_BEEF)
    }

    fn spawn_test_enemy(state: &mut GameState, pos: Vec2, archetype: Archetype) -> u32 {
        let stats = archetype.stats();
        let id = state.next_entity_id();
        state.enemies.push(Enemy {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: stats.max_health,
            max_health: stats.max_health,
            alive: true,
            wander_target: None,
            last_shot_at: None,
            archetype,
        });
        state.players_alive += 1;
        id
    }

    #[test]
    fn test_fresh_match_layout() {
        let mut rng = test_rng();
        let state = new_match(&mut rng);

        assert_eq!(state.player.pos, Vec2::new(WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0));
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.player.shield, 0.0);
        assert_eq!(state.player.weapon.kind, WeaponKind::Pistol);
        assert_eq!(state.enemies.len(), INITIAL_ENEMIES);
        assert!(state.enemies.iter().all(|e| e.alive));
        assert_eq!(state.loot.len(), LOOT_SPAWN_COUNT);
        assert_eq!(state.safe_zone.current_radius, INITIAL_ZONE_RADIUS);
        assert_eq!(state.players_alive, INITIAL_ENEMIES as u32 + 1);
        assert!(state.bullets.is_empty());
        assert!(state.kill_feed.is_empty());
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.game_over = true;
        state.victory = true;
        let before = state.clone();

        let input = InputState {
            up: true,
            shooting: true,
            ..Default::default()
        };
        tick(&mut state, &input, STEP_MS, &mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_rejects_non_finite_dt() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        let before = state.clone();

        tick(&mut state, &InputState::default(), f32::NAN, &mut rng);
        assert_eq!(state, before);
        tick(&mut state, &InputState::default(), f32::INFINITY, &mut rng);
        assert_eq!(state, before);
        tick(&mut state, &InputState::default(), -16.0, &mut rng);
        assert_eq!(state, before);
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        let start = state.player.pos;

        let input = InputState {
            down: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, 1000.0, &mut rng);

        let moved = state.player.pos.distance(start);
        assert!((moved - PLAYER_SPEED).abs() < 0.5, "moved {moved}");
    }

    #[test]
    fn test_non_finite_aim_keeps_prior_rotation() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.rotation = 1.25;

        let input = InputState {
            aim: Vec2::new(f32::NAN, 0.0),
            ..Default::default()
        };
        tick(&mut state, &input, STEP_MS, &mut rng);

        assert_eq!(state.player.rotation, 1.25);
        assert!(state.player.rotation.is_finite());
    }

    #[test]
    fn test_fire_cadence_over_one_second() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.weapon.fire_rate_ms = 280.0;
        state.player.weapon.ammo = 100;
        state.player.weapon.max_ammo = 100;

        let input = InputState {
            shooting: true,
            aim: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT / 2.0),
            ..Default::default()
        };
        let steps = (1000.0 / STEP_MS).floor() as usize;
        for _ in 0..steps {
            tick(&mut state, &input, STEP_MS, &mut rng);
        }

        // First shot fires immediately, then one per 280 ms elapsed
        let expected = (1000.0_f32 / 280.0).floor() as u32 + 1;
        assert_eq!(100 - state.player.weapon.ammo, expected);
        assert_eq!(state.bullets.len(), expected as usize);
    }

    #[test]
    fn test_no_fire_within_cooldown_or_without_ammo() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;

        let input = InputState {
            shooting: true,
            ..Default::default()
        };
        // Two trigger pulls 16 ms apart against a 400 ms pistol: one bullet
        tick(&mut state, &input, STEP_MS, &mut rng);
        tick(&mut state, &input, STEP_MS, &mut rng);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.player.weapon.ammo, state.player.weapon.max_ammo - 1);

        // Empty magazine fires nothing
        state.bullets.clear();
        state.player.weapon.ammo = 0;
        state.player.last_shot_at = None;
        tick(&mut state, &input, STEP_MS, &mut rng);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shotgun_emits_pellets_for_one_ammo() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.weapon = WeaponKind::Shotgun.template();

        let input = InputState {
            shooting: true,
            ..Default::default()
        };
        tick(&mut state, &input, STEP_MS, &mut rng);

        let pellets = WeaponKind::Shotgun.template().pellet_count as usize;
        assert_eq!(state.bullets.len(), pellets);
        assert_eq!(state.player.weapon.ammo, state.player.weapon.max_ammo - 1);
    }

    #[test]
    fn test_player_bullet_kill_credits_and_counts() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        let enemy_pos = Vec2::new(500.0, 1500.0);
        let eid = spawn_test_enemy(&mut state, enemy_pos, Archetype::Fast);
        state.enemies[0].health = 1.0;

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: enemy_pos,
            vel: Vec2::ZERO,
            damage: 15.0,
            owner: PLAYER_ID,
            from_player: true,
            target: None,
            spent: false,
        });

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        let enemy = state.enemies.iter().find(|e| e.id == eid).unwrap();
        assert!(!enemy.alive);
        assert_eq!(enemy.health, 0.0);
        assert_eq!(state.player.kills, 1);
        assert_eq!(state.players_alive, 1);
        assert_eq!(state.kill_feed[0].killer, "You");
        assert_eq!(state.kill_feed[0].victim, "Enemy fast");
        assert_eq!(state.kill_feed[0].weapon, "Pistol");
        // Last one standing
        assert!(state.game_over && state.victory);
    }

    #[test]
    fn test_spent_bullet_hits_only_once() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        let pos = Vec2::new(400.0, 400.0);
        // Two overlapping enemies, one bullet: only the first takes damage
        spawn_test_enemy(&mut state, pos, Archetype::Tank);
        spawn_test_enemy(&mut state, pos + Vec2::new(1.0, 0.0), Archetype::Tank);
        // On cooldown so they don't shoot each other mid-test
        for enemy in &mut state.enemies {
            enemy.last_shot_at = Some(0.0);
        }

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            damage: 10.0,
            owner: PLAYER_ID,
            from_player: true,
            target: None,
            spent: false,
        });

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        let damaged: Vec<_> = state
            .enemies
            .iter()
            .filter(|e| e.health < e.max_health)
            .collect();
        assert_eq!(damaged.len(), 1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shield_absorbs_before_health() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.shield = 20.0;

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: state.player.pos,
            vel: Vec2::ZERO,
            damage: 30.0,
            owner: 999,
            from_player: false,
            target: Some(PLAYER_ID),
            spent: false,
        });

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        assert_eq!(state.player.shield, 0.0);
        assert!((state.player.health - 90.0).abs() < 1e-3);
        assert!(state.player.alive);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_friendly_fire_credits_shooter_archetype() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        let shooter = spawn_test_enemy(&mut state, Vec2::new(200.0, 200.0), Archetype::Tank);
        let victim_pos = Vec2::new(1800.0, 1800.0);
        spawn_test_enemy(&mut state, victim_pos, Archetype::Fast);
        state.enemies[1].health = 1.0;

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: victim_pos,
            vel: Vec2::ZERO,
            damage: 20.0,
            owner: shooter,
            from_player: false,
            target: None,
            spent: false,
        });

        // Keep the player clear of the bullet's path
        state.player.pos = Vec2::new(1000.0, 200.0);
        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        assert_eq!(state.kill_feed[0].killer, "Enemy tank");
        assert_eq!(state.kill_feed[0].victim, "Enemy fast");
        assert_eq!(state.kill_feed[0].weapon, "Cannon");
        assert_eq!(state.player.kills, 0);
    }

    #[test]
    fn test_weapon_pickup_replaces_ammo_entirely() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.weapon.ammo = 3;

        let sniper = WeaponKind::Sniper.template();
        let id = state.next_entity_id();
        state.loot.push(LootItem {
            id,
            pos: state.player.pos,
            kind: LootKind::Weapon(sniper.clone()),
            rarity: sniper.rarity,
        });

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        assert_eq!(state.player.weapon.kind, WeaponKind::Sniper);
        assert_eq!(state.player.weapon.ammo, sniper.max_ammo);
        assert!(state.loot.is_empty());
    }

    #[test]
    fn test_ammo_and_shield_pickups_cap_at_max() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        state.player.weapon.ammo = state.player.weapon.max_ammo - 5;
        state.player.shield = 90.0;

        for kind in [LootKind::Ammo(30), LootKind::Shield(50.0)] {
            let id = state.next_entity_id();
            state.loot.push(LootItem {
                id,
                pos: state.player.pos,
                kind,
                rarity: Rarity::Common,
            });
        }

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        assert_eq!(state.player.weapon.ammo, state.player.weapon.max_ammo);
        assert_eq!(state.player.shield, state.player.max_shield);
    }

    #[test]
    fn test_out_of_bounds_bullet_removed() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: Vec2::new(WORLD_WIDTH - 1.0, 1000.0),
            vel: Vec2::new(500.0, 0.0),
            damage: 10.0,
            owner: PLAYER_ID,
            from_player: true,
            target: None,
            spent: false,
        });

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_enemy_fires_at_player_in_range() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        let pos = state.player.pos + Vec2::new(200.0, 0.0);
        let eid = spawn_test_enemy(&mut state, pos, Archetype::Normal);

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        let shot = state.bullets.iter().find(|b| b.owner == eid).unwrap();
        assert!(!shot.from_player);
        assert_eq!(shot.target, Some(PLAYER_ID));
        assert_eq!(shot.damage, Archetype::Normal.stats().bullet_damage);
    }

    #[test]
    fn test_enemy_wanders_at_half_speed_without_target() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.player.alive = false;
        state.players_alive = 1;
        spawn_test_enemy(&mut state, Vec2::new(300.0, 300.0), Archetype::Fast);

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        let enemy = &state.enemies[0];
        assert!(enemy.wander_target.is_some());
        let speed = enemy.vel.length();
        assert!((speed - Archetype::Fast.stats().speed * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_dead_enemies_are_inert() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        let pos = Vec2::new(700.0, 700.0);
        spawn_test_enemy(&mut state, pos, Archetype::Normal);
        state.enemies[0].alive = false;
        state.players_alive -= 1;

        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos,
            vel: Vec2::ZERO,
            damage: 50.0,
            owner: PLAYER_ID,
            from_player: true,
            target: None,
            spent: false,
        });
        state.players_alive = 2; // keep the match running

        tick(&mut state, &InputState::default(), STEP_MS, &mut rng);

        // The corpse neither blocks the bullet nor moves
        assert_eq!(state.enemies[0].pos, pos);
        assert_eq!(state.enemies[0].health, Archetype::Normal.stats().max_health);
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_zone_attrition_kills_player_at_exactly_zero() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        // Park the zone far away so the player is always outside it
        state.safe_zone.center = Vec2::new(100.0, 100.0);
        state.safe_zone.current_radius = 50.0;
        state.safe_zone.target_radius = 50.0;
        state.player.health = 10.0;

        let mut prev = state.player.health;
        for _ in 0..200_000 {
            tick(&mut state, &InputState::default(), STEP_MS, &mut rng);
            if state.game_over {
                break;
            }
            assert!(state.player.health < prev);
            assert!(state.player.health >= 0.0);
            prev = state.player.health;
        }

        assert!(!state.player.alive);
        assert_eq!(state.player.health, 0.0);
        assert!(state.game_over && !state.victory);
    }

    #[test]
    fn test_zone_shrinks_monotonically_to_minimum() {
        let mut rng = test_rng();
        let mut state = GameState::new();
        state.players_alive = 2;
        // Effectively immortal so the match outlasts every shrink
        state.player.health = f32::MAX;
        state.player.max_health = f32::MAX;

        let mut prev = state.safe_zone.current_radius;
        for _ in 0..6_000 {
            tick(&mut state, &InputState::default(), 100.0, &mut rng);
            let r = state.safe_zone.current_radius;
            assert!(r <= prev);
            assert!(r >= MIN_ZONE_RADIUS);
            prev = r;
        }
        assert_eq!(state.safe_zone.current_radius, MIN_ZONE_RADIUS);
    }

    #[test]
    fn test_engine_is_deterministic() {
        let inputs: Vec<InputState> = (0..300)
            .map(|i| InputState {
                up: i % 3 == 0,
                left: i % 5 == 0,
                right: i % 7 == 0,
                down: i % 11 == 0,
                aim: Vec2::new((i * 13 % 2000) as f32, (i * 17 % 2000) as f32),
                shooting: i % 2 == 0,
            })
            .collect();

        let mut a = Engine::new(424242);
        let mut b = Engine::new(424242);
        for input in &inputs {
            a.update(STEP_MS, input);
            b.update(STEP_MS, input);
        }
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_engine_reset_restores_fresh_match() {
        let mut engine = Engine::new(7);
        let fresh = engine.snapshot();
        let input = InputState {
            shooting: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..120 {
            engine.update(STEP_MS, &input);
        }
        assert_ne!(engine.state(), &fresh);

        engine.reset();
        assert_eq!(engine.state(), &fresh);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Invariants from the data model hold under arbitrary input streams:
        /// bounded health/shield/ammo, bounded feed, monotone zone radius,
        /// and alive-count accounting.
        #[test]
        fn prop_invariants_hold_under_random_input(
            seed in any::<u64>(),
            steps in 1usize..150,
            dts in proptest::collection::vec(1.0f32..120.0, 150),
            moves in proptest::collection::vec(any::<(bool, bool, bool, bool, bool)>(), 150),
            aims in proptest::collection::vec((0.0f32..2000.0, 0.0f32..2000.0), 150),
        ) {
            let mut engine = Engine::new(seed);
            let mut prev_radius = engine.state().safe_zone.current_radius;

            for i in 0..steps {
                let (up, down, left, right, shooting) = moves[i];
                let input = InputState {
                    up, down, left, right, shooting,
                    aim: Vec2::new(aims[i].0, aims[i].1),
                };
                let state = engine.update(dts[i], &input);

                prop_assert!(state.player.health >= 0.0);
                prop_assert!(state.player.health <= state.player.max_health);
                prop_assert!(state.player.shield >= 0.0);
                prop_assert!(state.player.shield <= state.player.max_shield);
                prop_assert!(state.player.weapon.ammo <= state.player.weapon.max_ammo);
                for enemy in &state.enemies {
                    prop_assert!(enemy.health >= 0.0);
                    prop_assert!(enemy.health <= enemy.max_health);
                }

                prop_assert!(state.kill_feed.len() <= KILL_FEED_MAX);

                let r = state.safe_zone.current_radius;
                prop_assert!(r <= prev_radius);
                prop_assert!(r >= MIN_ZONE_RADIUS);
                prev_radius = r;

                let expected_alive =
                    state.living_enemies().count() as u32 + u32::from(state.player.alive);
                prop_assert_eq!(state.players_alive, expected_alive);
            }
        }
    }
}
