//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one step: player, spawns, mobs,
//! collisions, projectiles, then screen wrap. Destroyed entities leave the
//! arena within the tick that destroys them.

use glam::Vec2;

use super::collision::collides;
use super::entity::{Body, Entity, EntityId, EntityKind};
use super::projectile::Projectile;
use super::ship::ShipControls;
use super::spawn::fragment;
use super::state::{GamePhase, GameState};
use super::wrap::{apply_wrap, assign_bounds};
use crate::consts::SCORE_PER_KILL;
use crate::{degrees_from_heading, heading_from_degrees};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub move_forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
    /// Start a new session (only honoured after game over)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::GameOver => {
            if input.restart {
                log::info!("Restarting after game over (score {})", state.score);
                state.setup();
            }
            return;
        }
        GamePhase::Paused => return,
        GamePhase::Running => {}
    }

    state.time_ticks += 1;
    state.update_grace(dt);

    update_player(state, input, dt);

    for kind in state.spawn_timers.advance() {
        state.spawn(kind);
    }

    update_mobs(state, dt);

    let mut fragments = Vec::new();
    let game_over = player_mob_collisions(state, &mut fragments) || update_projectiles(state, &mut fragments, dt);

    for child in fragments {
        state.entities.insert(child);
    }
    if game_over {
        return;
    }

    let view = state.view;
    for entity in state.entities.values_mut() {
        apply_wrap(&mut entity.body, Some(&view));
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let controls = ShipControls {
        thrust: input.move_forward,
        turn_left: input.turn_left,
        turn_right: input.turn_right,
    };

    let Some(Entity {
        body,
        kind: EntityKind::Player(player),
    }) = state.entities.get_mut(state.player)
    else {
        log::warn!("Player entity missing, skipping player update");
        return;
    };

    // Fire from the pose held at the start of the tick, then move
    let launch = player.try_fire(input.fire).then(|| {
        let mut shot_body = Body::new(state.sprites.missile.clone(), body.pos);
        shot_body.rotation = body.rotation;
        shot_body.bounds_assigned = body.bounds_assigned;
        let shot = Projectile::new(heading_from_degrees(body.rotation), player.projectile_speed, false);
        (shot_body, shot)
    });
    player.step(body, controls, dt, &state.sprites);

    let Some((shot_body, mut shot)) = launch else {
        return;
    };

    let mobs = state
        .entities
        .iter()
        .filter(|(_, e)| e.is_mob())
        .map(|(id, e)| (id, e.body.pos));
    shot.acquire_target(&shot_body, mobs, Some(&state.view));

    state.entities.insert(Entity::new(shot_body, EntityKind::Projectile(shot)));
}

fn update_mobs(state: &mut GameState, dt: f32) {
    let player_pos = state.player_pos();
    let view = state.view;
    let mut lasers = Vec::new();

    for entity in state.entities.values_mut() {
        let Entity { body, kind } = entity;
        match kind {
            EntityKind::Asteroid(_) => body.pos += body.vel * dt,
            EntityKind::EnemyShip(enemy) => {
                if enemy.step(body, dt) {
                    let direction = (player_pos - body.pos).normalize_or(Vec2::NEG_Y);
                    let mut laser_body = Body::new(state.sprites.laser.clone(), body.pos);
                    laser_body.rotation = degrees_from_heading(direction);
                    laser_body.bounds_assigned = body.bounds_assigned;
                    lasers.push((laser_body, Projectile::new(direction, enemy.projectile_speed, true)));
                }
            }
            EntityKind::Player(_) | EntityKind::Projectile(_) => continue,
        }

        if assign_bounds(body, &view) {
            log::debug!("Mob bound to view at {}", body.pos);
        }
    }

    let player = state.player;
    for (body, mut laser) in lasers {
        laser.acquire_target(&body, [(player, player_pos)], Some(&view));
        state.entities.insert(Entity::new(body, EntityKind::Projectile(laser)));
    }
}

/// Destroy the first mob touching the player; returns true on game over
fn player_mob_collisions(state: &mut GameState, fragments: &mut Vec<Entity>) -> bool {
    if state.in_grace() {
        return false;
    }
    let Some(player) = state.entities.get(state.player) else {
        return false;
    };

    let hit = state
        .entities
        .iter()
        .find(|(_, e)| e.is_mob() && collides(&player.body, &e.body))
        .map(|(id, _)| id);
    let Some(mob_id) = hit else {
        return false;
    };

    state.remove_life();
    destroy_mob(state, mob_id, fragments);
    state.phase == GamePhase::GameOver
}

fn destroy_mob(state: &mut GameState, id: EntityId, fragments: &mut Vec<Entity>) {
    if let Some(mob) = state.entities.remove(id) {
        let children = fragment(&mob, &state.sprites, &mut state.rng);
        if !children.is_empty() {
            log::debug!("Asteroid split into {} at {}", children.len(), mob.body.pos);
        }
        fragments.extend(children);
    }
}

/// Move projectiles, cull those off screen and resolve their hits;
/// returns true on game over
fn update_projectiles(state: &mut GameState, fragments: &mut Vec<Entity>, dt: f32) -> bool {
    let view = state.view;
    let ids: Vec<EntityId> = state
        .entities
        .iter()
        .filter(|(_, e)| e.is_projectile())
        .map(|(id, _)| id)
        .collect();

    for id in ids {
        let target_pos = state
            .entities
            .get(id)
            .and_then(Entity::as_projectile)
            .and_then(|p| p.locked_target)
            .and_then(|target| state.entities.get(target))
            .map(|e| e.body.pos);

        let Some(Entity {
            body,
            kind: EntityKind::Projectile(shot),
        }) = state.entities.get_mut(id)
        else {
            continue;
        };
        shot.advance(body, target_pos, Some(&view), dt);
        let targets_player = shot.targets_player;

        if !view.contains_closed(body.pos) {
            state.entities.remove(id);
            continue;
        }

        if targets_player {
            if state.in_grace() {
                continue;
            }
            let hit = match (state.entities.get(id), state.entities.get(state.player)) {
                (Some(shot), Some(player)) => collides(&shot.body, &player.body),
                _ => false,
            };
            if hit {
                state.entities.remove(id);
                state.remove_life();
                if state.phase == GamePhase::GameOver {
                    return true;
                }
            }
        } else {
            let Some(shot) = state.entities.get(id) else {
                continue;
            };
            let hit = state
                .entities
                .iter()
                .find(|(_, e)| e.is_mob() && collides(&shot.body, &e.body))
                .map(|(mob_id, _)| mob_id);
            if let Some(mob_id) = hit {
                state.entities.remove(id);
                state.score += SCORE_PER_KILL;
                destroy_mob(state, mob_id, fragments);
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::test_support;
    use crate::consts::*;
    use crate::sim::entity::{Asteroid, SizeTier};
    use crate::sim::ship::EnemyShip;

    fn empty_state() -> GameState {
        let mut state = GameState::new(
            test_support::sprite_set(),
            Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            ZOOM_FACTOR,
            99,
        );
        let player = state.player;
        state.entities.retain(|id, _| id == player);
        state
    }

    fn add_asteroid(state: &mut GameState, tier: SizeTier, pos: Vec2, vel: Vec2, bound: bool) -> EntityId {
        let mut body = Body::new(Asteroid::sprite(tier, &state.sprites), pos);
        body.vel = vel;
        body.bounds_assigned = bound;
        state
            .entities
            .insert(Entity::new(body, EntityKind::Asteroid(Asteroid::new(tier))))
    }

    fn asteroid_tiers(state: &GameState) -> Vec<SizeTier> {
        state.entities.values().filter_map(|e| e.as_asteroid()).map(|a| a.tier).collect()
    }

    #[test]
    fn test_paused_tick_is_noop() {
        let mut state = GameState::new(
            test_support::sprite_set(),
            Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
            ZOOM_FACTOR,
            3,
        );
        let before: Vec<Vec2> = state.entities.values().map(|e| e.body.pos).collect();
        state.pause();

        let input = TickInput {
            move_forward: true,
            fire: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
        }

        let after: Vec<Vec2> = state.entities.values().map(|e| e.body.pos).collect();
        assert_eq!(before, after);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.projectile_count(), 0);
    }

    #[test]
    fn test_game_over_waits_for_restart() {
        let mut state = empty_state();
        state.lives = 0;
        state.phase = GamePhase::GameOver;
        state.score = 700;

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.mob_count(), 0);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(state.mob_count(), 2 * INITIAL_SPAWN_PAIRS);
    }

    #[test]
    fn test_player_shot_splits_asteroid_and_scores() {
        let mut state = empty_state();
        let target = add_asteroid(&mut state, SizeTier::Large, Vec2::new(400.0, 250.0), Vec2::ZERO, true);

        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT);
        let locked = state
            .entities
            .values()
            .find_map(|e| e.as_projectile())
            .and_then(|p| p.locked_target);
        assert_eq!(locked, Some(target));

        for _ in 0..15 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }

        assert_eq!(state.score, SCORE_PER_KILL);
        assert!(!state.entities.contains_key(target));
        assert_eq!(asteroid_tiers(&state), vec![SizeTier::Medium, SizeTier::Medium]);
        assert_eq!(state.projectile_count(), 0);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_shot_launches_from_pose_before_the_move() {
        let mut state = empty_state();
        let start = state.player_pos();

        let input = TickInput {
            move_forward: true,
            turn_right: true,
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        let Some(shot) = state.entities.values().find(|e| e.as_projectile().is_some()) else {
            panic!("player did not fire");
        };
        // Launched at the start pose, then one tick of its own flight straight up
        let expected = start + Vec2::NEG_Y * PLAYER_PROJECTILE_SPEED * SIM_DT;
        assert!((shot.body.pos - expected).length() < 1e-3, "shot at {}", shot.body.pos);
        assert_eq!(shot.body.rotation, 0.0);

        let player = state.player_body().map(|b| (b.pos, b.rotation));
        let Some((player_pos, player_rotation)) = player else {
            panic!("player missing");
        };
        assert_ne!(player_pos, start);
        assert!(player_rotation > 0.0);
    }

    #[test]
    fn test_player_hit_loses_life_and_starts_grace() {
        let mut state = empty_state();
        add_asteroid(&mut state, SizeTier::Medium, Vec2::new(400.0, 400.0), Vec2::ZERO, true);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(state.in_grace());
        assert_eq!(asteroid_tiers(&state), vec![SizeTier::Small, SizeTier::Small]);

        // Fragments overlap the player but grace protects it
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_last_life_ends_the_game() {
        let mut state = empty_state();
        state.lives = 1;
        add_asteroid(&mut state, SizeTier::Small, Vec2::new(400.0, 400.0), Vec2::ZERO, true);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_enemy_fires_locked_laser_at_player() {
        let mut state = empty_state();
        let mut body = Body::new(state.sprites.enemy_ship.clone(), Vec2::new(400.0, 100.0));
        body.bounds_assigned = true;
        let enemy = EnemyShip {
            time_since_last_fire: ENEMY_FIRE_INTERVAL_SECS,
            ..Default::default()
        };
        state.entities.insert(Entity::new(body, EntityKind::EnemyShip(enemy)));

        tick(&mut state, &TickInput::default(), SIM_DT);
        let laser = state.entities.values().find_map(|e| e.as_projectile());
        let Some(laser) = laser else {
            panic!("enemy did not fire");
        };
        assert!(laser.targets_player);
        assert_eq!(laser.locked_target, Some(state.player));
        assert!((laser.direction - Vec2::Y).length() < 1e-4);
    }

    #[test]
    fn test_enemy_laser_hits_player() {
        let mut state = empty_state();
        let mut body = Body::new(state.sprites.laser.clone(), Vec2::new(400.0, 400.0));
        body.bounds_assigned = true;
        state.entities.insert(Entity::new(
            body,
            EntityKind::Projectile(Projectile::new(Vec2::Y, ENEMY_PROJECTILE_SPEED, true)),
        ));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.projectile_count(), 0);
    }

    #[test]
    fn test_projectile_leaving_view_is_removed() {
        let mut state = empty_state();
        let mut body = Body::new(state.sprites.missile.clone(), Vec2::new(400.0, state.view.top + 5.0));
        body.bounds_assigned = true;
        state.entities.insert(Entity::new(
            body,
            EntityKind::Projectile(Projectile::new(Vec2::NEG_Y, PLAYER_PROJECTILE_SPEED, false)),
        ));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.projectile_count(), 0);
    }

    #[test]
    fn test_incoming_mob_binds_then_wraps() {
        let mut state = empty_state();
        let left = state.view.left;
        let id = add_asteroid(&mut state, SizeTier::Large, Vec2::new(left - 20.0, 0.0), Vec2::new(500.0, 0.0), false);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.entities[id].body.bounds_assigned);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.entities[id].body.bounds_assigned);

        // Reverse it out through the left edge and check it reappears on the right
        state.entities[id].body.vel = Vec2::new(-500.0, 0.0);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let pos = state.entities[id].body.pos;
        assert!(pos.x > state.view.center().x, "expected wrap to the right side, got {pos}");
        assert!(state.entities[id].body.bounds_assigned);
    }

    #[test]
    fn test_same_seed_same_world() {
        let run = || {
            let mut state = GameState::new(
                test_support::sprite_set(),
                Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
                ZOOM_FACTOR,
                2024,
            );
            for i in 0..900u32 {
                let input = TickInput {
                    move_forward: i % 90 < 40,
                    turn_left: i % 200 < 30,
                    fire: i % 3 == 0,
                    ..Default::default()
                };
                tick(&mut state, &input, SIM_DT);
            }
            let positions: Vec<Vec2> = state.entities.values().map(|e| e.body.pos).collect();
            (positions, state.score, state.lives, state.time_ticks)
        };
        assert_eq!(run(), run());
    }
}
