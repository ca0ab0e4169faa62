//! Spawn and fragmentation policy
//!
//! Mobs enter from a random view edge, just out of sight, heading inward.
//! Destroyed asteroids above the smallest tier break into two smaller rocks
//! that keep the parent's speed.

use glam::Vec2;
use rand::Rng;

use super::entity::{Asteroid, Body, Entity, EntityKind, MobKind, SizeTier};
use super::geom::Rect;
use super::ship::EnemyShip;
use crate::assets::SpriteSet;
use crate::consts::*;
use crate::rotate_degrees;

/// Whole ticks in `secs` of simulated time
fn ticks_in(secs: f32) -> u32 {
    (secs * TICK_RATE as f32).round() as u32
}

/// Periodic spawn timers, counted in whole ticks so intervals never drift
#[derive(Debug, Clone, Default)]
pub struct SpawnTimers {
    pub asteroid_ticks: u32,
    pub enemy_ship_ticks: u32,
}

impl SpawnTimers {
    /// Advance both timers by one tick; returns the mobs due this tick
    pub fn advance(&mut self) -> Vec<MobKind> {
        let mut due = Vec::new();
        self.asteroid_ticks += 1;
        self.enemy_ship_ticks += 1;

        if self.asteroid_ticks >= ticks_in(ASTEROID_SPAWN_SECS) {
            self.asteroid_ticks = 0;
            due.push(MobKind::Asteroid);
        }
        if self.enemy_ship_ticks >= ticks_in(ENEMY_SHIP_SPAWN_SECS) {
            self.enemy_ship_ticks = 0;
            due.push(MobKind::EnemyShip);
        }
        due
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// View edge a mob enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    /// Unit direction pointing into the view
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Top => Vec2::Y,
            Edge::Right => -Vec2::X,
            Edge::Bottom => -Vec2::Y,
            Edge::Left => Vec2::X,
        }
    }
}

/// Start position just outside `edge` and inward velocity
///
/// `along` in `[0, 1)` selects the point along the edge; `size` is the mob's
/// bounding extent so it starts fully hidden.
pub fn edge_placement(edge: Edge, view: &Rect, size: Vec2, along: f32, deviation_deg: f32) -> (Vec2, Vec2) {
    let x = view.left + along * view.width;
    let y = view.top + along * view.height;

    let pos = match edge {
        Edge::Top => Vec2::new(x, view.top - size.y / 2.0),
        Edge::Right => Vec2::new(view.right() + size.x / 2.0, y),
        Edge::Bottom => Vec2::new(x, view.bottom() + size.y / 2.0),
        Edge::Left => Vec2::new(view.left - size.x / 2.0, y),
    };
    let vel = rotate_degrees(edge.inward() * SPAWN_SPEED, deviation_deg);

    (pos, vel)
}

/// Create a new mob at a random edge; bounds stay unassigned until it is fully visible
pub fn spawn_mob(kind: MobKind, view: &Rect, sprites: &SpriteSet, rng: &mut impl Rng) -> Entity {
    let (sprite, variant) = match kind {
        MobKind::Asteroid => {
            let tier = SizeTier::Large;
            (Asteroid::sprite(tier, sprites), EntityKind::Asteroid(Asteroid::new(tier)))
        }
        MobKind::EnemyShip => (sprites.enemy_ship.clone(), EntityKind::EnemyShip(EnemyShip::default())),
    };

    let mut body = Body::new(sprite, Vec2::ZERO);
    let size = body.global_bounds().size();

    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let along = rng.random_range(0.0..1.0);
    let deviation = rng.random_range(-SPAWN_DEVIATION_DEG..=SPAWN_DEVIATION_DEG);
    let (pos, vel) = edge_placement(edge, view, size, along, deviation);

    body.pos = pos;
    body.vel = vel;
    log::debug!("Spawned {:?} at {:?} edge, pos={} vel={}", kind, edge, pos, vel);

    Entity::new(body, variant)
}

/// Fragments produced when `parent` is destroyed
///
/// Large and medium asteroids yield exactly two children one tier down,
/// anything else yields none. Children start at the parent's position, are
/// already bound (the parent was on screen) and keep its speed with an
/// independent heading deviation in `[-split/2, split/2]`.
pub fn fragment(parent: &Entity, sprites: &SpriteSet, rng: &mut impl Rng) -> Vec<Entity> {
    let Some(asteroid) = parent.as_asteroid() else {
        return Vec::new();
    };
    let Some(tier) = asteroid.tier.smaller() else {
        return Vec::new();
    };

    let speed = parent.body.vel.length();
    let heading = parent.body.vel.y.atan2(parent.body.vel.x);
    let half_cone = asteroid.split_angle / 2.0;

    (0..2)
        .map(|_| {
            let deviation = rng.random_range(-half_cone..=half_cone).to_radians();
            let angle = heading + deviation;

            let mut body = Body::new(Asteroid::sprite(tier, sprites), parent.body.pos);
            body.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            body.bounds_assigned = true;

            Entity::new(body, EntityKind::Asteroid(Asteroid::new(tier)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle_between_degrees;
    use crate::assets::test_support;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const VIEW: Rect = Rect::new(-400.0, -400.0, 1600.0, 1600.0);

    fn asteroid(tier: SizeTier, pos: Vec2, vel: Vec2) -> Entity {
        let sprites = test_support::sprite_set();
        let mut body = Body::new(Asteroid::sprite(tier, &sprites), pos);
        body.vel = vel;
        body.bounds_assigned = true;
        Entity::new(body, EntityKind::Asteroid(Asteroid::new(tier)))
    }

    #[test]
    fn test_timers_fire_at_intervals() {
        let mut timers = SpawnTimers::default();
        let mut asteroids = 0;
        let mut ships = 0;
        // 45 seconds of ticks
        for _ in 0..(45 * TICK_RATE) {
            for kind in timers.advance() {
                match kind {
                    MobKind::Asteroid => asteroids += 1,
                    MobKind::EnemyShip => ships += 1,
                }
            }
        }
        assert_eq!(asteroids, 6);
        assert_eq!(ships, 1);
    }

    #[test]
    fn test_timers_fire_on_exact_ticks() {
        let mut timers = SpawnTimers::default();
        let mut asteroid_ticks = Vec::new();
        let mut ship_ticks = Vec::new();
        for tick in 1..=3000u32 {
            for kind in timers.advance() {
                match kind {
                    MobKind::Asteroid => asteroid_ticks.push(tick),
                    MobKind::EnemyShip => ship_ticks.push(tick),
                }
            }
        }
        assert_eq!(&asteroid_ticks[..3], &[420, 840, 1260]);
        assert_eq!(ship_ticks, vec![1500, 3000]);

        timers.reset();
        assert_eq!(timers.asteroid_ticks, 0);
        assert_eq!(timers.enemy_ship_ticks, 0);
    }

    #[test]
    fn test_large_asteroid_split_example() {
        let sprites = test_support::sprite_set();
        let mut rng = Pcg32::seed_from_u64(7);
        let parent = asteroid(SizeTier::Large, Vec2::new(100.0, 100.0), Vec2::new(50.0, 0.0));

        let children = fragment(&parent, &sprites, &mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.as_asteroid().map(|a| a.tier), Some(SizeTier::Medium));
            assert_eq!(child.body.pos, Vec2::new(100.0, 100.0));
            assert!(child.body.bounds_assigned);
            assert!((child.body.vel.length() - 50.0).abs() < 1e-3);
            assert!(angle_between_degrees(child.body.vel, Vec2::X) <= 20.0 + 1e-3);
            assert_eq!(child.body.sprite.texture.id, sprites.asteroids[1].texture.id);
        }
    }

    #[test]
    fn test_small_asteroid_and_ships_do_not_split() {
        let sprites = test_support::sprite_set();
        let mut rng = Pcg32::seed_from_u64(7);
        let small = asteroid(SizeTier::Small, Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!(fragment(&small, &sprites, &mut rng).is_empty());

        let ship = spawn_mob(MobKind::EnemyShip, &VIEW, &sprites, &mut rng);
        assert!(fragment(&ship, &sprites, &mut rng).is_empty());
    }

    #[test]
    fn test_spawned_mob_is_unbound_and_moving_inward_at_fixed_speed() {
        let sprites = test_support::sprite_set();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let mob = spawn_mob(MobKind::Asteroid, &VIEW, &sprites, &mut rng);
            assert!(!mob.body.bounds_assigned);
            assert!((mob.body.vel.length() - SPAWN_SPEED).abs() < 1e-2);
            assert!(!VIEW.intersects(&mob.body.global_bounds()));
        }
    }

    proptest! {
        #[test]
        fn prop_split_conserves_speed_and_tier(
            tier in 0u8..3, seed in any::<u64>(),
            vx in -800.0f32..800.0, vy in -800.0f32..800.0,
        ) {
            let sprites = test_support::sprite_set();
            let mut rng = Pcg32::seed_from_u64(seed);
            let tier = SizeTier::from_index(tier);
            let parent = asteroid(tier, Vec2::new(10.0, 20.0), Vec2::new(vx, vy));
            let children = fragment(&parent, &sprites, &mut rng);

            match tier.smaller() {
                Some(child_tier) => {
                    prop_assert_eq!(children.len(), 2);
                    for child in &children {
                        prop_assert_eq!(child.as_asteroid().map(|a| a.tier), Some(child_tier));
                        let speed = parent.body.vel.length();
                        prop_assert!((child.body.vel.length() - speed).abs() <= 1e-3 * speed.max(1.0));
                    }
                }
                None => prop_assert!(children.is_empty()),
            }
        }

        #[test]
        fn prop_spawn_starts_outside_its_edge(
            edge in 0usize..4, along in 0.0f32..1.0, dev in -80.0f32..80.0,
        ) {
            let edge = Edge::ALL[edge];
            let size = Vec2::new(40.0, 24.0);
            let (pos, vel) = edge_placement(edge, &VIEW, size, along, dev);
            match edge {
                Edge::Top => prop_assert!(pos.y + size.y / 2.0 <= VIEW.top),
                Edge::Right => prop_assert!(pos.x - size.x / 2.0 >= VIEW.right()),
                Edge::Bottom => prop_assert!(pos.y - size.y / 2.0 >= VIEW.bottom()),
                Edge::Left => prop_assert!(pos.x + size.x / 2.0 <= VIEW.left),
            }
            prop_assert!((vel.length() - SPAWN_SPEED).abs() < 1e-2);
            prop_assert!(vel.dot(edge.inward()) > 0.0);
        }
    }
}
