//! Entity model
//!
//! Every movable object shares a kinematic [`Body`]; variant data lives in
//! [`EntityKind`] and is dispatched by pattern matching.

use glam::{Affine2, Vec2};
use slotmap::new_key_type;

use super::geom::Rect;
use super::projectile::Projectile;
use super::ship::{EnemyShip, Player};
use crate::assets::{Sprite, SpriteSet};
use crate::consts::SPLIT_ANGLE_DEG;

new_key_type! {
    /// Generational handle into the entity arena
    pub struct EntityId;
}

/// Shared kinematic and collision attributes
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Degrees, clockwise, 0 = facing up
    pub rotation: f32,
    pub sprite: Sprite,
    /// Set once the entity has been fully inside the view; enables wrapping
    pub bounds_assigned: bool,
    /// Collision participation
    pub solid: bool,
}

impl Body {
    pub fn new(sprite: Sprite, pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            sprite,
            bounds_assigned: false,
            solid: true,
        }
    }

    /// Sprite centre in local space
    pub fn origin(&self) -> Vec2 {
        let (w, h) = self.sprite.size();
        Vec2::new(w / 2.0, h / 2.0)
    }

    /// Local sprite rectangle `(0, 0, w, h)`
    pub fn local_bounds(&self) -> Rect {
        let (w, h) = self.sprite.size();
        Rect::new(0.0, 0.0, w, h)
    }

    /// Local-to-world transform placing the sprite origin at `pos`
    pub fn transform_at(&self, pos: Vec2) -> Affine2 {
        Affine2::from_angle_translation(self.rotation.to_radians(), pos)
            * Affine2::from_translation(-self.origin())
    }

    pub fn transform(&self) -> Affine2 {
        self.transform_at(self.pos)
    }

    /// World-space axis-aligned bounds of the rotated sprite
    pub fn global_bounds(&self) -> Rect {
        self.local_bounds().transformed(&self.transform())
    }
}

/// Asteroid size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SizeTier {
    Small = 0,
    Medium = 1,
    Large = 2,
}

impl SizeTier {
    /// Clamp an index into the valid tier range
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => SizeTier::Small,
            1 => SizeTier::Medium,
            _ => SizeTier::Large,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Tier of the fragments, `None` for the smallest rock
    pub fn smaller(self) -> Option<Self> {
        match self {
            SizeTier::Large => Some(SizeTier::Medium),
            SizeTier::Medium => Some(SizeTier::Small),
            SizeTier::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub tier: SizeTier,
    /// Full fragmentation cone in degrees
    pub split_angle: f32,
}

impl Asteroid {
    pub fn new(tier: SizeTier) -> Self {
        Self {
            tier,
            split_angle: SPLIT_ANGLE_DEG,
        }
    }

    pub fn sprite(tier: SizeTier, sprites: &SpriteSet) -> Sprite {
        sprites.asteroids[tier.index()].clone()
    }
}

/// Variant data
#[derive(Debug, Clone)]
pub enum EntityKind {
    Player(Player),
    Asteroid(Asteroid),
    EnemyShip(EnemyShip),
    Projectile(Projectile),
}

/// Mob kinds created by the spawn policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobKind {
    Asteroid,
    EnemyShip,
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(body: Body, kind: EntityKind) -> Self {
        Self { body, kind }
    }

    /// Asteroids and enemy ships
    pub fn is_mob(&self) -> bool {
        matches!(self.kind, EntityKind::Asteroid(_) | EntityKind::EnemyShip(_))
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile(_))
    }

    pub fn as_asteroid(&self) -> Option<&Asteroid> {
        match &self.kind {
            EntityKind::Asteroid(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }
}
