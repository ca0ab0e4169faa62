//! Projectiles and aim-cone target locking
//!
//! A shot locks onto the nearest candidate inside its aiming cone when fired.
//! The cone hangs off the launch heading and never turns with the steering.
//! Each tick the lock is re-validated: a stale handle or a target outside the
//! cone drops the lock and the projectile continues in a straight line.

use glam::Vec2;

use super::entity::{Body, EntityId};
use super::geom::Rect;
use crate::consts::{AIM_CONE_DEG, TRACKING_GAIN};
use crate::angle_between_degrees;

#[derive(Debug, Clone)]
pub struct Projectile {
    /// Fired by an enemy ship; collides with the player only
    pub targets_player: bool,
    /// Unit travel direction
    pub direction: Vec2,
    /// Unit direction at launch; the aiming cone is centred on it
    pub launch_heading: Vec2,
    pub speed: f32,
    pub aim_cone_deg: f32,
    pub tracking_gain: f32,
    /// Non-owning lock, validated against the arena before use
    pub locked_target: Option<EntityId>,
}

impl Projectile {
    pub fn new(direction: Vec2, speed: f32, targets_player: bool) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            targets_player,
            direction,
            launch_heading: direction,
            speed,
            aim_cone_deg: AIM_CONE_DEG,
            tracking_gain: TRACKING_GAIN,
            locked_target: None,
        }
    }

    /// Is `target` visible and inside the cone ahead of the shot?
    ///
    /// Inactive (false) when no view is known or the projectile has no bounds.
    pub fn within_aiming_cone(&self, body: &Body, target: Vec2, view: Option<&Rect>) -> bool {
        let Some(view) = view else {
            return false;
        };
        if !body.bounds_assigned || !view.contains(target) {
            return false;
        }

        let to_target = target - body.pos;
        if to_target.length_squared() == 0.0 || self.launch_heading == Vec2::ZERO {
            return false;
        }

        angle_between_degrees(self.launch_heading, to_target) <= self.aim_cone_deg / 2.0
    }

    /// Lock onto the nearest candidate inside the cone, if any
    pub fn acquire_target(
        &mut self,
        body: &Body,
        candidates: impl IntoIterator<Item = (EntityId, Vec2)>,
        view: Option<&Rect>,
    ) -> Option<EntityId> {
        let mut best: Option<(EntityId, f32)> = None;
        for (id, pos) in candidates {
            if !self.within_aiming_cone(body, pos, view) {
                continue;
            }
            let dist_sq = (pos - body.pos).length_squared();
            if best.is_none_or(|(_, d)| dist_sq < d) {
                best = Some((id, dist_sq));
            }
        }
        self.locked_target = best.map(|(id, _)| id);
        self.locked_target
    }

    /// Steer toward the locked target (if still valid) and move one tick
    ///
    /// Only the travel direction turns; `body.rotation` keeps the launch angle.
    ///
    /// `target_pos` is the resolved position of `locked_target`, or `None`
    /// when the handle no longer refers to a live entity.
    pub fn advance(&mut self, body: &mut Body, target_pos: Option<Vec2>, view: Option<&Rect>, dt: f32) {
        if self.locked_target.is_some() {
            match target_pos {
                Some(target) if self.within_aiming_cone(body, target, view) => {
                    let to_target = (target - body.pos).normalize_or_zero();
                    let steered = self.direction + (to_target - self.direction) * self.tracking_gain;
                    let steered = steered.normalize_or_zero();
                    if steered != Vec2::ZERO {
                        self.direction = steered;
                    }
                }
                _ => self.locked_target = None,
            }
        }

        body.vel = self.direction * self.speed;
        body.pos += body.vel * dt;
    }
}
