//! Player ship and enemy ship behaviour

use glam::Vec2;

use super::entity::Body;
use crate::assets::SpriteSet;
use crate::consts::*;
use crate::heading_from_degrees;

/// Controls held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipControls {
    pub thrust: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// Player variant: firing cadence, movement tuning and burner animation
#[derive(Debug, Clone)]
pub struct Player {
    pub time_since_last_fire: f32,
    pub fire_interval: f32,
    pub projectile_speed: f32,
    /// Forward acceleration while thrusting (units/s²)
    pub acceleration: f32,
    /// Per-tick velocity multiplier while coasting
    pub deceleration: f32,
    /// Drag per second while turning
    pub drag: f32,
    pub max_speed: f32,
    /// Degrees per tick
    pub turn_step: f32,
    pub thrusting: bool,
    pub turning: bool,
    burner_frame: bool,
    anim_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            // First shot is available immediately
            time_since_last_fire: PLAYER_FIRE_INTERVAL_SECS,
            fire_interval: PLAYER_FIRE_INTERVAL_SECS,
            projectile_speed: PLAYER_PROJECTILE_SPEED,
            acceleration: PLAYER_THRUST * PLAYER_THRUST_FACTOR,
            deceleration: PLAYER_DECELERATION,
            drag: PLAYER_TURN_DRAG,
            max_speed: PLAYER_MAX_SPEED,
            turn_step: PLAYER_TURN_STEP_DEG,
            thrusting: false,
            turning: false,
            burner_frame: false,
            anim_timer: 0.0,
        }
    }
}

impl Player {
    /// Apply controls, integrate motion and advance the burner animation
    pub fn step(&mut self, body: &mut Body, controls: ShipControls, dt: f32, sprites: &SpriteSet) {
        if controls.turn_left {
            body.rotation -= self.turn_step;
        }
        if controls.turn_right {
            body.rotation += self.turn_step;
        }
        self.thrusting = controls.thrust;
        self.turning = controls.turn_left || controls.turn_right;

        if self.thrusting {
            body.vel += heading_from_degrees(body.rotation) * self.acceleration * dt;
        } else {
            body.vel *= self.deceleration;
        }

        if self.turning {
            body.vel *= 1.0 - self.drag * dt;
        }

        let speed = body.vel.length();
        if speed > self.max_speed {
            body.vel = body.vel / speed * self.max_speed;
        }

        body.pos += body.vel * dt;

        self.time_since_last_fire += dt;
        self.animate(body, dt, sprites);
    }

    fn animate(&mut self, body: &mut Body, dt: f32, sprites: &SpriteSet) {
        self.anim_timer += dt;

        if self.thrusting || self.turning {
            let frame_secs = if self.burner_frame {
                BURNER_FRAME_SECS
            } else {
                IDLE_FRAME_SECS
            };
            if self.anim_timer >= frame_secs {
                self.burner_frame = !self.burner_frame;
                self.anim_timer = 0.0;
            }
        } else {
            self.burner_frame = false;
        }

        body.sprite = if self.burner_frame {
            sprites.ship_burner.clone()
        } else {
            sprites.ship.clone()
        };
    }

    pub fn burner_frame(&self) -> bool {
        self.burner_frame
    }

    /// Consume the fire cooldown if a shot is allowed
    pub fn try_fire(&mut self, fire_held: bool) -> bool {
        if fire_held && self.time_since_last_fire >= self.fire_interval {
            self.time_since_last_fire = 0.0;
            true
        } else {
            false
        }
    }

    /// Back to the view centre, at rest, facing up
    pub fn reset(&mut self, body: &mut Body, center: Vec2) {
        body.pos = center;
        body.vel = Vec2::ZERO;
        body.rotation = 0.0;
        self.thrusting = false;
        self.turning = false;
    }
}

/// Enemy ship variant: drifts at spawn velocity and fires at the player
#[derive(Debug, Clone)]
pub struct EnemyShip {
    pub time_since_last_fire: f32,
    pub fire_interval: f32,
    pub projectile_speed: f32,
}

impl Default for EnemyShip {
    fn default() -> Self {
        Self {
            time_since_last_fire: 0.0,
            fire_interval: ENEMY_FIRE_INTERVAL_SECS,
            projectile_speed: ENEMY_PROJECTILE_SPEED,
        }
    }
}

impl EnemyShip {
    /// Move and advance the fire timer; returns true when a shot is due
    pub fn step(&mut self, body: &mut Body, dt: f32) -> bool {
        body.pos += body.vel * dt;

        self.time_since_last_fire += dt;
        if self.time_since_last_fire >= self.fire_interval {
            self.time_since_last_fire = 0.0;
            return true;
        }
        false
    }
}
