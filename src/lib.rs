//! Asteroids - a screen-wrapping arcade shooter
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, collisions, spawning, wrapping)
//! - `assets`: Texture handles and cached opacity masks
//! - `renderer`: Draw list handed to the presentation layer
//! - `platform`: Input snapshot and presentation seam
//! - `game_loop`: Wall-clock to tick scheduling

pub mod assets;
pub mod error;
pub mod game_loop;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AssetError, SettingsError};
pub use game_loop::{FixedTimestep, GameLoop};
pub use settings::Settings;

use glam::Vec2;

/// Game rule constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;

    /// Alpha above which a texel counts as solid for pixel collisions
    pub const ALPHA_THRESHOLD: u8 = 50;

    /// Session defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const SCORE_PER_KILL: u64 = 100;
    pub const GRACE_PERIOD_SECS: f32 = 3.0;
    /// Player blinks at this interval while in grace
    pub const GRACE_FLASH_INTERVAL: f32 = 1.0 / 3.0;
    /// Mobs of each kind spawned when a session starts
    pub const INITIAL_SPAWN_PAIRS: usize = 2;

    /// Spawn policy
    pub const ASTEROID_SPAWN_SECS: f32 = 7.0;
    pub const ENEMY_SHIP_SPAWN_SECS: f32 = 25.0;
    pub const SPAWN_SPEED: f32 = 500.0;
    /// Max deviation from the inward edge normal (degrees)
    pub const SPAWN_DEVIATION_DEG: f32 = 80.0;

    /// Full split cone; children deviate by at most half of it (degrees)
    pub const SPLIT_ANGLE_DEG: f32 = 40.0;

    /// Player tuning
    pub const PLAYER_THRUST: f32 = 300.0;
    pub const PLAYER_THRUST_FACTOR: f32 = 2.6;
    /// Per-tick velocity multiplier while coasting
    pub const PLAYER_DECELERATION: f32 = 0.95;
    /// Drag per second applied while turning
    pub const PLAYER_TURN_DRAG: f32 = 1.7;
    pub const PLAYER_MAX_SPEED: f32 = 10_000.0;
    /// Degrees turned per tick
    pub const PLAYER_TURN_STEP_DEG: f32 = 8.0;
    pub const PLAYER_FIRE_INTERVAL_SECS: f32 = 0.5;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 1000.0;
    /// Burner animation frame durations
    pub const BURNER_FRAME_SECS: f32 = 0.6;
    pub const IDLE_FRAME_SECS: f32 = 0.3;

    /// Enemy ship tuning
    pub const ENEMY_FIRE_INTERVAL_SECS: f32 = 2.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 400.0;

    /// Projectile auto-aim
    pub const AIM_CONE_DEG: f32 = 60.0;
    /// Steering gain toward a locked target (>1 overshoots)
    pub const TRACKING_GAIN: f32 = 1.05;

    /// Reference world size and zoom (the view shows world / zoom)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 800.0;
    pub const ZOOM_FACTOR: f32 = 0.5;
}

/// Unit heading for a sprite rotation in degrees (0 = up, clockwise on a y-down screen)
#[inline]
pub fn heading_from_degrees(rotation: f32) -> Vec2 {
    let rad = (rotation - 90.0).to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Sprite rotation in degrees that faces along `dir`
#[inline]
pub fn degrees_from_heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees() + 90.0
}

/// Rotate a vector by an angle in degrees
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Angle between two vectors in degrees, 0 if either is zero
#[inline]
pub fn angle_between_degrees(a: Vec2, b: Vec2) -> f32 {
    let (a, b) = (a.normalize_or_zero(), b.normalize_or_zero());
    if a == Vec2::ZERO || b == Vec2::ZERO {
        return 0.0;
    }
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_conventions() {
        let up = heading_from_degrees(0.0);
        assert!((up - Vec2::new(0.0, -1.0)).length() < 1e-5);
        let right = heading_from_degrees(90.0);
        assert!((right - Vec2::new(1.0, 0.0)).length() < 1e-5);
        assert!((degrees_from_heading(right) - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_and_angle() {
        let v = rotate_degrees(Vec2::X, 90.0);
        assert!((v - Vec2::Y).length() < 1e-5);
        assert!((angle_between_degrees(Vec2::X, Vec2::Y) - 90.0).abs() < 1e-3);
        assert_eq!(angle_between_degrees(Vec2::ZERO, Vec2::Y), 0.0);
    }
}
