//! Runtime settings
//!
//! Read from an optional JSON file at startup. Gameplay rules are fixed in
//! [`crate::consts`]; only presentation and scheduling knobs live here.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH, ZOOM_FACTOR};
use crate::error::SettingsError;
use crate::sim::{Rect, view_for_window};

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    /// Initial window size in pixels
    pub window_width: u32,
    pub window_height: u32,

    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// View size is `world / zoom_factor`
    pub zoom_factor: f32,

    // === Simulation ===
    /// RNG seed; a clock-derived seed is used when absent
    pub seed: Option<u64>,
    /// Upper bound on catch-up ticks per frame, unbounded when absent
    pub max_ticks_per_frame: Option<u32>,

    // === HUD ===
    /// Show UPS/FPS counters
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,

            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            zoom_factor: ZOOM_FACTOR,

            seed: None,
            max_ticks_per_frame: None,

            show_fps: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does not exist
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.world_width) || !positive(self.world_height) {
            return Err(SettingsError::Invalid(format!(
                "world size must be positive, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if !positive(self.zoom_factor) {
            return Err(SettingsError::Invalid(format!(
                "zoom_factor must be positive, got {}",
                self.zoom_factor
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(SettingsError::Invalid("window size must be non-zero".to_string()));
        }
        if self.max_ticks_per_frame == Some(0) {
            return Err(SettingsError::Invalid("max_ticks_per_frame must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    /// Initial view for the configured window size
    pub fn view_rect(&self) -> Rect {
        view_for_window(
            self.world_size(),
            self.zoom_factor,
            self.window_width as f32,
            self.window_height as f32,
        )
    }

    /// Configured seed, or one derived from the wall clock
    pub fn resolved_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
