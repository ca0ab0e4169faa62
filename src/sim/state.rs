//! Game state and session lifecycle
//!
//! The world owns every entity in one generational arena. The player lives
//! in the arena too but is created once and only ever reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use slotmap::SlotMap;

use super::entity::{Body, Entity, EntityId, EntityKind, MobKind};
use super::geom::Rect;
use super::ship::Player;
use super::spawn::{SpawnTimers, spawn_mob};
use crate::assets::SpriteSet;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Running,
    Paused,
    GameOver,
}

/// Compute the visible rectangle for a window size
///
/// The view keeps the world's aspect ratio along the narrower axis and is
/// always centred on the world centre.
pub fn view_for_window(world: Vec2, zoom: f32, window_width: f32, window_height: f32) -> Rect {
    let base = world / zoom;
    let size = if window_width <= 0.0 || window_height <= 0.0 {
        base
    } else {
        let window_aspect = window_width / window_height;
        let world_aspect = world.x / world.y;
        if window_aspect > world_aspect {
            Vec2::new(base.y * window_aspect, base.y)
        } else {
            Vec2::new(base.x, base.x / window_aspect)
        }
    };
    Rect::centered(world / 2.0, size)
}

/// Complete simulation state
#[derive(Debug)]
pub struct GameState {
    pub entities: SlotMap<EntityId, Entity>,
    pub player: EntityId,
    /// Current view rectangle, passed explicitly to wrap and aim logic
    pub view: Rect,
    pub world_size: Vec2,
    pub zoom: f32,
    pub sprites: SpriteSet,
    pub score: u64,
    pub lives: u32,
    pub phase: GamePhase,
    /// Seconds into the post-death grace period, `None` when vulnerable
    pub grace_timer: Option<f32>,
    pub spawn_timers: SpawnTimers,
    pub time_ticks: u64,
    pub seed: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create the world with the unscaled view `world / zoom`
    pub fn new(sprites: SpriteSet, world_size: Vec2, zoom: f32, seed: u64) -> Self {
        let view = Rect::centered(world_size / 2.0, world_size / zoom);
        Self::with_view(sprites, world_size, zoom, view, seed)
    }

    /// Create the world, the player and the first wave of mobs
    pub fn with_view(sprites: SpriteSet, world_size: Vec2, zoom: f32, view: Rect, seed: u64) -> Self {
        let mut body = Body::new(sprites.ship.clone(), view.center());
        // The player starts on screen, so it wraps from the first tick
        body.bounds_assigned = true;

        let mut entities = SlotMap::with_key();
        let player = entities.insert(Entity::new(body, EntityKind::Player(Player::default())));

        let mut state = Self {
            entities,
            player,
            view,
            world_size,
            zoom,
            sprites,
            score: 0,
            lives: STARTING_LIVES,
            phase: GamePhase::Running,
            grace_timer: None,
            spawn_timers: SpawnTimers::default(),
            time_ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        state.setup();
        state
    }

    /// Start a fresh session: stats, timers, entities and the initial spawns
    pub fn setup(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.grace_timer = None;
        self.spawn_timers.reset();

        let player = self.player;
        self.entities.retain(|id, _| id == player);
        self.reset_player();

        for _ in 0..INITIAL_SPAWN_PAIRS {
            self.spawn(MobKind::Asteroid);
            self.spawn(MobKind::EnemyShip);
        }
        log::info!("Session started (seed {})", self.seed);
    }

    /// Spawn a mob at a random edge of the current view
    pub fn spawn(&mut self, kind: MobKind) -> EntityId {
        let mob = spawn_mob(kind, &self.view, &self.sprites, &mut self.rng);
        self.entities.insert(mob)
    }

    pub fn player_body(&self) -> Option<&Body> {
        self.entities.get(self.player).map(|e| &e.body)
    }

    pub fn player_pos(&self) -> Vec2 {
        self.player_body().map(|b| b.pos).unwrap_or_else(|| self.view.center())
    }

    fn reset_player(&mut self) {
        let center = self.view.center();
        let Some(entity) = self.entities.get_mut(self.player) else {
            log::warn!("Player entity missing, cannot reset");
            return;
        };
        let Entity { body, kind } = entity;
        if let EntityKind::Player(player) = kind {
            player.reset(body, center);
        }
    }

    pub fn in_grace(&self) -> bool {
        self.grace_timer.is_some()
    }

    /// Lose a life: game over at zero, otherwise reset and start the grace period
    pub fn remove_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Life lost, {} remaining", self.lives);

        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!("Game over - final score {}", self.score);
            return;
        }

        self.reset_player();
        self.grace_timer = Some(0.0);
    }

    /// Advance the grace timer, clearing it once it expires
    pub fn update_grace(&mut self, dt: f32) {
        if let Some(timer) = self.grace_timer.as_mut() {
            *timer += dt;
            if *timer >= GRACE_PERIOD_SECS {
                self.grace_timer = None;
            }
        }
    }

    /// Whether the player sprite is shown this frame (blinks during grace)
    pub fn player_visible(&self) -> bool {
        match self.grace_timer {
            Some(timer) if self.phase != GamePhase::Paused => {
                (timer / GRACE_FLASH_INTERVAL) as u32 % 2 == 0
            }
            _ => true,
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Running,
            GamePhase::GameOver => {}
        }
    }

    /// Recompute the view after the window is resized
    pub fn resize(&mut self, width: f32, height: f32) {
        self.view = view_for_window(self.world_size, self.zoom, width, height);
        log::info!(
            "Resized to {}x{}, view {}x{}",
            width,
            height,
            self.view.width,
            self.view.height
        );
    }

    pub fn mob_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_mob()).count()
    }

    pub fn projectile_count(&self) -> usize {
        self.entities.values().filter(|e| e.is_projectile()).count()
    }
}
