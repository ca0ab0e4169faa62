//! Per-frame draw submission
//!
//! Built once per real frame after the frame's ticks have run. Entities are
//! emitted player first, then projectiles, then mobs; each is followed by
//! its wrap ghosts.

use glam::Affine2;

use super::vertex::SpriteInstance;
use crate::assets::TextureHandle;
use crate::sim::{Body, GamePhase, GameState, IntRect, ghost_positions};

/// One sprite to draw
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub texture: TextureHandle,
    pub transform: Affine2,
    pub sub_rect: IntRect,
    /// Wrap-seam copy rather than the entity's own position
    pub ghost: bool,
}

/// Scalars for the presentation layer's overlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Updates and frames over the last full second
    pub ups: u32,
    pub fps: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub hud: Hud,
}

impl DrawList {
    pub fn build(state: &GameState, ups: u32, fps: u32) -> Self {
        let mut list = Self {
            commands: Vec::with_capacity(state.entities.len()),
            hud: Hud {
                score: state.score,
                lives: state.lives,
                paused: state.phase == GamePhase::Paused,
                game_over: state.phase == GamePhase::GameOver,
                ups,
                fps,
            },
        };

        if state.player_visible() {
            if let Some(body) = state.player_body() {
                list.push_body(body, state);
            }
        }
        for entity in state.entities.values().filter(|e| e.is_projectile()) {
            list.push_body(&entity.body, state);
        }
        for entity in state.entities.values().filter(|e| e.is_mob()) {
            list.push_body(&entity.body, state);
        }

        list
    }

    fn push_body(&mut self, body: &Body, state: &GameState) {
        let command = |transform, ghost| DrawCommand {
            texture: body.sprite.texture.clone(),
            transform,
            sub_rect: body.sprite.sub_rect,
            ghost,
        };

        self.commands.push(command(body.transform(), false));
        for pos in ghost_positions(body, Some(&state.view)) {
            self.commands.push(command(body.transform_at(pos), true));
        }
    }

    /// Flatten into GPU-ready instance records
    pub fn instances(&self) -> Vec<SpriteInstance> {
        self.commands.iter().map(SpriteInstance::from_command).collect()
    }
}
