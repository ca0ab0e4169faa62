//! Windowless presentation for demos and tests
//!
//! Input comes from a script keyed by frame number; presented frames are
//! summarized rather than drawn.

use std::time::Duration;

use super::{InputSnapshot, Presentation};
use crate::renderer::{DrawList, Hud};

type InputScript = Box<dyn FnMut(u64) -> InputSnapshot>;

pub struct HeadlessPresenter {
    script: InputScript,
    frame: u64,
    frame_limit: u64,
    /// Emulated vsync; frames run back to back when absent
    frame_pacing: Option<Duration>,
    last_hud: Option<Hud>,
    commands_presented: usize,
    ghosts_presented: usize,
}

impl HeadlessPresenter {
    /// Run `frame_limit` frames, then request close
    pub fn new(frame_limit: u64, script: impl FnMut(u64) -> InputSnapshot + 'static) -> Self {
        Self {
            script: Box::new(script),
            frame: 0,
            frame_limit,
            frame_pacing: None,
            last_hud: None,
            commands_presented: 0,
            ghosts_presented: 0,
        }
    }

    /// Sleep for `interval` after each present, standing in for display vsync
    ///
    /// A convenience for the demo binary only. The game loop itself never
    /// blocks; it polls input and drains elapsed time every frame.
    pub fn with_frame_pacing(mut self, interval: Duration) -> Self {
        self.frame_pacing = Some(interval);
        self
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }

    pub fn last_hud(&self) -> Option<&Hud> {
        self.last_hud.as_ref()
    }

    pub fn commands_presented(&self) -> usize {
        self.commands_presented
    }

    pub fn ghosts_presented(&self) -> usize {
        self.ghosts_presented
    }
}

impl Presentation for HeadlessPresenter {
    fn poll_input(&mut self) -> InputSnapshot {
        if self.frame >= self.frame_limit {
            return InputSnapshot {
                close_requested: true,
                ..Default::default()
            };
        }
        (self.script)(self.frame)
    }

    fn present(&mut self, draw_list: &DrawList) {
        self.frame += 1;
        self.commands_presented += draw_list.commands.len();
        self.ghosts_presented += draw_list.commands.iter().filter(|c| c.ghost).count();
        self.last_hud = Some(draw_list.hud.clone());

        if let Some(interval) = self.frame_pacing {
            std::thread::sleep(interval);
        }
    }
}
