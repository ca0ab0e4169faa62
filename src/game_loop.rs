//! Fixed-timestep scheduler and frame driver
//!
//! Wall-clock time is drained into whole 1/60 s ticks; the draw list is
//! built once per real frame no matter how many ticks ran.

use std::time::{Duration, Instant};

use crate::assets::SpriteSet;
use crate::consts::{SIM_DT, TICK_RATE};
use crate::platform::{InputSnapshot, Presentation};
use crate::renderer::DrawList;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, TickInput, tick};

const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Converts elapsed wall-clock time into a whole number of simulation ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick: Duration,
    accumulator: Duration,
    max_ticks_per_frame: Option<u32>,
}

impl FixedTimestep {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            tick: Duration::from_nanos(1_000_000_000 / u64::from(tick_rate.max(1))),
            accumulator: Duration::ZERO,
            max_ticks_per_frame: None,
        }
    }

    /// Bound catch-up work per frame; excess backlog is discarded
    pub fn with_max_ticks(mut self, max_ticks_per_frame: Option<u32>) -> Self {
        self.max_ticks_per_frame = max_ticks_per_frame.map(|max| max.max(1));
        self
    }

    pub fn tick_duration(&self) -> Duration {
        self.tick
    }

    /// Pending time in tick units (always below 1 after [`Self::advance`])
    pub fn delta(&self) -> f64 {
        self.accumulator.as_secs_f64() / self.tick.as_secs_f64()
    }

    /// Add elapsed time and return how many ticks to run now
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator = self.accumulator.saturating_add(elapsed);

        let mut ticks = 0;
        while self.accumulator >= self.tick {
            if self.max_ticks_per_frame.is_some_and(|max| ticks >= max) {
                log::warn!(
                    "Simulation fell behind, dropping {:?} backlog after {} ticks",
                    self.accumulator,
                    ticks
                );
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.tick;
            ticks += 1;
        }
        ticks
    }
}

/// Updates and frames counted over one-second windows
#[derive(Debug, Default)]
struct RateCounter {
    window: Duration,
    updates: u32,
    frames: u32,
    ups: u32,
    fps: u32,
}

impl RateCounter {
    /// Returns true when a window has just closed
    fn record(&mut self, elapsed: Duration, ticks: u32) -> bool {
        self.window += elapsed;
        self.updates += ticks;
        self.frames += 1;

        if self.window < STATS_WINDOW {
            return false;
        }
        self.window -= STATS_WINDOW;
        self.ups = self.updates;
        self.fps = self.frames;
        self.updates = 0;
        self.frames = 0;
        true
    }
}

/// Result of one real frame
#[derive(Debug)]
pub struct FrameOutput {
    pub ticks: u32,
    pub draw_list: DrawList,
}

/// Owns the world and drives it from presentation input
pub struct GameLoop {
    pub state: GameState,
    timestep: FixedTimestep,
    cursor_captured: bool,
    close_requested: bool,
    show_fps: bool,
    stats: RateCounter,
}

impl GameLoop {
    pub fn new(settings: &Settings, sprites: SpriteSet) -> Self {
        let state = GameState::with_view(
            sprites,
            settings.world_size(),
            settings.zoom_factor,
            settings.view_rect(),
            settings.resolved_seed(),
        );

        Self {
            state,
            timestep: FixedTimestep::new(TICK_RATE).with_max_ticks(settings.max_ticks_per_frame),
            cursor_captured: true,
            close_requested: false,
            show_fps: settings.show_fps,
            stats: RateCounter::default(),
        }
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    /// Apply one frame of input, run the due ticks and build the draw list
    pub fn frame(&mut self, input: &InputSnapshot, elapsed: Duration) -> FrameOutput {
        if input.close_requested {
            log::info!("Close requested");
            self.close_requested = true;
        }

        if let Some(size) = input.resize {
            self.state.resize(size.width as f32, size.height as f32);
        }

        if input.cursor_capture_toggle {
            self.cursor_captured = !self.cursor_captured;
            if self.cursor_captured {
                self.state.resume();
            } else {
                self.state.pause();
            }
            log::info!("Cursor captured: {}", self.cursor_captured);
        }

        if input.pause_toggle {
            self.state.toggle_pause();
            log::info!("Paused: {}", self.state.phase == GamePhase::Paused);
        }

        let live = self.cursor_captured;
        let base = TickInput {
            move_forward: live && input.move_forward,
            turn_left: live && input.turn_left,
            turn_right: live && input.turn_right,
            fire: live && input.fire,
            restart: live && input.fire,
        };

        let ticks = self.timestep.advance(elapsed);
        for i in 0..ticks {
            let tick_input = TickInput {
                restart: base.restart && i == 0,
                ..base
            };
            tick(&mut self.state, &tick_input, SIM_DT);
        }

        if self.stats.record(elapsed, ticks) {
            if self.show_fps {
                log::info!("{} UPS, {} FPS", self.stats.ups, self.stats.fps);
            } else {
                log::debug!("{} UPS, {} FPS", self.stats.ups, self.stats.fps);
            }
        }

        let (ups, fps) = if self.show_fps {
            (self.stats.ups, self.stats.fps)
        } else {
            (0, 0)
        };

        FrameOutput {
            ticks,
            draw_list: DrawList::build(&self.state, ups, fps),
        }
    }

    /// Drive `presenter` until it requests close
    pub fn run<P: Presentation>(&mut self, presenter: &mut P) {
        log::info!("Entering main loop at {} ticks per second", TICK_RATE);

        let mut last = Instant::now();
        while !self.close_requested {
            let input = presenter.poll_input();
            let now = Instant::now();
            let elapsed = now.duration_since(last);
            last = now;

            let output = self.frame(&input, elapsed);
            if self.close_requested {
                break;
            }
            presenter.present(&output.draw_list);
        }

        log::info!(
            "Main loop finished after {} ticks, score {}",
            self.state.time_ticks,
            self.state.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::test_support;
    use crate::platform::{HeadlessPresenter, ResizeEvent};
    use proptest::prelude::*;

    fn game_loop() -> GameLoop {
        let settings = Settings {
            seed: Some(11),
            ..Default::default()
        };
        GameLoop::new(&settings, test_support::sprite_set())
    }

    #[test]
    fn test_partial_ticks_carry_over() {
        let mut timestep = FixedTimestep::new(TICK_RATE);
        let tick = timestep.tick_duration();
        assert_eq!(timestep.advance(tick / 2), 0);
        assert!((timestep.delta() - 0.5).abs() < 1e-6);
        assert_eq!(timestep.advance(tick / 2), 1);
        assert_eq!(timestep.advance(tick * 3 + tick / 4), 3);
    }

    #[test]
    fn test_tick_cap_drops_backlog() {
        let mut timestep = FixedTimestep::new(TICK_RATE).with_max_ticks(Some(5));
        assert_eq!(timestep.advance(Duration::from_secs(2)), 5);
        assert_eq!(timestep.delta(), 0.0);
    }

    #[test]
    fn test_uncapped_catch_up_runs_every_tick() {
        let mut timestep = FixedTimestep::new(TICK_RATE);
        let tick = timestep.tick_duration();
        assert_eq!(timestep.advance(tick * 600), 600);
    }

    #[test]
    fn test_releasing_cursor_pauses_and_blocks_controls() {
        let mut game = game_loop();
        let tick = game.timestep().tick_duration();

        let release = InputSnapshot {
            cursor_capture_toggle: true,
            fire: true,
            ..Default::default()
        };
        let out = game.frame(&release, tick);
        assert_eq!(out.ticks, 1);
        assert!(!game.cursor_captured());
        assert!(out.draw_list.hud.paused);
        assert_eq!(game.state.time_ticks, 0);
        assert_eq!(game.state.projectile_count(), 0);

        let capture = InputSnapshot {
            cursor_capture_toggle: true,
            ..Default::default()
        };
        game.frame(&capture, tick);
        assert!(game.cursor_captured());
        assert_eq!(game.state.phase, GamePhase::Running);
        assert_eq!(game.state.time_ticks, 1);
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut game = game_loop();
        game.state.lives = 0;
        game.state.phase = GamePhase::GameOver;
        let tick = game.timestep().tick_duration();

        let out = game.frame(&InputSnapshot::default(), tick);
        assert!(out.draw_list.hud.game_over);

        let fire = InputSnapshot {
            fire: true,
            ..Default::default()
        };
        let out = game.frame(&fire, tick * 3);
        assert!(!out.draw_list.hud.game_over);
        assert_eq!(game.state.lives, crate::consts::STARTING_LIVES);
    }

    #[test]
    fn test_resize_updates_view() {
        let mut game = game_loop();
        let input = InputSnapshot {
            resize: Some(ResizeEvent {
                width: 1600,
                height: 800,
            }),
            ..Default::default()
        };
        game.frame(&input, Duration::ZERO);
        assert_eq!(game.state.view.width, 3200.0);
        assert_eq!(game.state.view.height, 1600.0);
    }

    #[test]
    fn test_stats_window_reports_rates() {
        let mut game = game_loop();
        // 120 frames adding up to just over one second
        let frame = Duration::from_nanos(8_333_334);
        let mut last = None;
        for _ in 0..120 {
            last = Some(game.frame(&InputSnapshot::default(), frame));
        }
        let hud = last.map(|out| out.draw_list.hud).unwrap_or_default();
        assert_eq!(hud.fps, 120);
        assert_eq!(hud.ups, 60);
    }

    #[test]
    fn test_run_until_presenter_closes() {
        let mut game = game_loop();
        let mut presenter = HeadlessPresenter::new(5, |_| InputSnapshot::default());
        game.run(&mut presenter);
        assert!(game.close_requested());
        assert_eq!(presenter.frames(), 5);
        assert!(presenter.last_hud().is_some());
        assert!(presenter.commands_presented() >= 5);
    }

    proptest! {
        #[test]
        fn prop_k_tick_durations_yield_k_ticks(
            k in 0u32..2000,
            splits in prop::collection::vec(0u32..1000, 0..8),
        ) {
            let mut timestep = FixedTimestep::new(TICK_RATE);
            let total = timestep.tick_duration() * k;

            // Feed the same total in arbitrary frame-sized pieces
            let mut cuts: Vec<Duration> = splits
                .iter()
                .map(|s| total.mul_f64(f64::from(*s) / 1000.0))
                .collect();
            cuts.push(Duration::ZERO);
            cuts.push(total);
            cuts.sort();

            let ticks: u32 = cuts
                .windows(2)
                .map(|w| timestep.advance(w[1] - w[0]))
                .sum();
            prop_assert_eq!(ticks, k);
        }
    }
}
