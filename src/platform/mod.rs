//! Platform abstraction layer
//!
//! The presentation layer owns the window, input devices and drawing. The
//! core sees it only through:
//! - One [`InputSnapshot`] sampled per real frame
//! - One [`DrawList`] submitted per real frame

pub mod headless;

use crate::renderer::DrawList;

pub use headless::HeadlessPresenter;

/// New window size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Input sampled once per real frame
///
/// `pause_toggle`, `cursor_capture_toggle` and `resize` are edge triggers;
/// the movement and fire flags are held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub close_requested: bool,
    pub resize: Option<ResizeEvent>,
    pub pause_toggle: bool,
    pub cursor_capture_toggle: bool,
    pub move_forward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fire: bool,
}

/// Window, input and drawing collaborator driven by [`crate::GameLoop::run`]
pub trait Presentation {
    /// Sample input for the coming frame
    fn poll_input(&mut self) -> InputSnapshot;

    /// Draw the frame
    fn present(&mut self, draw_list: &DrawList);
}
