//! Draw data for the presentation layer
//!
//! No GPU code lives here; the core only describes what to draw.

pub mod draw_list;
pub mod vertex;

pub use draw_list::{DrawCommand, DrawList, Hud};
pub use vertex::SpriteInstance;
