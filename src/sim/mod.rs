//! Simulation module
//!
//! All gameplay logic lives here. It is kept free of rendering and platform
//! concerns:
//! - Fixed timestep only
//! - Seeded RNG only
//! - View bounds passed in explicitly, never shared by reference

pub mod collision;
pub mod entity;
pub mod geom;
pub mod projectile;
pub mod ship;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod wrap;

pub use collision::{bounding_box_collision, collides};
pub use entity::{Asteroid, Body, Entity, EntityId, EntityKind, MobKind, SizeTier};
pub use geom::{IntRect, Rect};
pub use projectile::Projectile;
pub use ship::{EnemyShip, Player, ShipControls};
pub use spawn::{Edge, SpawnTimers, edge_placement, fragment, spawn_mob};
pub use state::{GamePhase, GameState, view_for_window};
pub use tick::{TickInput, tick};
pub use wrap::{apply_wrap, assign_bounds, ghost_positions, is_fully_inside};
