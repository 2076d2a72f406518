//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, storage or platform dependencies

pub mod body;
pub mod collision;
pub mod difficulty;
pub mod entities;
pub mod geom;
pub mod ground;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use body::Player;
pub use difficulty::{RampStep, RunState, Tint};
pub use entities::{Decoration, Obstacle, ScrollingSet, Sprite};
pub use geom::Aabb;
pub use ground::GroundStrip;
pub use snapshot::RenderSnapshot;
pub use state::{GameEvent, GamePhase, GameState, World};
pub use tick::{InputEvent, TickInput, apply_input, tick};
