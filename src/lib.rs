//! Neon Shmup - simulation core for a side-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ships, projectiles, particles, stages)
//! - `render`: Draw boundary consumed by an external renderer
//! - `audio`: Sound-cue boundary the simulation fires into
//!
//! The crate owns gameplay only. Rendering, audio playback and window/input
//! plumbing live on the far side of the boundary traits.

pub mod audio;
pub mod render;
pub mod sim;

pub use audio::{CuePlayer, CueRecorder, NullCues};
pub use render::{DrawList, DrawTarget, RenderGroup};
pub use sim::{Faction, Game, ModelError, PlayerInput, World};

use glam::Vec2;

/// Session defaults shared by the runner and tests
pub mod consts {
    /// Default world width in world units
    pub const WORLD_WIDTH: f32 = 1366.0;
    /// Default world height in world units
    pub const WORLD_HEIGHT: f32 = 768.0;

    /// Fixed timestep used by the headless runner (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}

/// Left perpendicular of a vector (rotate by +90 degrees)
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}
