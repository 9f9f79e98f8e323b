//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities update in spawn order)
//! - No rendering or platform dependencies; drawing and sound go through
//!   the [`crate::render::DrawTarget`] and [`crate::audio::CuePlayer`] traits

pub mod game;
pub mod geom;
pub mod model;
pub mod particle;
pub mod pilot;
pub mod projectile;
pub mod ship;
pub mod stage;
pub mod starfield;
pub mod world;

pub use game::{Game, PlayerInput};
pub use geom::{Aabb, segment_intersection};
pub use model::{CueSpec, EngineSpec, GunSpec, Model, ModelError, models};
pub use particle::Particle;
pub use pilot::StrafePilot;
pub use projectile::Projectile;
pub use ship::{Faction, Ship, ShipId};
pub use stage::Stage;
pub use starfield::Starfield;
pub use world::World;
