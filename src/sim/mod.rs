//! Simulation module
//!
//! All gameplay logic lives here:
//! - Stable iteration order (by arena index)
//! - Entities reference each other by `EntityId`, never by pointer
//! - No rendering or platform dependencies beyond the draw contract

pub mod asteroid;
pub mod collision;
pub mod entity;
pub mod handler;
pub mod input;
pub mod orbit;
pub mod player;

pub use entity::{Entity, EntityFlags, EntityId, EntityKind, OrbitData, Payload};
pub use handler::{EntityHandler, FrameDebug, SpawnError};
pub use input::InputState;
pub use orbit::{orbit_start, orbit_update};
pub use player::{PlayerData, PlayerState};
