//! Characters, the world roster and the shared value types they use.
//!
//! The roster is the only place characters live; skills, targeting and mods
//! refer to characters by [`CharacterId`] and look them up on demand, so a
//! despawned character simply stops resolving.

mod character;
mod common;
mod world;

pub use character::{
    CallForHelp, Character, CollisionChannels, Targetable, is_hostile, planar_unit,
};
pub use common::{CharacterId, ResourceMeter, TeamId, Tick, planar_distance_sq};
pub use world::{World, WorldError};
