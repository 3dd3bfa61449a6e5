//! Authoritative runtime for the realm combat core.
//!
//! This crate wires the pure rules in `realm-core` into a running match:
//! timers fire skill cooldowns and sensing sweeps, commands are validated
//! before they touch state, damage flows through mods and ally alerts, and
//! skill state is replicated to read-only mirrors.
//!
//! Modules are organized by responsibility:
//! - [`simulation`] hosts the authoritative [`Simulation`]
//! - [`commands`] defines player commands and their rejections
//! - [`mods`] provides logged mod dispatch and the stock mods
//! - [`sensing`] schedules periodic pawn sensing
//! - [`replication`] publishes skill snapshots and forwards remote input
pub mod commands;
pub mod config;
pub mod error;
pub mod mods;
pub mod replication;
pub mod sensing;
pub mod simulation;

pub use commands::{Command, CommandError, RemoteCommand};
pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use mods::{FlareOnHit, Lifesteal, ModDispatcher, Thorns};
pub use replication::{CommandForwarder, SkillDelta, SkillMirror, SnapshotPublisher};
pub use sensing::{PawnSensor, SensingSweep};
pub use simulation::{DamageOutcome, Simulation, TimerEvent};
