//! Deterministic combat rules shared by the authoritative runtime and tools.
//!
//! `realm-core` defines the skill state machine, the timer queue that drives
//! cooldowns, spatial traces, auto-targeting and the mod broadcast pipeline.
//! Everything here is pure: no I/O, no logging, no wall-clock time. The
//! runtime owns the [`state::World`] and the [`timer::TimerQueue`] and passes
//! them into these APIs explicitly.
pub mod config;
pub mod error;
pub mod mods;
pub mod skill;
pub mod spatial;
pub mod state;
pub mod targeting;
pub mod timer;

pub use config::{CombatConfig, SensingConfig};
pub use error::{ErrorSeverity, GameError};
pub use mods::{
    DamageCauser, DamageDetail, DamageEvent, DamagePhase, DamageType, DispatchReport,
    HandlerFailure, Mod, ModContext, ModCriticality, ModEffect, ModError, ModList,
};
pub use skill::{
    CooldownElapsed, DefinitionError, InterruptReason, Skill, SkillDefinition, SkillEffect,
    SkillError, SkillInterrupted, SkillKey, SkillSet, SkillSetFull, SkillSnapshot, SkillState,
};
pub use spatial::{CONE_TRACE_STEPS, TraceHit, cone_trace, sphere_trace};
pub use state::{
    CallForHelp, Character, CharacterId, CollisionChannels, ResourceMeter, TeamId, Targetable,
    Tick, World, WorldError, is_hostile,
};
pub use targeting::{TargetingController, call_for_help, sense_pawns};
pub use timer::{FiredTimer, TimerHandle, TimerQueue};
