//! Skill state machine, definitions and upgrade policy.
//!
//! A [`Skill`] moves through [`SkillState`]s driven by activation requests,
//! cooldown timers armed on a [`crate::timer::TimerQueue`], interrupts and
//! administrative overrides. Static tuning lives in [`SkillDefinition`];
//! a character's skills are held in order by a [`SkillSet`].

mod definition;
mod error;
mod machine;
mod set;
mod state;

pub use definition::{SkillDefinition, SkillEffect};
pub use error::{DefinitionError, SkillError};
pub use machine::{CooldownElapsed, Skill, SkillKey, SkillSnapshot};
pub use set::{SkillSet, SkillSetFull};
pub use state::{InterruptReason, SkillInterrupted, SkillState};
