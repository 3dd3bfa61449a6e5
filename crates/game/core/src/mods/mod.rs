//! Passive modifiers ("mods") attached to characters.
//!
//! Mods observe damage taken and dealt by their holder. They react by
//! pushing [`ModEffect`]s into the dispatch context; the owning simulation
//! applies those after the broadcast, so a mod never mutates the list it is
//! being dispatched from.
//!
//! # Ordering
//!
//! Attachment order is dispatch order. See [`dispatch`] for the delivery and
//! failure-isolation guarantees.

mod damage;
pub mod dispatch;

use std::fmt;
use std::sync::Arc;

pub use damage::{DamageCauser, DamageDetail, DamageEvent, DamageType};
pub use dispatch::{DamagePhase, DispatchReport, HandlerFailure, dispatch};

use crate::error::{ErrorSeverity, GameError};
use crate::state::CharacterId;

/// How loudly a failing handler should be reported.
///
/// Unlike post-action hooks, no level aborts the broadcast: every mod always
/// sees every event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ModCriticality {
    /// Gameplay-affecting mod; failures are logged as errors.
    #[default]
    Important,
    /// Cosmetic or best-effort mod; failures are logged at debug level.
    Optional,
}

/// Error raised by a mod handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModError {
    #[error("mod handler failed: {0}")]
    HandlerFailed(String),

    #[error("mod is in an unusable state: {0}")]
    InvalidState(String),
}

impl GameError for ModError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::HandlerFailed(_) => "MOD_HANDLER_FAILED",
            Self::InvalidState(_) => "MOD_INVALID_STATE",
        }
    }
}

/// State change requested by a mod, applied once the broadcast finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ModEffect {
    Heal { target: CharacterId, amount: f32 },
    RestoreFlare { target: CharacterId, amount: f32 },
    /// Secondary damage instigated by the mod holder.
    Damage {
        target: CharacterId,
        amount: f32,
        damage_type: DamageType,
    },
}

/// Per-invocation context handed to mod handlers.
#[derive(Debug)]
pub struct ModContext<'a> {
    holder: CharacterId,
    effects: &'a mut Vec<ModEffect>,
}

impl<'a> ModContext<'a> {
    pub fn new(holder: CharacterId, effects: &'a mut Vec<ModEffect>) -> Self {
        Self { holder, effects }
    }

    /// Character the mod is attached to.
    pub fn holder(&self) -> CharacterId {
        self.holder
    }

    pub fn push(&mut self, effect: ModEffect) {
        self.effects.push(effect);
    }
}

/// A passive modifier reacting to its holder's damage events.
///
/// Both handlers default to doing nothing, so a mod implements only the
/// capabilities it cares about.
pub trait Mod: Send + Sync {
    /// Human-readable name used in logs and for detaching by name.
    fn name(&self) -> &str;

    fn criticality(&self) -> ModCriticality {
        ModCriticality::Important
    }

    /// Holder received damage.
    fn on_character_damaged(
        &self,
        _ctx: &mut ModContext<'_>,
        _event: &DamageEvent,
    ) -> Result<(), ModError> {
        Ok(())
    }

    /// Holder dealt damage to `event.target`.
    fn on_character_dealt_damage(
        &self,
        _ctx: &mut ModContext<'_>,
        _event: &DamageEvent,
    ) -> Result<(), ModError> {
        Ok(())
    }
}

/// Ordered list of mods attached to one character.
#[derive(Clone, Default)]
pub struct ModList {
    mods: Vec<Arc<dyn Mod>>,
}

impl ModList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mod; it will be dispatched after every mod already attached.
    pub fn attach(&mut self, m: Arc<dyn Mod>) -> usize {
        self.mods.push(m);
        self.mods.len() - 1
    }

    /// Removes the mod at `index`, preserving the order of the rest.
    pub fn detach(&mut self, index: usize) -> Option<Arc<dyn Mod>> {
        (index < self.mods.len()).then(|| self.mods.remove(index))
    }

    /// Removes the first mod called `name`.
    pub fn detach_named(&mut self, name: &str) -> Option<Arc<dyn Mod>> {
        let index = self.mods.iter().position(|m| m.name() == name)?;
        self.detach(index)
    }

    /// Frozen copy of the list to dispatch over.
    pub fn snapshot(&self) -> Arc<[Arc<dyn Mod>]> {
        self.mods.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.mods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mods.iter().map(|m| m.name())
    }
}

impl fmt::Debug for ModList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
