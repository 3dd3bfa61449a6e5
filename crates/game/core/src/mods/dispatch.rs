//! Ordered, failure-isolated broadcast of damage events to mods.
//!
//! Delivery is synchronous and strictly in slice order. A handler returning
//! an error is recorded in the [`DispatchReport`] and the broadcast moves on
//! to the next mod; nothing a single mod does can skip or reorder the rest.

use std::sync::Arc;

use super::{DamageEvent, Mod, ModContext, ModCriticality, ModEffect, ModError};
use crate::state::CharacterId;

/// Which side of a damage event is being broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum DamagePhase {
    /// Delivered to the mods of the character that took the damage.
    Damaged,
    /// Delivered to the mods of the character that dealt the damage.
    Dealt,
}

/// A mod handler that failed during a broadcast.
#[derive(Clone, Debug, PartialEq)]
pub struct HandlerFailure {
    /// Position of the mod in the dispatched list.
    pub index: usize,
    pub mod_name: String,
    pub criticality: ModCriticality,
    pub error: ModError,
}

/// Outcome of one broadcast.
#[derive(Clone, Debug, PartialEq)]
pub struct DispatchReport {
    pub phase: DamagePhase,
    pub holder: CharacterId,
    /// Number of handlers invoked (failed ones included).
    pub delivered: usize,
    pub failures: Vec<HandlerFailure>,
    /// Effects requested by the mods, in the order they were pushed.
    pub effects: Vec<ModEffect>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Broadcasts `event` to every mod in `mods`, in order.
///
/// `mods` is expected to be a snapshot (see [`super::ModList::snapshot`]);
/// attaching or detaching mods while the broadcast runs cannot affect it.
pub fn dispatch(
    mods: &[Arc<dyn Mod>],
    phase: DamagePhase,
    holder: CharacterId,
    event: &DamageEvent,
) -> DispatchReport {
    let mut effects = Vec::new();
    let mut failures = Vec::new();

    for (index, m) in mods.iter().enumerate() {
        let mut ctx = ModContext::new(holder, &mut effects);
        let result = match phase {
            DamagePhase::Damaged => m.on_character_damaged(&mut ctx, event),
            DamagePhase::Dealt => m.on_character_dealt_damage(&mut ctx, event),
        };

        if let Err(error) = result {
            failures.push(HandlerFailure {
                index,
                mod_name: m.name().to_owned(),
                criticality: m.criticality(),
                error,
            });
        }
    }

    DispatchReport {
        phase,
        holder,
        delivered: mods.len(),
        failures,
        effects,
    }
}
