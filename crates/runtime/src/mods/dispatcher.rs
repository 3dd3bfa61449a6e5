//! Runtime wrapper around the core mod broadcast.

use tracing::{debug, error};

use realm_core::mods::dispatch;
use realm_core::{Character, DamageEvent, DamagePhase, DispatchReport, GameError, ModCriticality};

/// Broadcasts damage events to a character's mods and logs handler failures.
///
/// Each broadcast runs over a snapshot of the holder's mod list, so the
/// effects a mod requests (including attaching or detaching mods) can never
/// alter the broadcast in progress.
#[derive(Debug, Default)]
pub struct ModDispatcher {
    failures: u64,
}

impl ModDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to the mods attached to the damaged character.
    pub fn dispatch_damaged(&mut self, holder: &Character, event: &DamageEvent) -> DispatchReport {
        self.dispatch(holder, DamagePhase::Damaged, event)
    }

    /// Delivers `event` to the mods attached to the character that dealt it.
    pub fn dispatch_dealt(&mut self, holder: &Character, event: &DamageEvent) -> DispatchReport {
        self.dispatch(holder, DamagePhase::Dealt, event)
    }

    /// Total handler failures seen since creation.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    fn dispatch(
        &mut self,
        holder: &Character,
        phase: DamagePhase,
        event: &DamageEvent,
    ) -> DispatchReport {
        let mods = holder.mods.snapshot();
        let report = dispatch(&mods, phase, holder.id, event);
        self.log_failures(&report);
        report
    }

    /// Logs failures at a level picked by the mod's criticality.
    fn log_failures(&mut self, report: &DispatchReport) {
        for failure in &report.failures {
            self.failures += 1;
            let phase: &'static str = report.phase.into();

            match failure.criticality {
                ModCriticality::Important => error!(
                    target: "runtime::mods",
                    holder = %report.holder,
                    phase,
                    mod_name = %failure.mod_name,
                    index = failure.index,
                    code = failure.error.error_code(),
                    error = %failure.error,
                    "Mod handler failed, continuing broadcast"
                ),
                ModCriticality::Optional => debug!(
                    target: "runtime::mods",
                    holder = %report.holder,
                    phase,
                    mod_name = %failure.mod_name,
                    index = failure.index,
                    error = %failure.error,
                    "Optional mod handler failed"
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use glam::Vec3;
    use realm_core::{
        CharacterId, DamageCauser, DamageType, Mod, ModContext, ModError, TeamId,
    };

    use super::*;

    struct Failing(ModCriticality);

    impl Mod for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn criticality(&self) -> ModCriticality {
            self.0
        }

        fn on_character_damaged(
            &self,
            _ctx: &mut ModContext<'_>,
            _event: &DamageEvent,
        ) -> Result<(), ModError> {
            Err(ModError::HandlerFailed("boom".into()))
        }
    }

    #[test]
    fn counts_failures_of_every_criticality() {
        let mut holder = Character::new(CharacterId(1), TeamId(0), Vec3::ZERO);
        holder.mods.attach(Arc::new(Failing(ModCriticality::Important)));
        holder.mods.attach(Arc::new(Failing(ModCriticality::Optional)));

        let event = DamageEvent::new(
            10.0,
            DamageType::Physical,
            None,
            DamageCauser::Environment,
            CharacterId(1),
        );

        let mut dispatcher = ModDispatcher::new();
        let report = dispatcher.dispatch_damaged(&holder, &event);
        assert_eq!(report.delivered, 2);
        assert_eq!(dispatcher.failures(), 2);

        let report = dispatcher.dispatch_dealt(&holder, &event);
        assert!(report.is_clean());
        assert_eq!(dispatcher.failures(), 2);
    }
}
