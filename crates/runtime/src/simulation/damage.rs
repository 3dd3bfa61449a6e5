//! Damage pipeline: health, mod broadcast, ally alerts, death and mod effects.

use std::collections::VecDeque;

use tracing::{debug, info, trace, warn};

use realm_core::targeting::call_for_help;
use realm_core::{
    CharacterId, DamageCauser, DamageDetail, DamageEvent, InterruptReason, ModEffect,
};

use super::Simulation;

/// What happened to the primary target of [`Simulation::apply_damage`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DamageOutcome {
    /// Health actually removed.
    pub dealt: f32,
    /// The hit took the target from alive to dead.
    pub killed: bool,
    /// Teammates alerted by the hit (victim included).
    pub alerted: Vec<CharacterId>,
}

impl Simulation {
    /// Applies `event` and everything it triggers.
    ///
    /// Steps, all synchronous within the current tick:
    /// 1. health is removed from the target
    /// 2. the target's mods, then the instigator's mods, see the event
    /// 3. the target's team is alerted when the instigator is an enemy
    /// 4. a kill interrupts the target's performing skills
    /// 5. effects requested by mods are applied; secondary damage is queued
    ///    and processed the same way once this event is done
    pub fn apply_damage(&mut self, event: DamageEvent) -> DamageOutcome {
        let outcome = self.apply_damage_inner(event);
        self.publish_snapshots();
        outcome
    }

    pub(super) fn apply_damage_inner(&mut self, event: DamageEvent) -> DamageOutcome {
        let mut queue = VecDeque::from([event]);
        let mut primary = None;

        while let Some(event) = queue.pop_front() {
            let outcome = self.apply_single(event, &mut queue);
            if primary.is_none() {
                primary = Some(outcome);
            }
        }
        primary.unwrap_or_default()
    }

    fn apply_single(&mut self, event: DamageEvent, queue: &mut VecDeque<DamageEvent>) -> DamageOutcome {
        let Some(target) = self.world.get_mut(event.target) else {
            debug!(target: "runtime::sim", target_id = %event.target, "Damage to missing character dropped");
            return DamageOutcome::default();
        };
        if !target.is_alive() {
            trace!(target: "runtime::sim", target_id = %event.target, "Damage to dead character ignored");
            return DamageOutcome::default();
        }

        let dealt = target.take_damage(event.amount);
        let killed = !target.is_alive();
        debug!(
            target: "runtime::sim",
            target_id = %event.target,
            instigator = ?event.instigator,
            amount = event.amount,
            dealt,
            damage_type = %event.damage_type,
            depth = event.detail.chain_depth,
            secondary = event.is_secondary(),
            "Damage applied"
        );

        let mut effects: Vec<(CharacterId, ModEffect)> = Vec::new();
        if let Some(target) = self.world.get(event.target) {
            let report = self.mods.dispatch_damaged(target, &event);
            effects.extend(report.effects.into_iter().map(|e| (report.holder, e)));
        }
        if let Some(dealer) = event.instigator.and_then(|id| self.world.get(id)) {
            let report = self.mods.dispatch_dealt(dealer, &event);
            effects.extend(report.effects.into_iter().map(|e| (report.holder, e)));
        }

        let alerted = match event.instigator {
            Some(damager) => call_for_help(
                &mut self.world,
                event.target,
                damager,
                self.config.combat.alert_radius,
            ),
            None => Vec::new(),
        };

        if killed {
            self.on_death(event.target, event.instigator);
        }

        for (holder, effect) in effects {
            self.apply_mod_effect(holder, effect, &event, queue);
        }

        DamageOutcome {
            dealt,
            killed,
            alerted,
        }
    }

    fn on_death(&mut self, id: CharacterId, killer: Option<CharacterId>) {
        self.interrupt_performing(id, InterruptReason::Died);
        if let Some(character) = self.world.get_mut(id) {
            character.stop_auto_attack();
        }
        if let Some(controller) = self.controllers.get_mut(&id) {
            controller.clear();
        }
        info!(target: "runtime::sim", character = %id, killer = ?killer, "Character died");
    }

    fn apply_mod_effect(
        &mut self,
        holder: CharacterId,
        effect: ModEffect,
        cause: &DamageEvent,
        queue: &mut VecDeque<DamageEvent>,
    ) {
        match effect {
            ModEffect::Heal { target, amount } => {
                if let Some(character) = self.world.get_mut(target).filter(|c| c.is_alive()) {
                    character.health.restore(amount);
                }
            }
            ModEffect::RestoreFlare { target, amount } => {
                if let Some(character) = self.world.get_mut(target).filter(|c| c.is_alive()) {
                    character.flare.restore(amount);
                }
            }
            ModEffect::Damage {
                target,
                amount,
                damage_type,
            } => {
                let depth = cause.detail.chain_depth.saturating_add(1);
                if usize::from(depth) > self.config.combat.max_mod_chain_depth {
                    warn!(
                        target: "runtime::mods",
                        holder = %holder,
                        target_id = %target,
                        depth,
                        max_depth = self.config.combat.max_mod_chain_depth,
                        "Mod damage chain too deep, dropping"
                    );
                    return;
                }

                queue.push_back(
                    DamageEvent::new(
                        amount,
                        damage_type,
                        Some(holder),
                        DamageCauser::Mod(holder),
                        target,
                    )
                    .with_detail(DamageDetail {
                        chain_depth: depth,
                        ..DamageDetail::default()
                    }),
                );
            }
        }
    }
}
