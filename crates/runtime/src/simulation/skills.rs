//! Skill resolution and administrative skill operations.

use glam::Vec3;
use tracing::{debug, info, warn};

use realm_core::state::planar_unit;
use realm_core::{
    CharacterId, CollisionChannels, DamageCauser, DamageDetail, DamageEvent, InterruptReason,
    SkillEffect, SkillError, SkillInterrupted, SkillKey, SkillState, Tick, World, cone_trace,
    sphere_trace,
};

use super::{PendingCast, Simulation};
use crate::commands::CommandError;

impl Simulation {
    /// Resolves a performing skill and starts its cooldown.
    ///
    /// Auto-perform skills get here straight from activation; others wait
    /// for this call (e.g. when the cast animation completes). Returns the
    /// armed cooldown.
    pub fn perform_skill(&mut self, actor: CharacterId, slot: u8) -> Result<Tick, CommandError> {
        let skill = skill_in(&self.world, actor, slot)?;
        if skill.state() != SkillState::Performing {
            return Err(transition("perform", skill.state()).into());
        }

        let cast = match self.pending_casts.remove(&(actor, slot)) {
            Some(cast) => cast,
            None => self.default_cast(actor),
        };
        let hits = self.resolve_effect(actor, slot, cast);

        // Cooldown starts before damage lands: reflected damage may kill the
        // caster, which must not find the skill still performing.
        let cooldown = skill_in_mut(&mut self.world, actor, slot)?
            .skill_finished(&mut self.timers, None)?;

        debug!(
            target: "runtime::sim",
            actor = %actor,
            slot,
            hits = hits.len(),
            cooldown = %cooldown,
            "Skill performed"
        );

        for event in hits {
            self.apply_damage_inner(event);
        }
        self.publish_snapshots();
        Ok(cooldown)
    }

    /// Ends a performance without resolving its effect.
    pub fn finish_skill(
        &mut self,
        actor: CharacterId,
        slot: u8,
        manual: Option<f32>,
    ) -> Result<Tick, CommandError> {
        let cooldown = skill_in_mut(&mut self.world, actor, slot)?
            .skill_finished(&mut self.timers, manual)?;
        self.pending_casts.remove(&(actor, slot));
        self.publish_snapshots();
        Ok(cooldown)
    }

    /// Starts or restarts a cooldown handing over to `after` (effects,
    /// scripted lockouts).
    pub fn start_skill_cooldown(
        &mut self,
        actor: CharacterId,
        slot: u8,
        manual: Option<f32>,
        after: SkillState,
    ) -> Result<Tick, CommandError> {
        let cooldown = skill_in_mut(&mut self.world, actor, slot)?
            .start_cooldown(&mut self.timers, manual, after)?;
        self.publish_snapshots();
        Ok(cooldown)
    }

    /// Interrupts the skill in `slot` if it is performing.
    pub fn interrupt_skill(
        &mut self,
        actor: CharacterId,
        slot: u8,
        reason: InterruptReason,
    ) -> Result<Option<SkillInterrupted>, CommandError> {
        let notice = self.interrupt_quietly(actor, slot, reason)?;
        self.publish_snapshots();
        Ok(notice)
    }

    /// Interrupts every performing skill of `actor`.
    pub fn interrupt_all(&mut self, actor: CharacterId, reason: InterruptReason) -> Vec<SkillInterrupted> {
        let notices = self.interrupt_performing(actor, reason);
        self.publish_snapshots();
        notices
    }

    pub fn disable_skill(&mut self, actor: CharacterId, slot: u8) -> Result<(), CommandError> {
        skill_in_mut(&mut self.world, actor, slot)?.disable()?;
        self.publish_snapshots();
        Ok(())
    }

    pub fn reenable_skill(&mut self, actor: CharacterId, slot: u8) -> Result<SkillState, CommandError> {
        let now = self.timers.now();
        let state = skill_in_mut(&mut self.world, actor, slot)?.reenable(now)?;
        self.publish_snapshots();
        Ok(state)
    }

    /// Administrative state override paired with its timer side effects.
    ///
    /// Overriding away from `OnCooldown` cancels the running cooldown timer,
    /// so it can never fire into the new state. Forcing `OnCooldown` keeps a
    /// running cooldown, or arms a fresh rank-scaled one.
    pub fn set_skill_state(
        &mut self,
        actor: CharacterId,
        slot: u8,
        state: SkillState,
    ) -> Result<(), CommandError> {
        let skill = skill_in_mut(&mut self.world, actor, slot)?;
        match state {
            SkillState::OnCooldown if !skill.has_cooldown() => {
                skill.start_cooldown(&mut self.timers, None, SkillState::Ready)?;
            }
            SkillState::OnCooldown => skill.set_state(state)?,
            _ => {
                skill.set_state(state)?;
                skill.cancel_cooldown(&mut self.timers);
            }
        }
        if state != SkillState::Performing {
            self.pending_casts.remove(&(actor, slot));
        }

        warn!(
            target: "runtime::sim",
            actor = %actor,
            slot,
            %state,
            "Skill state overridden"
        );
        self.publish_snapshots();
        Ok(())
    }

    /// Administrative reset: cancels the cooldown timer and returns the skill
    /// to its resting state.
    pub fn reset_skill(&mut self, actor: CharacterId, slot: u8) -> Result<SkillState, CommandError> {
        let state = skill_in_mut(&mut self.world, actor, slot)?.reset(&mut self.timers)?;
        self.pending_casts.remove(&(actor, slot));
        self.publish_snapshots();
        Ok(state)
    }

    pub(super) fn interrupt_performing(
        &mut self,
        actor: CharacterId,
        reason: InterruptReason,
    ) -> Vec<SkillInterrupted> {
        let slots: Vec<u8> = match self.world.get(actor) {
            Some(character) => character.skills.performing().collect(),
            None => return Vec::new(),
        };

        let mut notices = Vec::new();
        for slot in slots {
            match self.interrupt_quietly(actor, slot, reason) {
                Ok(Some(notice)) => notices.push(notice),
                Ok(None) => {}
                Err(error) => warn!(
                    target: "runtime::sim",
                    actor = %actor,
                    slot,
                    %error,
                    "Interrupt failed"
                ),
            }
        }
        notices
    }

    fn interrupt_quietly(
        &mut self,
        actor: CharacterId,
        slot: u8,
        reason: InterruptReason,
    ) -> Result<Option<SkillInterrupted>, CommandError> {
        skill_in(&self.world, actor, slot)?;
        let cast = match self.pending_casts.get(&(actor, slot)) {
            Some(cast) => *cast,
            None => self.default_cast(actor),
        };

        let notice = skill_in_mut(&mut self.world, actor, slot)?.interrupt(
            &mut self.timers,
            reason,
            cast.aim,
            cast.target,
        )?;

        if let Some(notice) = notice {
            self.pending_casts.remove(&(actor, slot));
            self.interrupts.push(notice);
            info!(
                target: "runtime::sim",
                actor = %actor,
                slot,
                %reason,
                resulting = %notice.resulting_state,
                "Skill interrupted"
            );
        }
        Ok(notice)
    }

    /// Aim straight ahead when no cast was recorded.
    fn default_cast(&self, actor: CharacterId) -> PendingCast {
        let aim = self
            .world
            .get(actor)
            .map(|c| c.position + c.facing)
            .unwrap_or(Vec3::ZERO);
        PendingCast { aim, target: None }
    }

    /// Damage events produced by the skill's effect, in hit order.
    fn resolve_effect(&self, actor: CharacterId, slot: u8, cast: PendingCast) -> Vec<DamageEvent> {
        let Some(caster) = self.world.get(actor) else {
            return Vec::new();
        };
        let Some(skill) = caster.skills.get(slot) else {
            return Vec::new();
        };

        let origin = caster.position;
        let dir = planar_unit(cast.aim - origin).unwrap_or(caster.facing);
        let key = SkillKey::new(actor, slot);

        let (victims, amount, damage_type) = match skill.definition().effect {
            SkillEffect::None => return Vec::new(),
            SkillEffect::SphereStrike {
                range,
                radius,
                damage_min,
                damage_max,
                damage_type,
            } => {
                let hits = sphere_trace(
                    &self.world,
                    Some(actor),
                    origin,
                    origin + dir * range,
                    radius,
                    CollisionChannels::PAWN,
                );
                let victims = hits.into_iter().map(|hit| hit.character).collect();
                (victims, skill.level_scale(damage_min, damage_max, true), damage_type)
            }
            SkillEffect::ConeStrike {
                height,
                damage_min,
                damage_max,
                damage_type,
            } => {
                let victims = cone_trace(
                    &self.world,
                    Some(actor),
                    origin,
                    dir,
                    height,
                    CollisionChannels::PAWN,
                );
                (victims, skill.level_scale(damage_min, damage_max, true), damage_type)
            }
        };

        let victims: Vec<CharacterId> = victims
            .into_iter()
            .filter(|&id| is_enemy(&self.world, actor, id))
            .collect();
        let area = victims.len() > 1;

        victims
            .into_iter()
            .map(|target| {
                DamageEvent::new(
                    amount,
                    damage_type,
                    Some(actor),
                    DamageCauser::Skill(key),
                    target,
                )
                .with_detail(DamageDetail {
                    area,
                    ..DamageDetail::default()
                })
            })
            .collect()
    }
}

fn is_enemy(world: &World, actor: CharacterId, other: CharacterId) -> bool {
    match (world.get(actor), world.get(other)) {
        (Some(a), Some(b)) => a.is_enemy_of(b),
        _ => false,
    }
}

fn transition(operation: &'static str, state: SkillState) -> SkillError {
    SkillError::InvalidStateTransition { operation, state }
}

fn skill_in(world: &World, actor: CharacterId, slot: u8) -> Result<&realm_core::Skill, CommandError> {
    world
        .get(actor)
        .ok_or(CommandError::UnknownCharacter(actor))?
        .skills
        .get(slot)
        .ok_or(CommandError::UnknownSkill { actor, slot })
}

fn skill_in_mut(
    world: &mut World,
    actor: CharacterId,
    slot: u8,
) -> Result<&mut realm_core::Skill, CommandError> {
    world
        .get_mut(actor)
        .ok_or(CommandError::UnknownCharacter(actor))?
        .skills
        .get_mut(slot)
        .ok_or(CommandError::UnknownSkill { actor, slot })
}
