//! Command validation and execution.

use glam::Vec3;
use tracing::{debug, trace};

use realm_core::state::planar_unit;
use realm_core::{CharacterId, GameError, SkillError, SkillState, World, is_hostile};

use super::{PendingCast, Simulation};
use crate::commands::{Command, CommandError};

impl Simulation {
    /// Validates and executes `command` on behalf of `actor`.
    ///
    /// A rejected command changes nothing.
    pub fn execute(&mut self, actor: CharacterId, command: Command) -> Result<(), CommandError> {
        let result = match command {
            Command::UseSkill { slot, aim, target } => self.use_skill(actor, slot, aim, target),
            Command::UpgradeSkill { slot } => self.upgrade_skill(actor, slot),
            Command::MoveOrAttack { point, target } => self.move_or_attack(actor, point, target),
            Command::AimSkill { slot, aim, target } => self.aim_skill(actor, slot, aim, target),
            Command::ClearMove => self.clear_move(actor),
            Command::ClearAttack => self.clear_attack(actor),
        };

        match &result {
            Ok(()) => trace!(
                target: "runtime::commands",
                actor = %actor,
                command = command.name(),
                "Command executed"
            ),
            Err(error) => debug!(
                target: "runtime::commands",
                actor = %actor,
                command = command.name(),
                code = error.error_code(),
                severity = error.severity().as_str(),
                %error,
                "Command rejected"
            ),
        }

        self.publish_snapshots();
        result
    }

    fn use_skill(
        &mut self,
        actor: CharacterId,
        slot: u8,
        aim: Vec3,
        target: Option<CharacterId>,
    ) -> Result<(), CommandError> {
        let character = self.living(actor)?;
        let skill = character
            .skills
            .get(slot)
            .ok_or(CommandError::UnknownSkill { actor, slot })?;

        let aim = resolve_aim(&self.world, actor, aim, target)?;

        if skill.is_ready() && character.flare.current < skill.cost() {
            return Err(CommandError::InsufficientFlare {
                required: skill.cost(),
                available: character.flare.current,
            });
        }
        let auto_perform = skill.definition().auto_perform;

        let character = self
            .world
            .get_mut(actor)
            .ok_or(CommandError::UnknownCharacter(actor))?;
        let skill = character
            .skills
            .get_mut(slot)
            .ok_or(CommandError::UnknownSkill { actor, slot })?;
        skill.activate()?;
        let cost = skill.cost();
        character.flare.drain(cost);
        if let Some(dir) = planar_unit(aim - character.position) {
            character.facing = dir;
        }

        debug!(
            target: "runtime::sim",
            actor = %actor,
            slot,
            auto_perform,
            "Skill activated"
        );

        self.pending_casts
            .insert((actor, slot), PendingCast { aim, target });
        if auto_perform {
            self.perform_skill(actor, slot)?;
        }
        Ok(())
    }

    fn upgrade_skill(&mut self, actor: CharacterId, slot: u8) -> Result<(), CommandError> {
        let skew = self.config.combat.upgrade_skew;
        let character = self
            .world
            .get_mut(actor)
            .ok_or(CommandError::UnknownCharacter(actor))?;
        if character.upgrade_points == 0 {
            return Err(CommandError::NoUpgradePoints(actor));
        }
        if character.skills.get(slot).is_none() {
            return Err(CommandError::UnknownSkill { actor, slot });
        }
        if !character.skills.can_upgrade(slot, skew) {
            return Err(CommandError::UpgradeNotAllowed { slot });
        }

        match character.skills.upgrade(slot, skew)? {
            Some(points) => {
                character.upgrade_points -= 1;
                debug!(
                    target: "runtime::sim",
                    actor = %actor,
                    slot,
                    points,
                    remaining = character.upgrade_points,
                    "Skill upgraded"
                );
                Ok(())
            }
            None => Err(CommandError::UpgradeNotAllowed { slot }),
        }
    }

    fn move_or_attack(
        &mut self,
        actor: CharacterId,
        point: Vec3,
        target: Option<CharacterId>,
    ) -> Result<(), CommandError> {
        self.living(actor)?;

        resolve_aim(&self.world, actor, point, target)?;

        let character = self
            .world
            .get_mut(actor)
            .ok_or(CommandError::UnknownCharacter(actor))?;
        match target {
            Some(target) => character.set_current_target(target),
            None => character.move_to(point),
        }
        Ok(())
    }

    fn aim_skill(
        &mut self,
        actor: CharacterId,
        slot: u8,
        aim: Vec3,
        target: Option<CharacterId>,
    ) -> Result<(), CommandError> {
        let character = self.living(actor)?;
        let skill = character
            .skills
            .get(slot)
            .ok_or(CommandError::UnknownSkill { actor, slot })?;
        if skill.state() != SkillState::Performing {
            return Err(SkillError::InvalidStateTransition {
                operation: "aim",
                state: skill.state(),
            }
            .into());
        }
        let aim = resolve_aim(&self.world, actor, aim, target)?;

        let character = self
            .world
            .get_mut(actor)
            .ok_or(CommandError::UnknownCharacter(actor))?;
        if let Some(dir) = planar_unit(aim - character.position) {
            character.facing = dir;
        }
        self.pending_casts
            .insert((actor, slot), PendingCast { aim, target });

        debug!(
            target: "runtime::sim",
            actor = %actor,
            slot,
            "Skill re-aimed"
        );
        Ok(())
    }

    fn clear_move(&mut self, actor: CharacterId) -> Result<(), CommandError> {
        self.living(actor)?;
        if let Some(character) = self.world.get_mut(actor) {
            character.stop_moving();
        }
        Ok(())
    }

    fn clear_attack(&mut self, actor: CharacterId) -> Result<(), CommandError> {
        self.living(actor)?;
        if let Some(character) = self.world.get_mut(actor) {
            character.stop_auto_attack();
        }
        Ok(())
    }

    fn living(&self, actor: CharacterId) -> Result<&realm_core::Character, CommandError> {
        let character = self
            .world
            .get(actor)
            .ok_or(CommandError::UnknownCharacter(actor))?;
        if !character.is_alive() {
            return Err(CommandError::ActorDead(actor));
        }
        Ok(character)
    }
}

/// Resolves the point a command aims at.
///
/// A named target must be a living enemy of `actor`; its position replaces `aim`.
fn resolve_aim(
    world: &World,
    actor: CharacterId,
    aim: Vec3,
    target: Option<CharacterId>,
) -> Result<Vec3, CommandError> {
    let Some(target) = target else {
        return Ok(aim);
    };
    let character = world.get(actor).ok_or(CommandError::UnknownCharacter(actor))?;
    let victim = world
        .get(target)
        .ok_or(CommandError::UnknownCharacter(target))?;
    if !is_hostile(character, victim) {
        return Err(CommandError::InvalidTarget { actor, target });
    }
    Ok(victim.position)
}
