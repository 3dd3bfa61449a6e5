//! Player commands and their validation errors.
//!
//! Commands are the only way to change authoritative state from outside the
//! simulation. A rejected command leaves every piece of state untouched.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use realm_core::{CharacterId, ErrorSeverity, GameError, SkillError};

/// A request issued by (or on behalf of) a character.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Activate the skill in `slot`, aimed at `aim` or at `target` if given.
    UseSkill {
        slot: u8,
        aim: Vec3,
        target: Option<CharacterId>,
    },
    /// Spend an upgrade point on the skill in `slot`.
    UpgradeSkill { slot: u8 },
    /// Attack `target` if given, otherwise move to `point`.
    MoveOrAttack {
        point: Vec3,
        target: Option<CharacterId>,
    },
    /// Re-aim the performing skill in `slot` before it resolves.
    AimSkill {
        slot: u8,
        aim: Vec3,
        target: Option<CharacterId>,
    },
    /// Drop the current move destination.
    ClearMove,
    /// Drop the current auto-attack target.
    ClearAttack,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::UseSkill { .. } => "use_skill",
            Command::UpgradeSkill { .. } => "upgrade_skill",
            Command::MoveOrAttack { .. } => "move_or_attack",
            Command::AimSkill { .. } => "aim_skill",
            Command::ClearMove => "clear_move",
            Command::ClearAttack => "clear_attack",
        }
    }
}

/// Command issued remotely and forwarded to the authoritative side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteCommand {
    pub actor: CharacterId,
    pub command: Command,
}

/// Why a command was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CommandError {
    #[error("character {0} does not exist")]
    UnknownCharacter(CharacterId),

    #[error("character {0} is dead")]
    ActorDead(CharacterId),

    #[error("character {actor} has no skill in slot {slot}")]
    UnknownSkill { actor: CharacterId, slot: u8 },

    #[error("{target} is not a valid target for {actor}")]
    InvalidTarget {
        actor: CharacterId,
        target: CharacterId,
    },

    #[error("not enough flare: need {required}, have {available}")]
    InsufficientFlare { required: f32, available: f32 },

    #[error("character {0} has no upgrade points")]
    NoUpgradePoints(CharacterId),

    #[error("skill in slot {slot} cannot be upgraded right now")]
    UpgradeNotAllowed { slot: u8 },

    #[error(transparent)]
    Skill(#[from] SkillError),
}

impl GameError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InsufficientFlare { .. } => ErrorSeverity::Recoverable,
            Self::Skill(err) => err.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCharacter(_) => "COMMAND_UNKNOWN_CHARACTER",
            Self::ActorDead(_) => "COMMAND_ACTOR_DEAD",
            Self::UnknownSkill { .. } => "COMMAND_UNKNOWN_SKILL",
            Self::InvalidTarget { .. } => "COMMAND_INVALID_TARGET",
            Self::InsufficientFlare { .. } => "COMMAND_INSUFFICIENT_FLARE",
            Self::NoUpgradePoints(_) => "COMMAND_NO_UPGRADE_POINTS",
            Self::UpgradeNotAllowed { .. } => "COMMAND_UPGRADE_NOT_ALLOWED",
            Self::Skill(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realm_core::SkillState;

    #[test]
    fn skill_errors_keep_their_classification() {
        let err = CommandError::from(SkillError::InvalidStateTransition {
            operation: "activate",
            state: SkillState::OnCooldown,
        });
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert!(err.error_code().starts_with("SKILL_"));
    }

    #[test]
    fn commands_round_trip_through_json() {
        let remote = RemoteCommand {
            actor: CharacterId(3),
            command: Command::UseSkill {
                slot: 1,
                aim: Vec3::new(1.0, 2.0, 0.0),
                target: None,
            },
        };
        let json = serde_json::to_string(&remote).unwrap();
        assert_eq!(serde_json::from_str::<RemoteCommand>(&json).unwrap(), remote);
    }

    #[test]
    fn clear_commands_carry_no_payload() {
        assert_eq!(serde_json::to_string(&Command::ClearMove).unwrap(), r#""ClearMove""#);
        assert_eq!(Command::ClearAttack.name(), "clear_attack");

        let aim: Command = serde_json::from_str(
            r#"{"AimSkill":{"slot":2,"aim":[0.0,1.0,0.0],"target":7}}"#,
        )
        .unwrap();
        assert_eq!(
            aim,
            Command::AimSkill {
                slot: 2,
                aim: Vec3::Y,
                target: Some(CharacterId(7)),
            }
        );
        assert_eq!(aim.name(), "aim_skill");
    }
}
