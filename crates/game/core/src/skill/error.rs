//! Skill operation and definition errors.

use crate::error::{ErrorSeverity, GameError};
use crate::skill::SkillState;

/// Errors returned by skill state machine operations.
///
/// Every variant leaves the skill untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SkillError {
    /// Operation attempted from a state that forbids it.
    #[error("cannot {operation} while skill is {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: SkillState,
    },

    /// A cooldown was asked to end in a state it cannot hand over to.
    #[error("{0} is not a valid post-cooldown state")]
    InvalidAfterCooldownState(SkillState),

    /// All skill points are already allocated.
    #[error("skill already has the maximum of {max} points")]
    MaxPointsReached { max: u32 },
}

impl SkillError {
    pub(crate) fn transition(operation: &'static str, state: SkillState) -> Self {
        Self::InvalidStateTransition { operation, state }
    }
}

impl GameError for SkillError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidStateTransition { .. } => ErrorSeverity::Recoverable,
            Self::InvalidAfterCooldownState(_) => ErrorSeverity::Validation,
            Self::MaxPointsReached { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition { .. } => "SKILL_INVALID_STATE_TRANSITION",
            Self::InvalidAfterCooldownState(_) => "SKILL_INVALID_AFTER_COOLDOWN_STATE",
            Self::MaxPointsReached { .. } => "SKILL_MAX_POINTS_REACHED",
        }
    }
}

/// Problems found while validating a skill definition.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("skill '{name}': points_max must be at least 1")]
    NoPoints { name: String },

    #[error("skill '{name}': initial_points {initial} exceeds points_max {max}")]
    InitialPointsExceedMax { name: String, initial: u32, max: u32 },

    #[error("skill '{name}': {field} must be a non-negative number (got {value})")]
    NegativeValue {
        name: String,
        field: &'static str,
        value: f32,
    },
}
