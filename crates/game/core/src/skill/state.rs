//! Skill lifecycle states and interrupt reasons.

use crate::state::CharacterId;

/// Current state of a skill's lifecycle.
///
/// ```text
/// NoOwner ──initialize──▶ NotLearned ──add_point──▶ Ready ──activate──▶ Performing
///                                                     ▲                    │
///                                                     └── cooldown timer ◀─┘ skill_finished / interrupt
/// Ready | OnCooldown | NotLearned ──disable──▶ Disabled ──reenable──▶ OnCooldown | Ready
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillState {
    /// Created but not yet bound to a character. Never re-entered.
    NoOwner,
    /// Learned and usable.
    Ready,
    /// Owned but without any skill points.
    NotLearned,
    /// Forcibly unusable (silence, stun, scripted lockout).
    Disabled,
    /// Waiting for the cooldown timer to elapse.
    OnCooldown,
    /// Activated and currently resolving.
    Performing,
}

impl SkillState {
    /// States a cooldown may hand control to once it elapses.
    pub fn is_valid_after_cooldown(self) -> bool {
        matches!(self, Self::Ready | Self::Disabled | Self::NotLearned)
    }

    /// States from which a skill can be disabled.
    pub fn can_disable(self) -> bool {
        matches!(self, Self::Ready | Self::OnCooldown | Self::NotLearned)
    }
}

/// Why a performing skill was cut short.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterruptReason {
    /// Damaged while performing.
    Damaged,
    /// Crowd controlled while performing.
    CrowdControlled,
    /// Knocked up or back while performing.
    Knocked,
    /// Owner died while performing.
    Died,
    /// Owner cancelled the skill.
    UserCancelled,
}

/// Cosmetic notification emitted when a performing skill is interrupted.
///
/// Observers use it for feedback (animation, sound, UI flash); it never
/// affects skill state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInterrupted {
    pub owner: CharacterId,
    pub slot: u8,
    pub reason: InterruptReason,
    pub aim: glam::Vec3,
    pub target: Option<CharacterId>,
    /// State the skill ended up in after the interrupt.
    pub resulting_state: SkillState,
}
