//! Damage event payload shared by the damage pipeline and every mod.

use crate::skill::SkillKey;
use crate::state::CharacterId;

/// Damage type tag carried by every damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageType {
    #[default]
    Physical,
    Magical,
    /// Ignores every mitigation.
    True,
}

/// The actor that physically delivered the damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageCauser {
    /// Auto-attack or scripted hit delivered by the character itself.
    Character(CharacterId),
    /// A skill owned by the instigator.
    Skill(SkillKey),
    /// A mod reacting to an earlier damage event.
    Mod(CharacterId),
    /// World hazard with no owner.
    Environment,
}

/// Domain-specific detail attached to a damage event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDetail {
    pub critical: bool,
    /// Hit came from an area query rather than a single target.
    pub area: bool,
    /// Zero for primary damage; incremented for damage raised by mods while
    /// handling another damage event.
    pub chain_depth: u8,
}

/// Immutable description of one damage application.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    pub amount: f32,
    pub damage_type: DamageType,
    /// Character credited with the damage, if any.
    pub instigator: Option<CharacterId>,
    pub causer: DamageCauser,
    pub detail: DamageDetail,
    pub target: CharacterId,
}

impl DamageEvent {
    pub fn new(
        amount: f32,
        damage_type: DamageType,
        instigator: Option<CharacterId>,
        causer: DamageCauser,
        target: CharacterId,
    ) -> Self {
        Self {
            amount,
            damage_type,
            instigator,
            causer,
            detail: DamageDetail::default(),
            target,
        }
    }

    pub fn with_detail(mut self, detail: DamageDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn is_secondary(&self) -> bool {
        self.detail.chain_depth > 0
    }
}
