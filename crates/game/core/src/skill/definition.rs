//! Static skill configuration.

use crate::mods::DamageType;
use crate::skill::DefinitionError;

/// Static configuration shared by every instance of a skill.
///
/// Definitions are authored as data (see the content crate) and never change
/// at runtime; per-character progress lives in [`crate::skill::Skill`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,

    /// Maximum number of points the skill can hold.
    pub points_max: u32,
    /// Points granted when the skill is bound to its owner.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_points: u32,

    /// Cooldown in seconds at full rank.
    pub cooldown_min: f32,
    /// Cooldown in seconds at zero rank.
    pub cooldown_max: f32,
    /// Flare paid on activation.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: f32,

    /// Resolve immediately on activation and go straight to cooldown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_perform: bool,
    /// Start the cooldown when interrupted instead of returning to Ready.
    #[cfg_attr(feature = "serde", serde(default))]
    pub auto_cooldown_on_interrupt: bool,

    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: SkillEffect,
}

impl SkillDefinition {
    /// Minimal definition used by tests and scripted content.
    pub fn new(name: impl Into<String>, points_max: u32, cooldown_min: f32, cooldown_max: f32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            points_max,
            initial_points: 0,
            cooldown_min,
            cooldown_max,
            cost: 0.0,
            auto_perform: false,
            auto_cooldown_on_interrupt: false,
            effect: SkillEffect::None,
        }
    }

    pub fn with_initial_points(mut self, initial_points: u32) -> Self {
        self.initial_points = initial_points;
        self
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_auto_perform(mut self, auto_perform: bool) -> Self {
        self.auto_perform = auto_perform;
        self
    }

    pub fn with_auto_cooldown_on_interrupt(mut self, enabled: bool) -> Self {
        self.auto_cooldown_on_interrupt = enabled;
        self
    }

    pub fn with_effect(mut self, effect: SkillEffect) -> Self {
        self.effect = effect;
        self
    }

    /// Checks the invariants the state machine relies on.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.points_max == 0 {
            return Err(DefinitionError::NoPoints {
                name: self.name.clone(),
            });
        }
        if self.initial_points > self.points_max {
            return Err(DefinitionError::InitialPointsExceedMax {
                name: self.name.clone(),
                initial: self.initial_points,
                max: self.points_max,
            });
        }

        let fields = [
            ("cooldown_min", self.cooldown_min),
            ("cooldown_max", self.cooldown_max),
            ("cost", self.cost),
        ];
        for (field, value) in fields {
            if !(value >= 0.0) {
                return Err(DefinitionError::NegativeValue {
                    name: self.name.clone(),
                    field,
                    value,
                });
            }
        }

        Ok(())
    }
}

/// How a skill resolves on the authoritative side once performed.
///
/// Damage values are interpolated by skill rank (increasing).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    /// Purely scripted skill; nothing is resolved automatically.
    #[default]
    None,

    /// Sweeps a sphere from the owner towards the aim point.
    SphereStrike {
        range: f32,
        radius: f32,
        damage_min: f32,
        damage_max: f32,
        damage_type: DamageType,
    },

    /// Approximated cone in front of the owner, pointing at the aim point.
    ConeStrike {
        height: f32,
        damage_min: f32,
        damage_max: f32,
        damage_type: DamageType,
    },
}
