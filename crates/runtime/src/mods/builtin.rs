//! Stock mods used by the demo roster and the integration tests.

use realm_core::{DamageEvent, Mod, ModContext, ModCriticality, ModEffect, ModError};

/// Heals the holder for a share of the damage it deals.
#[derive(Debug, Clone, Copy)]
pub struct Lifesteal {
    pub ratio: f32,
}

impl Mod for Lifesteal {
    fn name(&self) -> &str {
        "lifesteal"
    }

    fn on_character_dealt_damage(
        &self,
        ctx: &mut ModContext<'_>,
        event: &DamageEvent,
    ) -> Result<(), ModError> {
        if !(self.ratio >= 0.0) {
            return Err(ModError::InvalidState(format!(
                "negative lifesteal ratio {}",
                self.ratio
            )));
        }
        ctx.push(ModEffect::Heal {
            target: ctx.holder(),
            amount: event.amount * self.ratio,
        });
        Ok(())
    }
}

/// Reflects a share of incoming damage back to the instigator.
///
/// The reflected hit is secondary damage and goes through the damage
/// pipeline again, bounded by the configured chain depth.
#[derive(Debug, Clone, Copy)]
pub struct Thorns {
    pub ratio: f32,
}

impl Mod for Thorns {
    fn name(&self) -> &str {
        "thorns"
    }

    fn on_character_damaged(
        &self,
        ctx: &mut ModContext<'_>,
        event: &DamageEvent,
    ) -> Result<(), ModError> {
        let Some(attacker) = event.instigator else {
            return Ok(());
        };
        if attacker == ctx.holder() {
            return Ok(());
        }
        ctx.push(ModEffect::Damage {
            target: attacker,
            amount: event.amount * self.ratio,
            damage_type: event.damage_type,
        });
        Ok(())
    }
}

/// Restores a fixed amount of flare whenever the holder is hit.
#[derive(Debug, Clone, Copy)]
pub struct FlareOnHit {
    pub amount: f32,
}

impl Mod for FlareOnHit {
    fn name(&self) -> &str {
        "flare_on_hit"
    }

    fn criticality(&self) -> ModCriticality {
        ModCriticality::Optional
    }

    fn on_character_damaged(
        &self,
        ctx: &mut ModContext<'_>,
        _event: &DamageEvent,
    ) -> Result<(), ModError> {
        ctx.push(ModEffect::RestoreFlare {
            target: ctx.holder(),
            amount: self.amount,
        });
        Ok(())
    }
}
