/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Pawn sensing parameters used by every targeting controller.
    pub sensing: SensingConfig,

    /// Planar radius around a damaged character within which teammates
    /// receive a call for help.
    pub alert_radius: f32,

    /// How many points a skill may lead the least-upgraded sibling skill by
    /// before further upgrades are refused.
    pub upgrade_skew: u32,

    /// Maximum nesting of secondary damage raised by mods while handling a
    /// damage event.
    pub max_mod_chain_depth: usize,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of skills a single character can own.
    pub const MAX_SKILLS: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ALERT_RADIUS: f32 = 710.0;
    pub const DEFAULT_UPGRADE_SKEW: u32 = 1;
    pub const DEFAULT_MAX_MOD_CHAIN_DEPTH: usize = 4;

    pub fn new() -> Self {
        Self {
            sensing: SensingConfig::default(),
            alert_radius: Self::DEFAULT_ALERT_RADIUS,
            upgrade_skew: Self::DEFAULT_UPGRADE_SKEW,
            max_mod_chain_depth: Self::DEFAULT_MAX_MOD_CHAIN_DEPTH,
        }
    }

    pub fn with_upgrade_skew(mut self, upgrade_skew: u32) -> Self {
        self.upgrade_skew = upgrade_skew;
        self
    }

    pub fn with_alert_radius(mut self, alert_radius: f32) -> Self {
        self.alert_radius = alert_radius;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of the periodic pawn sensing sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensingConfig {
    /// Sight radius in world units (planar).
    pub radius: f32,
    /// Seconds between sensing sweeps.
    pub interval_secs: f32,
    /// Full peripheral vision angle in degrees, centred on the facing.
    pub peripheral_angle_deg: f32,
}

impl SensingConfig {
    pub const DEFAULT_RADIUS: f32 = 1000.0;
    pub const DEFAULT_INTERVAL_SECS: f32 = 0.25;
    pub const DEFAULT_PERIPHERAL_ANGLE_DEG: f32 = 180.0;

    pub fn radius_sq(&self) -> f32 {
        self.radius * self.radius
    }

    /// Cosine of half the peripheral angle; a target is in view when the
    /// cosine between facing and direction-to-target is at least this value.
    pub fn min_view_cosine(&self) -> f32 {
        (self.peripheral_angle_deg.clamp(0.0, 360.0) * 0.5)
            .to_radians()
            .cos()
    }
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            interval_secs: Self::DEFAULT_INTERVAL_SECS,
            peripheral_angle_deg: Self::DEFAULT_PERIPHERAL_ANGLE_DEG,
        }
    }
}
