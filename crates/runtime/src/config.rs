//! Runtime configuration shared by the simulation and its channels.

use realm_core::CombatConfig;
use serde::{Deserialize, Serialize};

/// Runtime configuration shared across the simulation and replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Capacity of the skill snapshot broadcast channel.
    pub snapshot_buffer_size: usize,
    /// Capacity of the remote command channel.
    pub command_buffer_size: usize,
    /// Arm periodic sensing sweeps for spawned characters.
    pub enable_sensing: bool,
}

impl RuntimeConfig {
    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_sensing(mut self, enable: bool) -> Self {
        self.enable_sensing = enable;
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            snapshot_buffer_size: 256,
            command_buffer_size: 32,
            enable_sensing: true,
        }
    }
}
