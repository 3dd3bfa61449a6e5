//! Combat configuration loader.

use std::path::Path;

use realm_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys fall back to [`CombatConfig::default`].
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.alert_radius >= 0.0) || !(config.sensing.radius >= 0.0) {
            anyhow::bail!("Radii in combat config must be non-negative");
        }
        if !(config.sensing.interval_secs > 0.0) {
            anyhow::bail!("Sensing interval must be positive");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use realm_core::SensingConfig;

    #[test]
    fn missing_keys_use_defaults() {
        let config = ConfigLoader::parse("upgrade_skew = 2\n").unwrap();
        assert_eq!(config.upgrade_skew, 2);
        assert_eq!(config.alert_radius, CombatConfig::DEFAULT_ALERT_RADIUS);
        assert_eq!(config.sensing, SensingConfig::default());
    }

    #[test]
    fn rejects_non_positive_interval() {
        let err = ConfigLoader::parse("[sensing]\ninterval_secs = 0.0\n").unwrap_err();
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alert_radius = 500.0\n[sensing]\nradius = 800.0").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.alert_radius, 500.0);
        assert_eq!(config.sensing.radius, 800.0);
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ConfigLoader::load(&dir.path().join("combat.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
