//! Content factory for loading combat content from a data directory.

use std::path::{Path, PathBuf};

use realm_core::CombatConfig;

use crate::catalog::SkillCatalog;
use crate::loaders::{ConfigLoader, LoadResult, SkillCatalogLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// └── skills.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load combat configuration from `combat.toml`.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        ConfigLoader::load(&self.data_dir.join("combat.toml"))
    }

    /// Load the skill catalog from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillCatalog> {
        SkillCatalogLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Content embedded in the crate, for tools without a data directory.
    pub fn bundled() -> LoadResult<(CombatConfig, SkillCatalog)> {
        let config = ConfigLoader::parse(crate::BUNDLED_COMBAT_CONFIG)?;
        let skills = SkillCatalogLoader::parse(crate::BUNDLED_SKILLS)?;
        Ok((config, skills))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_from_data_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("combat.toml"), crate::BUNDLED_COMBAT_CONFIG).unwrap();
        std::fs::write(dir.path().join("skills.ron"), crate::BUNDLED_SKILLS).unwrap();

        let factory = ContentFactory::new(dir.path());
        let config = factory.load_config().unwrap();
        let skills = factory.load_skills().unwrap();

        let (bundled_config, bundled_skills) = ContentFactory::bundled().unwrap();
        assert_eq!(config, bundled_config);
        assert_eq!(skills.len(), bundled_skills.len());
    }
}
