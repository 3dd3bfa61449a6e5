//! Skill catalog loader.

use std::path::Path;

use realm_core::SkillDefinition;
use serde::{Deserialize, Serialize};

use crate::catalog::SkillCatalog;
use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillCatalogRon {
    skills: Vec<SkillDefinition>,
}

/// Loader for skill catalogs from RON files.
pub struct SkillCatalogLoader;

impl SkillCatalogLoader {
    /// Load a skill catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SkillCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} (in {})", e, path.display()))
    }

    /// Parse a skill catalog from RON text, validating every definition.
    pub fn parse(content: &str) -> LoadResult<SkillCatalog> {
        let data: SkillCatalogRon = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let catalog = SkillCatalog::new(data.skills)?;
        Ok(catalog)
    }
}
