//! Name-indexed collection of validated skill definitions.

use std::sync::Arc;

use realm_core::{DefinitionError, SkillDefinition};

/// Errors raised while assembling a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate skill definition '{0}'")]
    Duplicate(String),

    #[error(transparent)]
    Invalid(#[from] DefinitionError),
}

/// Validated skill definitions in authoring order.
#[derive(Clone, Debug, Default)]
pub struct SkillCatalog {
    skills: Vec<Arc<SkillDefinition>>,
}

impl SkillCatalog {
    /// Validates every definition and rejects duplicate names.
    pub fn new(definitions: Vec<SkillDefinition>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for definition in definitions {
            catalog.insert(definition)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, definition: SkillDefinition) -> Result<(), CatalogError> {
        definition.validate()?;
        if self.get(&definition.name).is_some() {
            return Err(CatalogError::Duplicate(definition.name));
        }
        self.skills.push(Arc::new(definition));
        Ok(())
    }

    /// Shared definition for `name`.
    pub fn get(&self, name: &str) -> Option<Arc<SkillDefinition>> {
        self.skills.iter().find(|d| d.name == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SkillDefinition>> {
        self.skills.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_names() {
        let defs = vec![
            SkillDefinition::new("Dash", 3, 2.0, 6.0),
            SkillDefinition::new("Dash", 4, 1.0, 3.0),
        ];
        assert!(matches!(
            SkillCatalog::new(defs),
            Err(CatalogError::Duplicate(name)) if name == "Dash"
        ));
    }

    #[test]
    fn rejects_invalid_definition() {
        let defs = vec![SkillDefinition::new("Broken", 0, 2.0, 6.0)];
        assert!(matches!(SkillCatalog::new(defs), Err(CatalogError::Invalid(_))));
    }

    #[test]
    fn lookup_shares_definition() {
        let catalog = SkillCatalog::new(vec![SkillDefinition::new("Dash", 3, 2.0, 6.0)]).unwrap();
        let a = catalog.get("Dash").unwrap();
        let b = catalog.get("Dash").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(catalog.get("Blink").is_none());
    }
}
