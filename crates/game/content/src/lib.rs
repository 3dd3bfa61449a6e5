//! Data-driven combat content and loaders.
//!
//! This crate houses static content and provides loaders for RON/TOML data:
//! - Skill catalogs (data-driven via RON)
//! - Combat configuration (data-driven via TOML)
//!
//! Definitions are shared read-only with every skill instance through the
//! [`SkillCatalog`]; nothing here is ever mutated by the simulation.
//!
//! The bundled data files under `data/` are embedded so tools can run without
//! a data directory.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{CatalogError, SkillCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, SkillCatalogLoader};

/// Bundled skill catalog (`data/skills.ron`).
pub const BUNDLED_SKILLS: &str = include_str!("../data/skills.ron");

/// Bundled combat configuration (`data/combat.toml`).
pub const BUNDLED_COMBAT_CONFIG: &str = include_str!("../data/combat.toml");
