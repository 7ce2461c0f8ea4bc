//! Achievement catalog: externally authored rule definitions and the read
//! ports the engine loads them through.
//!
//! The catalog is read-only from the engine's perspective. Definitions are
//! created and edited by an external authoring tool; the engine only ever
//! filters them to the active set and compares thresholds.

pub mod definition;
pub mod source;

pub use definition::{AchievementDefinition, AchievementId, AchievementStatus, CriterionType};
pub use source::{CachedCatalog, CatalogSource, JsonCatalog, StaticCatalog};
