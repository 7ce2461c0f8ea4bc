//! Catalog read ports and their implementations.

use crate::definition::{AchievementDefinition, AchievementStatus};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Read port for the achievement catalog.
///
/// `load_active` is deliberately infallible: a catalog read failure must
/// degrade event processing to "no new unlocks this call" rather than
/// fail an unrelated stat increment, so implementations absorb errors
/// (with a logged warning) and return an empty list.
pub trait CatalogSource {
    /// All definitions with `status == active`, in catalog order.
    fn load_active(&self) -> Vec<AchievementDefinition>;
}

/// Fixed in-memory catalog, for tests and embedded defaults.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    definitions: Vec<AchievementDefinition>,
}

impl StaticCatalog {
    pub fn new(definitions: Vec<AchievementDefinition>) -> Self {
        Self { definitions }
    }

    /// Every definition regardless of status, for UI collaborators that
    /// render the full list with lock state.
    pub fn load_all(&self) -> Vec<AchievementDefinition> {
        self.definitions.clone()
    }
}

impl CatalogSource for StaticCatalog {
    fn load_active(&self) -> Vec<AchievementDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.is_active())
            .cloned()
            .collect()
    }
}

/// Catalog backed by an externally authored JSON file (an array of
/// definitions). Reads the file on every call; freshness is the caller's
/// concern (wrap in [`CachedCatalog`] to bound re-reads).
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_definitions(&self) -> Result<Vec<AchievementDefinition>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog file: {:?}", self.path))?;
        let definitions: Vec<AchievementDefinition> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file: {:?}", self.path))?;
        Ok(definitions)
    }

    /// Every definition regardless of status. Errors are absorbed the same
    /// way as in `load_active`.
    pub fn load_all(&self) -> Vec<AchievementDefinition> {
        match self.read_definitions() {
            Ok(definitions) => definitions,
            Err(err) => {
                warn!(path = ?self.path, error = %err, "catalog unavailable, treating as empty");
                Vec::new()
            }
        }
    }
}

impl CatalogSource for JsonCatalog {
    fn load_active(&self) -> Vec<AchievementDefinition> {
        self.load_all()
            .into_iter()
            .filter(|d| d.status == AchievementStatus::Active)
            .collect()
    }
}

/// Time-boxed cache around another catalog source.
///
/// The orchestrator picks the TTL; within it, `load_active` serves the
/// cached list without touching the inner source. There is no push-based
/// invalidation, so callers needing freshness choose a smaller TTL.
pub struct CachedCatalog<C> {
    inner: C,
    ttl: Duration,
    cached: Mutex<Option<(Instant, Vec<AchievementDefinition>)>>,
}

impl<C: CatalogSource> CachedCatalog<C> {
    pub fn new(inner: C, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cached: Mutex::new(None),
        }
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Drop the cached list so the next read hits the inner source.
    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.cached.lock() {
            *slot = None;
        }
    }
}

impl<C: CatalogSource> CatalogSource for CachedCatalog<C> {
    fn load_active(&self) -> Vec<AchievementDefinition> {
        let mut slot = match self.cached.lock() {
            Ok(slot) => slot,
            // A poisoned cache lock only costs us the cache, not the read.
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some((at, definitions)) = slot.as_ref() {
            if at.elapsed() < self.ttl {
                return definitions.clone();
            }
        }
        let fresh = self.inner.load_active();
        *slot = Some((Instant::now(), fresh.clone()));
        fresh
    }
}

impl<C: CatalogSource + ?Sized> CatalogSource for &C {
    fn load_active(&self) -> Vec<AchievementDefinition> {
        (**self).load_active()
    }
}
