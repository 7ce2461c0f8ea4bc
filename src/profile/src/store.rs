//! Profile store port and the in-memory implementation.

use crate::profile::UserProfile;
use chrono::Utc;
use error::GamifyError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// Retries before a commit gives up with [`GamifyError::CommitConflict`].
pub const MAX_COMMIT_RETRIES: usize = 5;

/// Durable per-user profile storage with an observably atomic
/// read-modify-write primitive.
pub trait ProfileStore {
    /// Current profile, or a zero-valued default when none exists yet.
    /// "Not found" is never an error.
    fn read(&self, user_id: &str) -> Result<UserProfile, GamifyError>;

    /// Apply `mutate` to the current stored value and write the result back
    /// so that no concurrent commit for the same user can be lost.
    ///
    /// On a write conflict the mutation is re-run against a freshly re-read
    /// base value; a stale mutation is never applied silently. After
    /// [`MAX_COMMIT_RETRIES`] failed attempts the commit fails with
    /// [`GamifyError::CommitConflict`] and the stored profile is exactly as
    /// it was. Every successful commit stamps `updated_at`.
    ///
    /// Returns the profile as committed.
    fn commit_atomic(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile, GamifyError>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for &S {
    fn read(&self, user_id: &str) -> Result<UserProfile, GamifyError> {
        (**self).read(user_id)
    }

    fn commit_atomic(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile, GamifyError> {
        (**self).commit_atomic(user_id, mutate)
    }
}

#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    profile: UserProfile,
}

/// In-memory store with compare-and-swap commits.
///
/// Handles are cheap clones sharing one map. The mutate closure runs with
/// the lock released, so another handle can commit in between the read and
/// the version check; that interleaving is what the retry loop absorbs.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    inner: Arc<Mutex<HashMap<String, Versioned>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Versioned>>, GamifyError> {
        self.inner.lock().map_err(|_| GamifyError::StorePoisoned)
    }

    fn snapshot(&self, user_id: &str) -> Result<(u64, UserProfile), GamifyError> {
        let map = self.lock()?;
        Ok(map
            .get(user_id)
            .map(|v| (v.version, v.profile.clone()))
            .unwrap_or_else(|| (0, UserProfile::default())))
    }
}

impl ProfileStore for MemoryProfileStore {
    fn read(&self, user_id: &str) -> Result<UserProfile, GamifyError> {
        Ok(self.snapshot(user_id)?.1)
    }

    fn commit_atomic(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile, GamifyError> {
        for attempt in 1..=MAX_COMMIT_RETRIES {
            let (version, mut profile) = self.snapshot(user_id)?;
            mutate(&mut profile);
            profile.updated_at = Some(Utc::now());

            let mut map = self.lock()?;
            let current = map.get(user_id).map(|v| v.version).unwrap_or(0);
            if current == version {
                map.insert(
                    user_id.to_string(),
                    Versioned {
                        version: version + 1,
                        profile: profile.clone(),
                    },
                );
                return Ok(profile);
            }
            drop(map);
            debug!(user_id, attempt, "commit conflict, retrying with fresh base");
        }
        Err(GamifyError::CommitConflict {
            attempts: MAX_COMMIT_RETRIES,
        })
    }
}
