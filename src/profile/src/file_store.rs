//! File-backed profile store.
//!
//! One bincode record per user under a store directory. Writes go through a
//! temp file followed by an atomic rename, so a crashed commit never leaves
//! a half-written record behind. Commits are optimistic: the record carries
//! a version, and the write is abandoned and retried whenever the version
//! on disk moved underneath the mutation.

use crate::profile::UserProfile;
use crate::store::{MAX_COMMIT_RETRIES, ProfileStore};
use anyhow::Context;
use bincode::config;
use chrono::Utc;
use error::GamifyError;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Disambiguates temp files of concurrent writers in one process.
static COMMIT_SEQ: AtomicU64 = AtomicU64::new(0);

/// On-disk record: the profile plus its commit version.
#[derive(Debug, Serialize, Deserialize)]
struct StoredProfile {
    version: u64,
    profile: UserProfile,
}

/// Profile store keeping one file per user in a directory.
///
/// Multiple store instances (or processes) may point at the same directory:
/// each user has a lock file, and the commit's version check, temp write,
/// and rename all happen under an exclusive advisory lock on it.
pub struct FileProfileStore {
    dir: PathBuf,
}

impl FileProfileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, GamifyError> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// User ids double as file names, so only filesystem-safe ids are
    /// accepted.
    fn validate_user_id(user_id: &str) -> Result<(), GamifyError> {
        let ok = !user_id.is_empty()
            && user_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if ok {
            Ok(())
        } else {
            Err(GamifyError::InvalidUserId(user_id.to_string()))
        }
    }

    fn profile_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{user_id}.profile"))
    }

    /// Take the per-user exclusive lock (blocking). The lock file is
    /// separate from the profile file so the rename never invalidates the
    /// locked handle; the lock releases when the returned handle drops.
    fn lock_user(&self, user_id: &str) -> Result<fs::File, GamifyError> {
        let lock_path = self.dir.join(format!("{user_id}.lock"));
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)?;
        lock_file.lock_exclusive()?;
        Ok(lock_file)
    }

    fn read_record(&self, user_id: &str) -> Result<Option<StoredProfile>, GamifyError> {
        let path = self.profile_path(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read profile file: {:?}", path))?;
        let (record, _) = bincode::serde::decode_from_slice(&bytes, config::standard())?;
        Ok(Some(record))
    }

    fn write_record(
        &self,
        user_id: &str,
        _lock: &fs::File,
        record: &StoredProfile,
    ) -> Result<(), GamifyError> {
        let path = self.profile_path(user_id);
        // Unique per writer: the lock already serializes cooperating
        // writers, but a shared temp name would let a non-cooperating one
        // truncate our bytes mid-commit.
        let temp_path = self.dir.join(format!(
            "{user_id}.tmp-{}-{}",
            std::process::id(),
            COMMIT_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        let mut file = fs::File::create(&temp_path)?;
        let encoded = bincode::serde::encode_to_vec(record, config::standard())?;
        file.write_all(&encoded)?;
        file.flush()?;
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl ProfileStore for FileProfileStore {
    fn read(&self, user_id: &str) -> Result<UserProfile, GamifyError> {
        Self::validate_user_id(user_id)?;
        Ok(self
            .read_record(user_id)?
            .map(|r| r.profile)
            .unwrap_or_default())
    }

    fn commit_atomic(
        &self,
        user_id: &str,
        mutate: &mut dyn FnMut(&mut UserProfile),
    ) -> Result<UserProfile, GamifyError> {
        Self::validate_user_id(user_id)?;

        for attempt in 1..=MAX_COMMIT_RETRIES {
            let (version, mut profile) = match self.read_record(user_id)? {
                Some(record) => (record.version, record.profile),
                None => (0, UserProfile::default()),
            };
            mutate(&mut profile);
            profile.updated_at = Some(Utc::now());

            let lock = self.lock_user(user_id)?;
            let current = self.read_record(user_id)?.map(|r| r.version).unwrap_or(0);
            if current == version {
                let record = StoredProfile {
                    version: version + 1,
                    profile: profile.clone(),
                };
                self.write_record(user_id, &lock, &record)?;
                return Ok(profile);
            }
            drop(lock);
            debug!(user_id, attempt, "commit conflict, retrying with fresh base");
        }
        Err(GamifyError::CommitConflict {
            attempts: MAX_COMMIT_RETRIES,
        })
    }
}
