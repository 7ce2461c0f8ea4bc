//! Error taxonomy for the gamification engine.
//!
//! Only I/O-touching operations (profile reads, atomic commits) surface
//! errors to callers. Catalog read failures are absorbed by the catalog
//! crate itself, and the pure calculators never fail.

use bincode::error::{DecodeError, EncodeError};
use thiserror::Error;

/// Errors the gamification engine can surface to its callers.
#[derive(Debug, Error)]
pub enum GamifyError {
    /// Profile store unreachable or unreadable; no mutation was attempted.
    #[error("Profile read failure: {0}")]
    ProfileReadFailure(#[from] anyhow::Error),

    /// Optimistic-concurrency retries exhausted; the caller may retry the
    /// whole event.
    #[error("Commit conflict after {attempts} attempts")]
    CommitConflict { attempts: usize },

    /// User id contains characters the store cannot key on.
    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    /// Underlying storage I/O error.
    #[error("Storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// Stored profile record could not be encoded.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored profile record could not be decoded.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Stored profile record is structurally unusable.
    #[error("Corrupted profile record")]
    CorruptedProfile,

    /// In-process store lock was poisoned by a panicking writer.
    #[error("Profile store lock poisoned")]
    StorePoisoned,
}

impl From<DecodeError> for GamifyError {
    fn from(err: DecodeError) -> Self {
        // A decode failure on a profile file almost always means the record
        // was truncated or overwritten mid-write.
        if err.to_string().contains("invalid utf-8 sequence") {
            GamifyError::CorruptedProfile
        } else {
            GamifyError::DeserializationError(err.to_string())
        }
    }
}

impl From<EncodeError> for GamifyError {
    fn from(err: EncodeError) -> Self {
        GamifyError::SerializationError(err.to_string())
    }
}
