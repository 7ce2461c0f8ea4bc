//! User gamification profiles and their durable stores.
//!
//! The profile is the only shared mutable state in the engine. Every
//! mutation goes through [`ProfileStore::commit_atomic`], an optimistic
//! read-modify-write with bounded retries, so concurrent events for the
//! same user can never lose an update or double-award an unlock.

pub mod file_store;
pub mod profile;
pub mod store;

pub use file_store::FileProfileStore;
pub use profile::{StatCounters, UnlockRecord, UserProfile, XP_PER_LEVEL, level_for_xp};
pub use store::{MAX_COMMIT_RETRIES, MemoryProfileStore, ProfileStore};
