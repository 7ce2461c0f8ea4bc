//! learn_quest: gamification engine for an educational platform.
//!
//! Students accumulate XP, level up, maintain login streaks, and unlock
//! achievements by completing quizzes, learning modules, and activities.
//! This crate re-exports the engine's public surface from its member
//! crates; see [`EventProcessor`] for the main entry points.

pub use catalog::{
    AchievementDefinition, AchievementId, AchievementStatus, CachedCatalog, CatalogSource,
    CriterionType, JsonCatalog, StaticCatalog,
};
pub use engine::{EventProcessor, EventType, StreakTouch, evaluate};
pub use error::GamifyError;
pub use profile::{
    FileProfileStore, MAX_COMMIT_RETRIES, MemoryProfileStore, ProfileStore, StatCounters,
    UnlockRecord, UserProfile, XP_PER_LEVEL, level_for_xp,
};
pub use streak::{StreakState, StreakUpdate, next_streak};
