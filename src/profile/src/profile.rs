//! Per-user gamification profile: the aggregate every event mutates.

use catalog::{AchievementId, CriterionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use streak::StreakState;

/// XP needed per level tier.
pub const XP_PER_LEVEL: u64 = 100;

/// Level is a pure function of XP; it is never stored independently of a
/// fresh recomputation.
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL).map_or(u32::MAX, |tiers| tiers.saturating_add(1))
}

/// Monotonically increasing counters of completed actions, one per
/// criterion type. Each qualifying event adds exactly 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCounters {
    pub quizzes_completed: u32,
    pub modules_completed: u32,
    pub activities_completed: u32,
}

impl StatCounters {
    /// The counter an achievement criterion is compared against.
    pub fn get(&self, criterion: CriterionType) -> u32 {
        match criterion {
            CriterionType::Quizzes => self.quizzes_completed,
            CriterionType::Modules => self.modules_completed,
            CriterionType::Activities => self.activities_completed,
        }
    }

    pub fn increment(&mut self, criterion: CriterionType) {
        let counter = match criterion {
            CriterionType::Quizzes => &mut self.quizzes_completed,
            CriterionType::Modules => &mut self.modules_completed,
            CriterionType::Activities => &mut self.activities_completed,
        };
        *counter = counter.saturating_add(1);
    }
}

/// When an achievement was unlocked. Once recorded, never re-dated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRecord {
    pub unlocked_at: DateTime<Utc>,
}

/// The per-user aggregate root. Created lazily on a user's first event,
/// mutated exclusively through [`ProfileStore::commit_atomic`], never
/// deleted by this subsystem.
///
/// [`ProfileStore::commit_atomic`]: crate::store::ProfileStore::commit_atomic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub xp: u64,
    pub level: u32,
    pub stats: StatCounters,
    pub streak: Option<StreakState>,
    pub unlocked: BTreeMap<AchievementId, UnlockRecord>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            xp: 0,
            level: level_for_xp(0),
            stats: StatCounters::default(),
            streak: None,
            unlocked: BTreeMap::new(),
            updated_at: None,
        }
    }
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &AchievementId) -> bool {
        self.unlocked.contains_key(id)
    }

    /// Award XP and recompute the level in the same step, so the two can
    /// never drift apart within a commit.
    pub fn add_xp(&mut self, delta: u64) {
        self.xp = self.xp.saturating_add(delta);
        self.level = level_for_xp(self.xp);
    }

    /// Record an unlock. A second call for the same id keeps the original
    /// timestamp; unlock is a one-way, idempotent transition.
    pub fn record_unlock(&mut self, id: AchievementId, at: DateTime<Utc>) {
        self.unlocked
            .entry(id)
            .or_insert(UnlockRecord { unlocked_at: at });
    }
}
