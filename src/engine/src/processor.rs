//! Event orchestration: one gamification event, end to end, atomically.

use crate::evaluator::evaluate;
use crate::event::EventType;
use catalog::{AchievementDefinition, CatalogSource};
use chrono::{NaiveDate, Utc};
use error::GamifyError;
use profile::ProfileStore;
use streak::next_streak;
use tracing::debug;

/// Outcome of a daily streak touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTouch {
    /// Whether the stored streak changed (first touch, increment, reset, or
    /// zero-count heal). Same-day re-logins leave it untouched.
    pub changed: bool,
    pub count: u32,
}

/// Orchestrates gamification events against a profile store and an
/// achievement catalog.
///
/// Each call is a short-lived request/response operation. All profile
/// mutations happen inside one [`ProfileStore::commit_atomic`] closure, so
/// two concurrent events for the same user (e.g. two browser tabs) cannot
/// both read the same counter value, both decide "unlock achievement X",
/// and both add its bonus XP.
pub struct EventProcessor<S, C> {
    store: S,
    catalog: C,
}

impl<S: ProfileStore, C: CatalogSource> EventProcessor<S, C> {
    pub fn new(store: S, catalog: C) -> Self {
        Self { store, catalog }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Record one completed event for `user_id`: bump the matching stat
    /// counter, unlock any newly satisfied achievements, and award
    /// `base_xp` plus the unlocked achievements' bonus points.
    ///
    /// Returns the achievements unlocked by this call, for UI notification.
    /// The list is derived fresh each call and not persisted separately.
    ///
    /// A catalog read failure degrades to "no new unlocks"; the stat
    /// increment and base XP still land. Only store failures
    /// (`ProfileReadFailure`, `CommitConflict`) propagate.
    pub fn process(
        &self,
        user_id: &str,
        event: EventType,
        base_xp: u32,
    ) -> Result<Vec<AchievementDefinition>, GamifyError> {
        // The catalog is read-only, so one snapshot serves every commit
        // attempt; retries re-evaluate it against freshly re-read stats.
        let definitions = self.catalog.load_active();

        let mut newly_unlocked: Vec<AchievementDefinition> = Vec::new();
        let committed = self.store.commit_atomic(user_id, &mut |prof| {
            prof.stats.increment(event.criterion());

            let satisfied: Vec<AchievementDefinition> =
                evaluate(&prof.stats, &definitions, &prof.unlocked)
                    .into_iter()
                    .cloned()
                    .collect();

            let bonus: u64 = satisfied.iter().map(|d| u64::from(d.points)).sum();
            prof.add_xp(u64::from(base_xp) + bonus);

            let now = Utc::now();
            for def in &satisfied {
                prof.record_unlock(def.id.clone(), now);
            }
            newly_unlocked = satisfied;
        })?;

        if !newly_unlocked.is_empty() {
            debug!(
                user_id,
                unlocked = newly_unlocked.len(),
                xp = committed.xp,
                level = committed.level,
                "achievements unlocked"
            );
        }
        Ok(newly_unlocked)
    }

    /// Advance the user's login streak to `today`.
    ///
    /// A distinct entry point from [`process`](Self::process): the session
    /// collaborator calls it once per user session/day, not per arbitrary
    /// event.
    pub fn touch_streak(
        &self,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<StreakTouch, GamifyError> {
        // An unchanged same-day re-login needs no commit at all; only write
        // (and re-stamp the profile) when the stored streak moves.
        let current = self.store.read(user_id)?;
        let preview = next_streak(current.streak.as_ref(), today);
        if !preview.changed {
            return Ok(StreakTouch {
                changed: false,
                count: preview.count,
            });
        }

        let mut touch = StreakTouch {
            changed: false,
            count: 0,
        };
        self.store.commit_atomic(user_id, &mut |prof| {
            // Recomputed against the committed base, which a concurrent
            // touch may have advanced past the preview.
            let update = next_streak(prof.streak.as_ref(), today);
            touch = StreakTouch {
                changed: update.changed,
                count: update.count,
            };
            if update.changed {
                prof.streak = Some(update.state());
            }
        })?;
        Ok(touch)
    }
}
