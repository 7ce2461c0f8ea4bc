//! Login streak calculation.
//!
//! A streak counts consecutive calendar days with at least one qualifying
//! session touch. The calculator is a pure, total function: it never fails,
//! including on anomalous inputs (backdated clocks, corrupted zero counts).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted streak state: the running count and the last day it was
/// touched. Dates are calendar days (already normalized to midnight by the
/// `NaiveDate` representation); callers must derive `today` in one agreed
/// time zone across all calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub count: u32,
    pub last_active_day: NaiveDate,
}

/// Result of advancing a streak to `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub count: u32,
    pub last_active_day: NaiveDate,
    /// Whether the stored state needs rewriting.
    pub changed: bool,
}

impl StreakUpdate {
    pub fn state(&self) -> StreakState {
        StreakState {
            count: self.count,
            last_active_day: self.last_active_day,
        }
    }
}

/// Advance a streak to `today`.
///
/// Transition table:
/// - no previous record: count 1, starts today
/// - gap of exactly one day: count + 1
/// - gap of more than one day: reset to 1
/// - same day: unchanged, except a corrupted zero count heals to 1
/// - negative gap (clock skew / backdated event): logged and handled like a
///   same-day touch; the count is never decremented or reset for skew
pub fn next_streak(previous: Option<&StreakState>, today: NaiveDate) -> StreakUpdate {
    let Some(prev) = previous else {
        return StreakUpdate {
            count: 1,
            last_active_day: today,
            changed: true,
        };
    };

    let gap_days = (today - prev.last_active_day).num_days();

    if gap_days < 0 {
        warn!(
            last_active_day = %prev.last_active_day,
            today = %today,
            "backdated streak touch, treating as same-day"
        );
    }

    if gap_days == 1 {
        StreakUpdate {
            count: prev.count.saturating_add(1),
            last_active_day: today,
            changed: true,
        }
    } else if gap_days > 1 {
        StreakUpdate {
            count: 1,
            last_active_day: today,
            changed: true,
        }
    } else if prev.count == 0 {
        // Same-day touch over a corrupted record: heal without moving the day.
        StreakUpdate {
            count: 1,
            last_active_day: prev.last_active_day,
            changed: true,
        }
    } else {
        StreakUpdate {
            count: prev.count,
            last_active_day: prev.last_active_day,
            changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn first_ever_touch_starts_at_one() {
        let today = day(2024, 3, 10);
        let update = next_streak(None, today);
        assert_eq!(update.count, 1);
        assert_eq!(update.last_active_day, today);
        assert!(update.changed);
    }

    #[test]
    fn consecutive_day_increments() {
        let prev = StreakState {
            count: 4,
            last_active_day: day(2024, 3, 10),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 11));
        assert_eq!(update.count, 5);
        assert_eq!(update.last_active_day, day(2024, 3, 11));
        assert!(update.changed);
    }

    #[test]
    fn gap_resets_to_one() {
        let prev = StreakState {
            count: 9,
            last_active_day: day(2024, 3, 10),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 13));
        assert_eq!(update.count, 1);
        assert!(update.changed);
    }

    #[test]
    fn same_day_is_a_noop() {
        let prev = StreakState {
            count: 3,
            last_active_day: day(2024, 3, 10),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 10));
        assert_eq!(update.count, 3);
        assert_eq!(update.last_active_day, day(2024, 3, 10));
        assert!(!update.changed);
    }

    #[test]
    fn same_day_heals_zero_count() {
        let prev = StreakState {
            count: 0,
            last_active_day: day(2024, 3, 10),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 10));
        assert_eq!(update.count, 1);
        assert!(update.changed);
    }

    #[test]
    fn backdated_touch_never_decrements() {
        let prev = StreakState {
            count: 7,
            last_active_day: day(2024, 3, 10),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 8));
        assert_eq!(update.count, 7);
        assert_eq!(update.last_active_day, day(2024, 3, 10));
        assert!(!update.changed);
    }

    #[test]
    fn month_boundary_counts_as_one_day() {
        let prev = StreakState {
            count: 2,
            last_active_day: day(2024, 2, 29),
        };
        let update = next_streak(Some(&prev), day(2024, 3, 1));
        assert_eq!(update.count, 3);
    }
}
