//! Achievement rule evaluation.

use catalog::{AchievementDefinition, AchievementId};
use profile::{StatCounters, UnlockRecord};
use std::collections::BTreeMap;

/// Compare the updated stat counters against catalog thresholds and return
/// the definitions newly satisfied by this state.
///
/// Pure and total: inactive definitions, unsatisfiable (zero) thresholds,
/// and already-unlocked ids are skipped. Output preserves catalog order, so
/// the result is deterministic for a given input.
pub fn evaluate<'a>(
    stats: &StatCounters,
    definitions: &'a [AchievementDefinition],
    unlocked: &BTreeMap<AchievementId, UnlockRecord>,
) -> Vec<&'a AchievementDefinition> {
    definitions
        .iter()
        .filter(|def| def.is_active())
        .filter(|def| def.is_satisfiable())
        .filter(|def| !unlocked.contains_key(&def.id))
        .filter(|def| stats.get(def.criterion) >= def.criterion_count)
        .collect()
}
