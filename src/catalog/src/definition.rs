//! Achievement definition types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for an achievement definition.
///
/// Ids are authored externally (e.g. `"first_quiz"`) and must stay stable
/// across catalog edits, because user profiles key their unlocked set on
/// them forever.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementId(pub String);

impl AchievementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AchievementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AchievementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which stat counter an achievement's threshold is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionType {
    /// Learning modules completed.
    Modules,
    /// Quizzes completed.
    Quizzes,
    /// Activities submitted.
    Activities,
}

/// Whether a definition participates in rule evaluation.
///
/// Inactive definitions are never unlocked, even when their numeric
/// criterion is already met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementStatus {
    Active,
    Inactive,
}

/// An admin-authored achievement rule: reach `criterion_count` of the
/// `criterion` stat, earn `points` bonus XP, once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub criterion: CriterionType,
    pub criterion_count: u32,
    pub points: u32,
    pub status: AchievementStatus,
}

impl AchievementDefinition {
    pub fn new(
        id: impl Into<AchievementId>,
        name: impl Into<String>,
        description: impl Into<String>,
        criterion: CriterionType,
        criterion_count: u32,
        points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            criterion,
            criterion_count,
            points,
            status: AchievementStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == AchievementStatus::Active
    }

    /// A zero (or authoring-error) threshold can never be reached.
    pub fn is_satisfiable(&self) -> bool {
        self.criterion_count > 0
    }
}
