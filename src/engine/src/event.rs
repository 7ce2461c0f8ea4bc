//! Gamification event types

use catalog::CriterionType;
use serde::{Deserialize, Serialize};

/// A completed user action the engine turns into profile mutations.
///
/// Callers invoke the engine only after they have independently verified
/// the action is complete (e.g. a quiz submission handler has already
/// scored the attempt and decided the base XP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    QuizComplete,
    ModuleComplete,
    ActivitySent,
}

impl EventType {
    /// The stat counter this event increments, which is also the criterion
    /// achievements are evaluated against.
    pub fn criterion(self) -> CriterionType {
        match self {
            EventType::QuizComplete => CriterionType::Quizzes,
            EventType::ModuleComplete => CriterionType::Modules,
            EventType::ActivitySent => CriterionType::Activities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_onto_criteria() {
        assert_eq!(EventType::QuizComplete.criterion(), CriterionType::Quizzes);
        assert_eq!(EventType::ModuleComplete.criterion(), CriterionType::Modules);
        assert_eq!(
            EventType::ActivitySent.criterion(),
            CriterionType::Activities
        );
    }

    #[test]
    fn snake_case_wire_tags() {
        assert_eq!(
            serde_json::to_string(&EventType::QuizComplete).expect("serialize"),
            "\"quiz_complete\""
        );
    }
}
