//! Gamification engine
//!
//! Turns raw user actions (quiz completed, module completed, activity
//! submitted, daily login) into durable, consistent changes to a per-user
//! profile: XP, derived level, stat counters, login streak, and the
//! permanent unlocked-achievement set.

pub mod evaluator;
pub mod event;
pub mod processor;


pub use evaluator::evaluate;
pub use event::EventType;
pub use processor::{EventProcessor, StreakTouch};
