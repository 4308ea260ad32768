/// Activity aggregation and reminder-eligibility engine
///
/// This module holds the analytical core: streak calculation, windowed
/// aggregation, milestone detection, and reminder eligibility. Every
/// function here is pure and synchronous - no I/O, no shared state, no
/// clock reads. Callers fetch events and configuration from storage, pass
/// them in together with the current time, and get typed results back.

pub mod dates;
pub mod milestone;
pub mod reminder;
pub mod streak;
pub mod window;

// Re-export public types for easy access
pub use milestone::{detect, Milestone, MilestoneKind, WEEK_STREAK_DAYS};
pub use reminder::{
    daily_eligibility, event_eligibility, inactive_eligibility, reminder_message, DedupKey,
    ReminderConfig, ReminderDecision, DAILY_TOLERANCE_MINUTES,
};
pub use streak::StreakResult;
pub use window::{aggregate, BucketWeights, Granularity, PeriodKey, WindowBucket};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during engine operations
///
/// Engine functions are total over well-typed data; the only failure is a
/// caller handing over a nonsensical request. Anything else that goes wrong
/// in here is a bug, not a runtime condition.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
