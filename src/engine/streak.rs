/// Consecutive-day streak calculation
///
/// This module computes longest and current runs of calendar-consecutive
/// success dates. It is the single home for streak math; dashboards,
/// milestone detection, and insight generation all call into it instead of
/// re-deriving their own date arithmetic.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::engine::dates;

/// Derived streak numbers for one subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Greatest number of calendar-consecutive success dates ever
    pub longest_run: u32,
    /// Consecutive success dates ending at "today" or "yesterday"
    ///
    /// The one-day tolerance keeps a not-yet-logged today from resetting
    /// progress. Zero once the last success is more than one day in the
    /// past.
    pub current_run: u32,
}

impl StreakResult {
    /// The zero-valued result for an empty history
    pub fn empty() -> Self {
        Self {
            longest_run: 0,
            current_run: 0,
        }
    }
}

/// Compute streaks from a set of success dates
///
/// Input dates need not be sorted or deduplicated; they are treated as a
/// set. Pure function of its arguments - `as_of` is always passed in, never
/// read from a clock.
pub fn compute<I>(success_dates: I, as_of: NaiveDate) -> StreakResult
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = success_dates.into_iter().collect();

    if dates.is_empty() {
        return StreakResult::empty();
    }

    let mut longest_run: u32 = 0;
    let mut run: u32 = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in &dates {
        run = match prev {
            Some(p) if dates::is_next_day(p, date) => run + 1,
            _ => 1,
        };
        longest_run = longest_run.max(run);
        prev = Some(date);
    }

    // `run` is now the length of the run ending at the latest date. It only
    // counts as current if that date is as_of or the day before.
    let last = *dates.iter().next_back().unwrap();
    let current_run = if as_of - last <= Duration::days(1) && last <= as_of {
        run
    } else {
        0
    };

    StreakResult {
        longest_run,
        current_run,
    }
}
