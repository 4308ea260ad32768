/// Milestone detection over a subject's full event history
///
/// This module scans a subject's history and emits discrete achievement
/// facts. Detection is recomputed fresh on every call and is idempotent;
/// whether a milestone has already been shown or persisted is the caller's
/// bookkeeping, not the detector's.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EventRecord, Subject, SubjectId};
use crate::engine::dates;

/// Number of consecutive success days that make a week streak
pub const WEEK_STREAK_DAYS: u32 = 7;

/// The kinds of milestones the detector can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    /// The first successful practice ever logged for a subject
    FirstSuccess,
    /// Seven calendar-consecutive success days reached for the first time
    WeekStreak,
    /// The subject's target window has elapsed
    TargetReached,
}

impl MilestoneKind {
    /// Stable string form used by callers that persist milestones
    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneKind::FirstSuccess => "first_success",
            MilestoneKind::WeekStreak => "week_streak",
            MilestoneKind::TargetReached => "target_reached",
        }
    }
}

/// A discrete achievement fact derived from history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Which subject achieved it
    pub subject_id: SubjectId,
    /// What was achieved
    pub kind: MilestoneKind,
    /// The day the achievement is attributed to
    pub achieved_on: NaiveDate,
    /// Human-readable description for display
    pub description: String,
}

/// Detect all milestones for one subject as of a given date
///
/// `history` is the subject's full event history in any order. The target
/// window, if any, comes from the subject itself. Calling this twice on the
/// same inputs yields the same milestones.
///
/// Note that `target_reached` fires purely on elapsed time (see
/// [`crate::domain::TargetWindow`]); a window with zero logged successes
/// still counts as reached once it has run out.
pub fn detect(subject: &Subject, history: &[EventRecord], as_of: NaiveDate) -> Vec<Milestone> {
    let mut milestones = Vec::new();

    let success_dates: BTreeSet<NaiveDate> = history
        .iter()
        .filter(|e| e.outcome.is_success() && e.occurred_on <= as_of)
        .map(|e| e.occurred_on)
        .collect();

    if let Some(first) = success_dates.iter().next() {
        milestones.push(Milestone {
            subject_id: subject.id.clone(),
            kind: MilestoneKind::FirstSuccess,
            achieved_on: *first,
            description: format!("First successful practice of \"{}\"", subject.name),
        });
    }

    if let Some(seventh) = week_streak_date(&success_dates) {
        milestones.push(Milestone {
            subject_id: subject.id.clone(),
            kind: MilestoneKind::WeekStreak,
            achieved_on: seventh,
            description: format!(
                "{} consecutive days of \"{}\"",
                WEEK_STREAK_DAYS, subject.name
            ),
        });
    }

    if let Some(target) = &subject.target {
        if target.is_elapsed(as_of) {
            milestones.push(Milestone {
                subject_id: subject.id.clone(),
                kind: MilestoneKind::TargetReached,
                achieved_on: target.end_date(),
                description: format!(
                    "Target window of {} days for \"{}\" has elapsed",
                    target.duration_days, subject.name
                ),
            });
        }
    }

    milestones
}

/// The date the streak first reached `WEEK_STREAK_DAYS`, if it ever did
fn week_streak_date(success_dates: &BTreeSet<NaiveDate>) -> Option<NaiveDate> {
    let mut run: u32 = 0;
    let mut prev: Option<NaiveDate> = None;

    for &date in success_dates {
        run = match prev {
            Some(p) if dates::is_next_day(p, date) => run + 1,
            _ => 1,
        };
        if run == WEEK_STREAK_DAYS {
            return Some(date);
        }
        prev = Some(date);
    }

    None
}
