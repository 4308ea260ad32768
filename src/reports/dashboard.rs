/// Dashboard statistics read model
///
/// Builds the numbers the dashboard renders: totals and rates over a
/// requested window, per-subject streaks, a weekly trend line, and recent
/// daily activity. All date math is delegated to the engine.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::{DomainError, EventRecord, SubjectId, UserId};
use crate::engine::{streak, window, BucketWeights, Granularity, StreakResult, WindowBucket};
use crate::storage::PracticeStore;
use crate::ServiceError;

/// How many trailing days the recent-activity strip covers
const RECENT_ACTIVITY_DAYS: i64 = 7;

/// Streak numbers for one subject, labeled for display
#[derive(Debug, Clone, Serialize)]
pub struct SubjectStreak {
    pub subject_id: SubjectId,
    pub name: String,
    pub streak: StreakResult,
}

/// Everything the dashboard needs for one user and window
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    /// First day of the requested window
    pub period_start: NaiveDate,
    /// Last day of the requested window (the caller's "today")
    pub period_end: NaiveDate,
    /// Number of active subjects
    pub total_subjects: u32,
    /// Events logged inside the window
    pub total_events: u32,
    /// Weighted success rate over the window, 0.0..=1.0
    pub success_rate: f64,
    /// Mean of the 1-5 ratings inside the window, 0 when none were given
    pub average_rating: f64,
    /// Mean composite success score inside the window, 0.0..=1.0
    pub average_success_score: f64,
    /// Current and longest streak per active subject
    pub subject_streaks: Vec<SubjectStreak>,
    /// One bucket per ISO week in the window
    pub weekly_trend: Vec<WindowBucket>,
    /// One bucket per day over the trailing week
    pub recent_activity: Vec<WindowBucket>,
}

/// Build dashboard statistics for a user
///
/// `days` is the window length ending at `today`, minimum 1. The caller
/// passes `today` in; the engine never reads a clock.
pub fn stats<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    days: u32,
    today: NaiveDate,
) -> Result<DashboardStats, ServiceError> {
    let days = days.max(1);
    let period_start = today - Duration::days(i64::from(days) - 1);
    let weights = BucketWeights::default();

    let events = store.list_user_events(user_id, period_start, today)?;
    let total_events = events.len() as u32;

    let weighted_successes: f64 = events
        .iter()
        .map(|e| e.outcome.objective_score(weights.partial_weight))
        .sum();
    let success_rate = if total_events > 0 {
        (weighted_successes / f64::from(total_events)).min(1.0)
    } else {
        0.0
    };

    let ratings: Vec<f64> = events
        .iter()
        .filter_map(|e| e.rating.map(f64::from))
        .collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    let average_success_score = if total_events > 0 {
        events
            .iter()
            .map(|e| e.success_score(weights.partial_weight))
            .sum::<f64>()
            / f64::from(total_events)
    } else {
        0.0
    };

    let subjects = store.list_subjects(user_id, true)?;
    let mut subject_streaks = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        let success_dates = store.list_success_dates(&subject.id)?;
        subject_streaks.push(SubjectStreak {
            subject_id: subject.id.clone(),
            name: subject.name.clone(),
            streak: streak::compute(success_dates, today),
        });
    }

    let weekly_trend = window::aggregate(&events, period_start, today, Granularity::Weekly, &weights)?;

    // The daily strip is clamped to the requested window so short windows
    // do not report days the event query never covered.
    let recent_start = period_start.max(today - Duration::days(RECENT_ACTIVITY_DAYS - 1));
    let recent_activity =
        window::aggregate(&events, recent_start, today, Granularity::Daily, &weights)?;

    Ok(DashboardStats {
        period_start,
        period_end: today,
        total_subjects: subjects.len() as u32,
        total_events,
        success_rate,
        average_rating,
        average_success_score,
        subject_streaks,
        weekly_trend,
        recent_activity,
    })
}

/// One day of the practice calendar
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub events: Vec<EventRecord>,
}

/// Events of one calendar month grouped by day
///
/// Days without events are omitted, matching how the calendar view renders
/// only marked days.
pub fn calendar<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    year: i32,
    month: u32,
) -> Result<Vec<CalendarDay>, ServiceError> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        DomainError::InvalidDate(format!("Invalid calendar month: {}-{}", year, month))
    })?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // Safe for every valid first_day, so an error here is a bug upstream
    let last_day = next_month
        .map(|d| d - Duration::days(1))
        .ok_or_else(|| DomainError::InvalidDate(format!("Invalid calendar month: {}-{}", year, month)))?;

    let events = store.list_user_events(user_id, first_day, last_day)?;

    let mut days: Vec<CalendarDay> = Vec::new();
    for event in events {
        match days.last_mut() {
            Some(day) if day.date == event.occurred_on => day.events.push(event),
            _ => days.push(CalendarDay {
                date: event.occurred_on,
                events: vec![event],
            }),
        }
    }

    // list_user_events returns events ordered by date
    debug_assert!(days.windows(2).all(|w| w[0].date < w[1].date));

    Ok(days)
}
