/// Insight generation from recent practice patterns
///
/// Produces the short observations and suggestions the dashboard shows:
/// practice frequency, success rate, and streak health over the last 30
/// days. Thresholds follow the historical product behavior.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::UserId;
use crate::engine::streak;
use crate::storage::PracticeStore;
use crate::ServiceError;

/// Window the insight rules look at
const INSIGHT_WINDOW_DAYS: i64 = 30;

/// Severity of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

/// One observation with a suggestion attached
#[derive(Debug, Clone, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    pub suggestion: String,
}

/// Generate insights for a user as of a given day
pub fn generate<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    today: NaiveDate,
) -> Result<Vec<Insight>, ServiceError> {
    let mut insights = Vec::new();

    let window_start = today - Duration::days(INSIGHT_WINDOW_DAYS - 1);
    let events = store.list_user_events(user_id, window_start, today)?;
    let total = events.len();

    // Practice frequency over the window
    if total < 5 {
        insights.push(Insight {
            kind: InsightKind::Info,
            title: "Practice frequency is low".to_string(),
            message: format!(
                "You logged {} practice events in the last 30 days.",
                total
            ),
            suggestion: "Try to log at least one practice a day, even a small one.".to_string(),
        });
    } else if total > 20 {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Practice frequency is high".to_string(),
            message: format!(
                "You logged {} practice events in the last 30 days. Well done!",
                total
            ),
            suggestion: "Keep this rhythm going; it is how habits stick.".to_string(),
        });
    }

    // Success rate over the window
    if total > 0 {
        let successes = events.iter().filter(|e| e.outcome.is_success()).count();
        let rate = successes as f64 / total as f64;

        if rate < 0.5 {
            insights.push(Insight {
                kind: InsightKind::Warning,
                title: "Success rate is low".to_string(),
                message: format!(
                    "Your practice success rate is {:.0}%. The actions may be too ambitious.",
                    rate * 100.0
                ),
                suggestion: "Break actions into smaller steps or lower their frequency."
                    .to_string(),
            });
        } else if rate > 0.8 {
            insights.push(Insight {
                kind: InsightKind::Success,
                title: "Success rate is high".to_string(),
                message: format!("Your practice success rate is {:.0}%. Excellent!", rate * 100.0),
                suggestion: "Consider taking on a more challenging action.".to_string(),
            });
        }
    }

    // Streak health across active subjects
    let subjects = store.list_subjects(user_id, true)?;
    let mut best_current: u32 = 0;
    let mut best_name = String::new();
    for subject in &subjects {
        let dates = store.list_success_dates(&subject.id)?;
        let result = streak::compute(dates, today);
        if result.current_run > best_current {
            best_current = result.current_run;
            best_name = subject.name.clone();
        }
    }
    if best_current >= 7 {
        insights.push(Insight {
            kind: InsightKind::Success,
            title: "Streak going strong".to_string(),
            message: format!(
                "\"{}\" is on a {}-day streak.",
                best_name, best_current
            ),
            suggestion: "Protect the streak: schedule tomorrow's practice now.".to_string(),
        });
    }

    Ok(insights)
}
