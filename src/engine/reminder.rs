/// Reminder eligibility decisions
///
/// This module decides whether a reminder of a given kind should fire for a
/// user at a given moment. Per `(user, kind)` the lifecycle is
/// `Idle -> Eligible -> Fired -> Idle`, resetting at local midnight; the
/// engine realizes it as pure decision functions over the config, the clock
/// value passed in, and the date of the last logged firing.
///
/// Decisions are at-least-once: if the caller never logs a firing, the same
/// decision is offered again on the next poll. Effective at-most-once
/// delivery comes from the caller's atomic check-and-insert on the dedup
/// key, not from anything in here.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{ReminderKind, UserId};
use crate::engine::dates;

/// How close to the configured wall-clock time a poll must land, in minutes
pub const DAILY_TOLERANCE_MINUTES: i64 = 5;

/// Per-user reminder schedule configuration
///
/// `daily_time` is kept as the raw `HH:MM[:SS]` string the settings store
/// holds: a malformed value must degrade to "never eligible today" with a
/// logged warning rather than fail the whole check run, so parsing happens
/// at decision time. The weekday list is typed and ISO (Monday-first);
/// translating any stored Sunday-first encoding is the storage adapter's
/// job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Master switch for all reminders
    pub enabled: bool,
    /// Whether the scheduled daily reminder is on
    pub daily_reminder_enabled: bool,
    /// Wall-clock time of the daily reminder, `HH:MM` or `HH:MM:SS`
    pub daily_time: Option<String>,
    /// Weekdays the daily reminder is active on
    pub active_weekdays: Vec<Weekday>,
    /// Days without activity before the inactive reminder triggers
    pub inactivity_threshold_days: u32,
    /// Whether completing an action item triggers a reminder
    pub after_action_reminder: bool,
    /// Whether adding a new action item triggers a reminder
    pub after_new_action_reminder: bool,
    /// Whether to deliver via browser notification
    pub browser_notification: bool,
    /// Whether to deliver via email
    pub email_notification: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_reminder_enabled: false,
            daily_time: None,
            active_weekdays: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
                Weekday::Sun,
            ],
            inactivity_threshold_days: 3,
            after_action_reminder: true,
            after_new_action_reminder: true,
            browser_notification: true,
            email_notification: true,
        }
    }
}

/// Identifies "this reminder already fired today"
///
/// The caller must enforce uniqueness of this key atomically (unique
/// constraint or equivalent check-and-insert) before delivering; two
/// concurrent polls can both see an eligible state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    pub user_id: UserId,
    pub kind: ReminderKind,
    pub day: NaiveDate,
}

/// The engine's answer to "should this reminder fire now?"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDecision {
    /// Whether the caller should fire the reminder
    pub should_fire: bool,
    /// Which reminder kind the decision is about
    pub kind: ReminderKind,
    /// The key the caller must log before delivering
    pub dedup_key: DedupKey,
}

impl ReminderDecision {
    fn new(should_fire: bool, kind: ReminderKind, user_id: &UserId, day: NaiveDate) -> Self {
        Self {
            should_fire,
            kind,
            dedup_key: DedupKey {
                user_id: user_id.clone(),
                kind,
                day,
            },
        }
    }
}

/// Decide whether the scheduled daily reminder should fire
///
/// Eligible when reminders are on, the daily reminder is on, today's
/// weekday is active, the poll lands within the tolerance of the
/// configured time, and nothing fired today yet. A missing or malformed
/// `daily_time` makes the reminder silently ineligible for the day.
pub fn daily_eligibility(
    config: &ReminderConfig,
    user_id: &UserId,
    now: NaiveDateTime,
    last_fired: Option<NaiveDate>,
) -> ReminderDecision {
    let today = now.date();
    let kind = ReminderKind::Daily;

    if !config.enabled || !config.daily_reminder_enabled {
        return ReminderDecision::new(false, kind, user_id, today);
    }
    if !config.active_weekdays.contains(&today.weekday()) {
        return ReminderDecision::new(false, kind, user_id, today);
    }
    if fired_today(last_fired, today) {
        return ReminderDecision::new(false, kind, user_id, today);
    }

    let target = match config.daily_time.as_deref().and_then(parse_daily_time) {
        Some(time) => time,
        None => return ReminderDecision::new(false, kind, user_id, today),
    };

    let diff = (dates::minute_of_day(now.time()) - dates::minute_of_day(target)).abs();
    ReminderDecision::new(diff <= DAILY_TOLERANCE_MINUTES, kind, user_id, today)
}

/// Decide whether the inactivity reminder should fire
///
/// Eligible when reminders are on and the user has either never logged any
/// activity or last logged it strictly more than the threshold ago, and
/// nothing fired today yet.
pub fn inactive_eligibility(
    config: &ReminderConfig,
    user_id: &UserId,
    now: NaiveDateTime,
    last_activity: Option<NaiveDate>,
    last_fired: Option<NaiveDate>,
) -> ReminderDecision {
    let today = now.date();
    let kind = ReminderKind::Inactive;

    if !config.enabled {
        return ReminderDecision::new(false, kind, user_id, today);
    }
    if fired_today(last_fired, today) {
        return ReminderDecision::new(false, kind, user_id, today);
    }

    let threshold = today - chrono::Duration::days(i64::from(config.inactivity_threshold_days));
    let inactive = match last_activity {
        None => true,
        Some(last) => last < threshold,
    };

    ReminderDecision::new(inactive, kind, user_id, today)
}

/// Decide whether a behavior-triggered reminder should fire
///
/// `after_action` and `after_new_action` reminders are eligible the moment
/// the corresponding domain event happens; the only gates are the enabled
/// flags and the per-day dedup. Other kinds are never eligible through this
/// path.
pub fn event_eligibility(
    config: &ReminderConfig,
    user_id: &UserId,
    kind: ReminderKind,
    now: NaiveDateTime,
    last_fired: Option<NaiveDate>,
) -> ReminderDecision {
    let today = now.date();

    let toggled_on = match kind {
        ReminderKind::AfterAction => config.after_action_reminder,
        ReminderKind::AfterNewAction => config.after_new_action_reminder,
        ReminderKind::Daily | ReminderKind::Inactive => false,
    };

    let eligible = config.enabled && toggled_on && !fired_today(last_fired, today);
    ReminderDecision::new(eligible, kind, user_id, today)
}

/// Title and body for a reminder kind
///
/// The engine owns the template lookup; rendering into a transport
/// (browser notification, email) is the delivery layer's job.
pub fn reminder_message(kind: ReminderKind) -> (&'static str, &'static str) {
    match kind {
        ReminderKind::Daily => (
            "Daily practice reminder",
            "Time for today's practice. Log how it went!",
        ),
        ReminderKind::Inactive => (
            "Your practice misses you",
            "It has been a few days since your last log. Pick one small action and record it!",
        ),
        ReminderKind::AfterAction => (
            "Action completed",
            "Nice work completing an action item! Take a moment to reflect on how it went.",
        ),
        ReminderKind::AfterNewAction => (
            "New action added",
            "A new action item was added. Want to note your first thoughts on it?",
        ),
    }
}

/// Whether the last logged firing happened today
fn fired_today(last_fired: Option<NaiveDate>, today: NaiveDate) -> bool {
    last_fired == Some(today)
}

/// Parse a stored wall-clock time, accepting `HH:MM:SS` and `HH:MM`
///
/// A malformed value is logged and treated as absent; one broken schedule
/// must not take down the whole check run.
fn parse_daily_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| {
            tracing::warn!(daily_time = raw, "Ignoring malformed daily reminder time");
        })
        .ok()
}
