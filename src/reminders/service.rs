/// Reminder check runs and behavior-triggered hooks
///
/// `run_scheduled_checks` is what the periodic worker calls: it walks every
/// user with settings, evaluates the scheduled reminder kinds, and logs
/// firings before rendering notifications. The firing log write is the
/// atomic check-and-insert that resolves the race between concurrent
/// polls - whichever tick inserts first delivers, the other sees `false`
/// and stays quiet.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ReminderKind, UserId};
use crate::engine::{
    daily_eligibility, event_eligibility, inactive_eligibility, reminder_message, ReminderConfig,
    ReminderDecision,
};
use crate::storage::PracticeStore;
use crate::ServiceError;

/// How a notification should be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationMethod {
    Browser,
    Email,
    Both,
}

impl NotificationMethod {
    /// Pick the method from the user's delivery toggles
    fn from_config(config: &ReminderConfig) -> Self {
        match (config.browser_notification, config.email_notification) {
            (true, true) => NotificationMethod::Both,
            (true, false) => NotificationMethod::Browser,
            _ => NotificationMethod::Email,
        }
    }
}

/// A rendered reminder ready for the delivery layer
///
/// The engine supplies the decision and the message template; transporting
/// the result (browser push, SMTP) is outside this crate.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub user_id: UserId,
    pub kind: ReminderKind,
    pub method: NotificationMethod,
    pub title: String,
    pub body: String,
}

impl Notification {
    fn render(user_id: &UserId, kind: ReminderKind, config: &ReminderConfig) -> Self {
        let (title, body) = reminder_message(kind);
        Self {
            user_id: user_id.clone(),
            kind,
            method: NotificationMethod::from_config(config),
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Evaluate the scheduled reminder kinds for every user
///
/// Called by the periodic worker with the current local time. Each user's
/// check is independent; a failure loading one user's data aborts the run
/// with an error rather than silently skipping users.
pub fn run_scheduled_checks<S: PracticeStore>(
    store: &S,
    now: NaiveDateTime,
) -> Result<Vec<Notification>, ServiceError> {
    let mut notifications = Vec::new();

    let users = store.list_users_with_reminders()?;
    tracing::debug!("Checking scheduled reminders for {} users", users.len());

    for user_id in &users {
        let config = store.get_reminder_config(user_id)?;

        // Daily wall-clock reminder
        let last_fired = store.get_last_fired(user_id, ReminderKind::Daily)?;
        let decision = daily_eligibility(&config, user_id, now, last_fired);
        if let Some(notification) = fire(store, &config, &decision)? {
            notifications.push(notification);
        }

        // Inactivity reminder
        let last_fired = store.get_last_fired(user_id, ReminderKind::Inactive)?;
        let last_activity = store.last_activity_date(user_id)?;
        let decision = inactive_eligibility(&config, user_id, now, last_activity, last_fired);
        if let Some(notification) = fire(store, &config, &decision)? {
            notifications.push(notification);
        }
    }

    if !notifications.is_empty() {
        tracing::info!("Scheduled check produced {} notifications", notifications.len());
    }

    Ok(notifications)
}

/// Hook for "an action item was completed"
pub fn on_action_completed<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    now: NaiveDateTime,
) -> Result<Option<Notification>, ServiceError> {
    behavior_triggered(store, user_id, ReminderKind::AfterAction, now)
}

/// Hook for "a new action item was created"
pub fn on_action_created<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    now: NaiveDateTime,
) -> Result<Option<Notification>, ServiceError> {
    behavior_triggered(store, user_id, ReminderKind::AfterNewAction, now)
}

/// Shared path for the behavior-triggered reminder kinds
fn behavior_triggered<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    kind: ReminderKind,
    now: NaiveDateTime,
) -> Result<Option<Notification>, ServiceError> {
    let config = store.get_reminder_config(user_id)?;
    let last_fired = store.get_last_fired(user_id, kind)?;
    let decision = event_eligibility(&config, user_id, kind, now, last_fired);
    fire(store, &config, &decision)
}

/// Log the firing and render the notification if the decision says so
///
/// Returns `None` both when the decision is negative and when another tick
/// already logged the same dedup key.
fn fire<S: PracticeStore>(
    store: &S,
    config: &ReminderConfig,
    decision: &ReminderDecision,
) -> Result<Option<Notification>, ServiceError> {
    if !decision.should_fire {
        return Ok(None);
    }

    if !store.record_fired(&decision.dedup_key)? {
        tracing::debug!(
            "Reminder {} already fired today for user {}, skipping",
            decision.kind.as_str(),
            decision.dedup_key.user_id.to_string()
        );
        return Ok(None);
    }

    tracing::info!(
        "Fired {} reminder for user {}",
        decision.kind.as_str(),
        decision.dedup_key.user_id.to_string()
    );
    Ok(Some(Notification::render(
        &decision.dedup_key.user_id,
        decision.kind,
        config,
    )))
}
