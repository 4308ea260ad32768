/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like Outcome, ReminderKind, and
/// the ID newtypes that are used by Subject, EventRecord, and the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tracked subject (an action or habit)
///
/// This is a wrapper around UUID to provide type safety - you can't accidentally
/// pass a subject ID where a user ID is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub Uuid);

impl SubjectId {
    /// Generate a new random subject ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a subject ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for a user
///
/// Similar to SubjectId but for the owner of subjects and reminder settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a user ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Convert to string representation
    pub fn to_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// The outcome of one dated practice event
///
/// `Partial` is a half-way outcome; how much it counts toward success rates
/// is an explicit weight on the aggregation side, not a property of the
/// outcome itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The practice was carried out as intended
    Success,
    /// The practice was attempted but did not work out
    Fail,
    /// The practice was deliberately skipped that day
    Skipped,
    /// The practice was partly carried out
    Partial,
}

impl Outcome {
    /// Stable string form used by the storage layer
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Fail => "fail",
            Outcome::Skipped => "skipped",
            Outcome::Partial => "partial",
        }
    }

    /// Parse the storage string form back into an outcome
    pub fn parse(s: &str) -> Option<Outcome> {
        match s {
            "success" => Some(Outcome::Success),
            "fail" => Some(Outcome::Fail),
            "skipped" => Some(Outcome::Skipped),
            "partial" => Some(Outcome::Partial),
            _ => None,
        }
    }

    /// Objective score of this outcome on a 0.0..=1.0 scale
    ///
    /// Success counts as 1.0, partial counts as the given weight, and fail
    /// and skipped count as 0.0. The partial weight is configurable because
    /// the data model gives no single authoritative semantic for it.
    pub fn objective_score(&self, partial_weight: f64) -> f64 {
        match self {
            Outcome::Success => 1.0,
            Outcome::Partial => partial_weight,
            Outcome::Fail | Outcome::Skipped => 0.0,
        }
    }

    /// Whether this outcome counts as a full success
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

/// The kinds of reminders the eligibility engine can decide on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Scheduled wall-clock reminder on active weekdays
    Daily,
    /// Triggered when the user has not logged anything for a while
    Inactive,
    /// Triggered right after an action item was completed
    AfterAction,
    /// Triggered right after a new action item was created
    AfterNewAction,
}

impl ReminderKind {
    /// Stable string form used by the reminder log and dedup key
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderKind::Daily => "daily",
            ReminderKind::Inactive => "inactive",
            ReminderKind::AfterAction => "after_action",
            ReminderKind::AfterNewAction => "after_new_action",
        }
    }

    /// Parse the storage string form back into a kind
    pub fn parse(s: &str) -> Option<ReminderKind> {
        match s {
            "daily" => Some(ReminderKind::Daily),
            "inactive" => Some(ReminderKind::Inactive),
            "after_action" => Some(ReminderKind::AfterAction),
            "after_new_action" => Some(ReminderKind::AfterNewAction),
            _ => None,
        }
    }
}
