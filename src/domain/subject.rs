/// Subject entity and target windows
///
/// This module defines the Subject struct that represents a tracked action or
/// habit the user logs practice events against, plus the optional target
/// window used for milestone detection.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, SubjectId, UserId};

/// A fixed-length commitment window attached to a subject
///
/// `target_reached` milestones fire purely on elapsed time: once `as_of`
/// reaches `start_date + duration_days` the window counts as reached, no
/// matter how many successes were actually logged inside it. That mirrors
/// the historical behavior of the tracker and is kept deliberately; callers
/// wanting a count-based notion of "reached" should aggregate the window
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetWindow {
    /// First day of the commitment window
    pub start_date: NaiveDate,
    /// Length of the window in days
    pub duration_days: u32,
}

impl TargetWindow {
    /// Create a target window with validation
    pub fn new(start_date: NaiveDate, duration_days: u32) -> Result<Self, DomainError> {
        if duration_days == 0 {
            return Err(DomainError::InvalidValue {
                message: "Target duration must be at least 1 day".to_string(),
            });
        }
        if duration_days > 365 {
            return Err(DomainError::InvalidValue {
                message: "Target duration cannot be longer than 365 days".to_string(),
            });
        }
        Ok(Self {
            start_date,
            duration_days,
        })
    }

    /// The day the window counts as elapsed
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.duration_days))
    }

    /// Whether the window has elapsed as of the given date
    pub fn is_elapsed(&self, as_of: NaiveDate) -> bool {
        as_of >= self.end_date()
    }
}

/// A subject represents an action item or habit the user tracks
///
/// This is the thing practice events hang off. The full lifecycle (AI
/// extraction from notes, status transitions, tags) lives outside the
/// engine; only what aggregation and reminders need is kept here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier for this subject
    pub id: SubjectId,
    /// Which user owns this subject
    pub user_id: UserId,
    /// Display name (e.g., "Write a daily review note")
    pub name: String,
    /// When this subject was created
    pub created_at: NaiveDate,
    /// Whether this subject is currently tracked (can be paused)
    pub is_active: bool,
    /// Optional commitment window for target milestones
    pub target: Option<TargetWindow>,
}

impl Subject {
    /// Create a new subject with validation
    pub fn new(
        user_id: UserId,
        name: String,
        created_at: NaiveDate,
        target: Option<TargetWindow>,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;

        Ok(Self {
            id: SubjectId::new(),
            user_id,
            name,
            created_at,
            is_active: true,
            target,
        })
    }

    /// Create a subject from existing data (used when loading from database)
    pub fn from_existing(
        id: SubjectId,
        user_id: UserId,
        name: String,
        created_at: NaiveDate,
        is_active: bool,
        target: Option<TargetWindow>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            created_at,
            is_active,
            target,
        }
    }

    /// Validate a subject name
    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidName(
                "Subject name cannot be empty".to_string(),
            ));
        }
        if name.len() > 255 {
            return Err(DomainError::InvalidName(
                "Subject name cannot be longer than 255 characters".to_string(),
            ));
        }
        Ok(())
    }
}
