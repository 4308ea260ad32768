/// EventRecord entity for dated practice outcomes
///
/// This module defines the EventRecord struct that represents a single dated
/// outcome logged against a tracked subject, with an optional rating and notes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Outcome, SubjectId};

/// One dated outcome log entry for a tracked subject
///
/// Each time a user logs how a practice went, the persistence layer creates
/// an EventRecord. The record is attributed to a calendar date, not a point
/// in time. At most one record may exist per `(subject_id, occurred_on)`;
/// same-day resubmission is rejected upstream, so the engine never has to
/// deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Which subject this event is for
    pub subject_id: SubjectId,
    /// Which calendar day the outcome is attributed to
    pub occurred_on: NaiveDate,
    /// How the practice went that day
    pub outcome: Outcome,
    /// Subjective rating from 1-5
    pub rating: Option<u8>,
    /// User's notes about this event
    pub notes: Option<String>,
}

impl EventRecord {
    /// Create a new event record with validation
    ///
    /// Validates the optional rating and notes. Date plausibility (no future
    /// dates, not absurdly old) is the intake layer's concern; the engine
    /// never consults a wall clock.
    pub fn new(
        subject_id: SubjectId,
        occurred_on: NaiveDate,
        outcome: Outcome,
        rating: Option<u8>,
        notes: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::validate_rating(&rating)?;
        Self::validate_notes(&notes)?;

        Ok(Self {
            subject_id,
            occurred_on,
            outcome,
            rating,
            notes,
        })
    }

    /// Create an event record from existing data (used when loading from database)
    ///
    /// This constructor assumes data is already validated and is mainly used
    /// by the storage layer when loading events from the database.
    pub fn from_existing(
        subject_id: SubjectId,
        occurred_on: NaiveDate,
        outcome: Outcome,
        rating: Option<u8>,
        notes: Option<String>,
    ) -> Self {
        Self {
            subject_id,
            occurred_on,
            outcome,
            rating,
            notes,
        }
    }

    /// Check if this event has a rating
    pub fn has_rating(&self) -> bool {
        self.rating.is_some()
    }

    /// Check if this event has non-empty notes
    pub fn has_notes(&self) -> bool {
        self.notes
            .as_ref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false)
    }

    /// Composite success score on a 0.0..=1.0 scale
    ///
    /// Blends 60% objective outcome with 40% subjective rating. A rating of
    /// 1 maps to 0.0 and a rating of 5 maps to 1.0; with no rating the
    /// objective score stands in for the subjective part.
    pub fn success_score(&self, partial_weight: f64) -> f64 {
        let objective = self.outcome.objective_score(partial_weight);
        let subjective = match self.rating {
            Some(rating) => f64::from(rating.saturating_sub(1)) / 4.0,
            None => objective,
        };
        objective * 0.6 + subjective * 0.4
    }

    // Validation helper methods

    /// Validate the optional rating (1-5)
    fn validate_rating(rating: &Option<u8>) -> Result<(), DomainError> {
        if let Some(value) = rating {
            if *value < 1 || *value > 5 {
                return Err(DomainError::InvalidValue {
                    message: "Rating must be between 1 and 5".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate the optional notes field
    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = notes {
            if text.len() > 500 {
                return Err(DomainError::InvalidValue {
                    message: "Notes cannot be longer than 500 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}
