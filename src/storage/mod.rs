/// Storage layer for persisting practice data
///
/// This module handles all database operations using SQLite. It is the
/// persistence collaborator of the engine: it supplies event records and
/// reminder configuration, and consumes firing logs. The engine itself
/// never touches a connection.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{EventRecord, ReminderKind, Subject, SubjectId, UserId};
use crate::engine::{DedupKey, ReminderConfig};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Subject not found: {subject_id}")]
    SubjectNotFound { subject_id: String },

    #[error("Duplicate event: subject {subject_id} already has a record for {date}")]
    DuplicateEvent { subject_id: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface the engine's callers depend on
///
/// This trait allows swapping SQLite for another database while keeping the
/// report and reminder layers unchanged. Every method is a plain
/// synchronous call; scheduling and delivery live elsewhere.
pub trait PracticeStore {
    /// Create a new tracked subject
    fn create_subject(&self, subject: &Subject) -> Result<(), StorageError>;

    /// Get a subject by ID
    fn get_subject(&self, subject_id: &SubjectId) -> Result<Subject, StorageError>;

    /// List a user's subjects, optionally only active ones
    fn list_subjects(&self, user_id: &UserId, active_only: bool)
        -> Result<Vec<Subject>, StorageError>;

    /// Record a practice event, rejecting a same-day duplicate
    ///
    /// The unique constraint on `(subject_id, occurred_on)` is what upholds
    /// the engine's uniqueness invariant; a violation surfaces as
    /// `StorageError::DuplicateEvent`.
    fn record_event(&self, event: &EventRecord) -> Result<(), StorageError>;

    /// All events for a subject, ascending by date
    fn list_events(&self, subject_id: &SubjectId) -> Result<Vec<EventRecord>, StorageError>;

    /// All dates a subject's outcome was a success
    fn list_success_dates(
        &self,
        subject_id: &SubjectId,
    ) -> Result<BTreeSet<NaiveDate>, StorageError>;

    /// All events across a user's subjects within an inclusive date range
    fn list_user_events(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EventRecord>, StorageError>;

    /// The most recent date the user logged any event, if ever
    fn last_activity_date(&self, user_id: &UserId) -> Result<Option<NaiveDate>, StorageError>;

    /// Get the user's reminder configuration, creating defaults if absent
    fn get_reminder_config(&self, user_id: &UserId) -> Result<ReminderConfig, StorageError>;

    /// Store the user's reminder configuration
    fn put_reminder_config(
        &self,
        user_id: &UserId,
        config: &ReminderConfig,
    ) -> Result<(), StorageError>;

    /// Users that have reminder settings stored
    fn list_users_with_reminders(&self) -> Result<Vec<UserId>, StorageError>;

    /// The day a reminder of this kind last fired for the user, if ever
    fn get_last_fired(
        &self,
        user_id: &UserId,
        kind: ReminderKind,
    ) -> Result<Option<NaiveDate>, StorageError>;

    /// Atomically log a reminder firing
    ///
    /// Returns `true` if this call inserted the log entry and `false` if an
    /// entry for the same `(user, kind, day)` already existed. This is the
    /// check-and-insert that turns the engine's at-least-once decisions into
    /// effective at-most-once delivery, including under concurrent polls.
    fn record_fired(&self, key: &DedupKey) -> Result<bool, StorageError>;
}
