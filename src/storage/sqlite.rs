/// SQLite implementation of the practice storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// subjects, practice events, reminder settings, and the reminder firing
/// log. It also owns the boundary translation between the historical
/// Sunday-first weekday JSON stored in settings and the ISO weekdays the
/// engine speaks.

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use rusqlite::{params, Connection};

use crate::domain::{EventRecord, Outcome, ReminderKind, Subject, SubjectId, TargetWindow, UserId};
use crate::engine::{DedupKey, ReminderConfig};
use crate::storage::{migrations, PracticeStore, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the PracticeStore trait.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Encode ISO weekdays into the stored Sunday-first JSON list
    fn weekdays_to_json(weekdays: &[Weekday]) -> Result<String, StorageError> {
        let indices: Vec<u8> = weekdays
            .iter()
            .map(|w| w.num_days_from_sunday() as u8)
            .collect();
        Ok(serde_json::to_string(&indices)?)
    }

    /// Decode the stored Sunday-first JSON list into ISO weekdays
    ///
    /// A malformed list degrades to "no active weekdays" with a warning,
    /// which makes the daily reminder silently ineligible rather than
    /// failing the whole settings load.
    fn weekdays_from_json(raw: &str) -> Vec<Weekday> {
        let indices: Vec<u8> = match serde_json::from_str(raw) {
            Ok(indices) => indices,
            Err(_) => {
                tracing::warn!(reminder_days = raw, "Ignoring malformed reminder weekday list");
                return Vec::new();
            }
        };

        indices
            .into_iter()
            .filter_map(|index| match index {
                0 => Some(Weekday::Sun),
                1 => Some(Weekday::Mon),
                2 => Some(Weekday::Tue),
                3 => Some(Weekday::Wed),
                4 => Some(Weekday::Thu),
                5 => Some(Weekday::Fri),
                6 => Some(Weekday::Sat),
                other => {
                    tracing::warn!(index = other, "Ignoring out-of-range reminder weekday");
                    None
                }
            })
            .collect()
    }

    /// Map one subjects row into a Subject
    fn subject_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subject> {
        let id_str: String = row.get(0)?;
        let id = SubjectId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let user_id_str: String = row.get(1)?;
        let user_id = UserId::from_string(&user_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let created_at_str: String = row.get(3)?;
        let created_at = NaiveDate::parse_from_str(&created_at_str, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::InvalidColumnType(3, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        let target_start_str: Option<String> = row.get(5)?;
        let target_duration_days: Option<u32> = row.get(6)?;
        let target = match (target_start_str, target_duration_days) {
            (Some(start_str), Some(duration_days)) => {
                let start_date =
                    NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
                        rusqlite::Error::InvalidColumnType(
                            5,
                            "Invalid date".to_string(),
                            rusqlite::types::Type::Text,
                        )
                    })?;
                Some(TargetWindow {
                    start_date,
                    duration_days,
                })
            }
            _ => None,
        };

        Ok(Subject::from_existing(
            id,
            user_id,
            row.get(2)?, // name
            created_at,
            row.get(4)?, // is_active
            target,
        ))
    }

    /// Map one practice_events row into an EventRecord
    fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRecord> {
        let subject_id_str: String = row.get(0)?;
        let subject_id = SubjectId::from_string(&subject_id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let occurred_on_str: String = row.get(1)?;
        let occurred_on = NaiveDate::parse_from_str(&occurred_on_str, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::InvalidColumnType(1, "Invalid date".to_string(), rusqlite::types::Type::Text)
        })?;

        let outcome_str: String = row.get(2)?;
        let outcome = Outcome::parse(&outcome_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(2, "Invalid outcome".to_string(), rusqlite::types::Type::Text)
        })?;

        Ok(EventRecord::from_existing(
            subject_id,
            occurred_on,
            outcome,
            row.get(3)?, // rating
            row.get(4)?, // notes
        ))
    }
}

impl PracticeStore for SqliteStore {
    /// Create a new subject in the database
    fn create_subject(&self, subject: &Subject) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO subjects (
                id, user_id, name, created_at, is_active, target_start, target_duration_days
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                subject.id.to_string(),
                subject.user_id.to_string(),
                subject.name,
                subject.created_at.to_string(),
                subject.is_active,
                subject.target.map(|t| t.start_date.to_string()),
                subject.target.map(|t| t.duration_days),
            ],
        )?;

        tracing::debug!("Created subject: {} ({})", subject.name, subject.id.to_string());
        Ok(())
    }

    /// Get a subject by its ID
    fn get_subject(&self, subject_id: &SubjectId) -> Result<Subject, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, created_at, is_active, target_start, target_duration_days
             FROM subjects WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![subject_id.to_string()], Self::subject_from_row);

        match result {
            Ok(subject) => Ok(subject),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::SubjectNotFound {
                subject_id: subject_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// List a user's subjects, optionally only active ones
    fn list_subjects(
        &self,
        user_id: &UserId,
        active_only: bool,
    ) -> Result<Vec<Subject>, StorageError> {
        let mut sql = "SELECT id, user_id, name, created_at, is_active, target_start, target_duration_days
             FROM subjects WHERE user_id = ?1"
            .to_string();

        if active_only {
            sql.push_str(" AND is_active = 1");
        }

        sql.push_str(" ORDER BY created_at, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let subject_iter = stmt.query_map(params![user_id.to_string()], Self::subject_from_row)?;

        let mut subjects = Vec::new();
        for subject in subject_iter {
            subjects.push(subject?);
        }

        Ok(subjects)
    }

    /// Record a practice event, rejecting a same-day duplicate
    fn record_event(&self, event: &EventRecord) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO practice_events (
                subject_id, occurred_on, outcome, rating, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.subject_id.to_string(),
                event.occurred_on.to_string(),
                event.outcome.as_str(),
                event.rating,
                event.notes,
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(
                    "Recorded {} event for subject {} on {}",
                    event.outcome.as_str(),
                    event.subject_id.to_string(),
                    event.occurred_on
                );
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateEvent {
                    subject_id: event.subject_id.to_string(),
                    date: event.occurred_on.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// All events for a subject, ascending by date
    fn list_events(&self, subject_id: &SubjectId) -> Result<Vec<EventRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT subject_id, occurred_on, outcome, rating, notes
             FROM practice_events WHERE subject_id = ?1
             ORDER BY occurred_on",
        )?;

        let event_iter = stmt.query_map(params![subject_id.to_string()], Self::event_from_row)?;

        let mut events = Vec::new();
        for event in event_iter {
            events.push(event?);
        }

        Ok(events)
    }

    /// All dates a subject's outcome was a success
    fn list_success_dates(
        &self,
        subject_id: &SubjectId,
    ) -> Result<BTreeSet<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT occurred_on FROM practice_events
             WHERE subject_id = ?1 AND outcome = 'success'",
        )?;

        let date_iter = stmt.query_map(params![subject_id.to_string()], |row| {
            let date_str: String = row.get(0)?;
            NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    0,
                    "Invalid date".to_string(),
                    rusqlite::types::Type::Text,
                )
            })
        })?;

        let mut dates = BTreeSet::new();
        for date in date_iter {
            dates.insert(date?);
        }

        Ok(dates)
    }

    /// All events across a user's subjects within an inclusive date range
    fn list_user_events(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<EventRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT e.subject_id, e.occurred_on, e.outcome, e.rating, e.notes
             FROM practice_events e
             JOIN subjects s ON s.id = e.subject_id
             WHERE s.user_id = ?1 AND e.occurred_on BETWEEN ?2 AND ?3
             ORDER BY e.occurred_on",
        )?;

        let event_iter = stmt.query_map(
            params![user_id.to_string(), start.to_string(), end.to_string()],
            Self::event_from_row,
        )?;

        let mut events = Vec::new();
        for event in event_iter {
            events.push(event?);
        }

        Ok(events)
    }

    /// The most recent date the user logged any event, if ever
    fn last_activity_date(&self, user_id: &UserId) -> Result<Option<NaiveDate>, StorageError> {
        let last: Option<String> = self.conn.query_row(
            "SELECT MAX(e.occurred_on)
             FROM practice_events e
             JOIN subjects s ON s.id = e.subject_id
             WHERE s.user_id = ?1",
            params![user_id.to_string()],
            |row| row.get(0),
        )?;

        Ok(last.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }

    /// Get the user's reminder configuration, creating defaults if absent
    fn get_reminder_config(&self, user_id: &UserId) -> Result<ReminderConfig, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT is_enabled, daily_reminder_enabled, daily_reminder_time, reminder_days,
                    inactive_days_threshold, after_action_reminder, after_new_action_reminder,
                    browser_notification, email_notification
             FROM reminder_settings WHERE user_id = ?1",
        )?;

        let result = stmt.query_row(params![user_id.to_string()], |row| {
            let reminder_days: String = row.get(3)?;
            Ok(ReminderConfig {
                enabled: row.get(0)?,
                daily_reminder_enabled: row.get(1)?,
                daily_time: row.get(2)?,
                active_weekdays: Self::weekdays_from_json(&reminder_days),
                inactivity_threshold_days: row.get(4)?,
                after_action_reminder: row.get(5)?,
                after_new_action_reminder: row.get(6)?,
                browser_notification: row.get(7)?,
                email_notification: row.get(8)?,
            })
        });

        match result {
            Ok(config) => Ok(config),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                // First contact with this user: persist and return defaults
                let config = ReminderConfig::default();
                self.put_reminder_config(user_id, &config)?;
                tracing::info!(
                    "Created default reminder settings for user {}",
                    user_id.to_string()
                );
                Ok(config)
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Store the user's reminder configuration
    fn put_reminder_config(
        &self,
        user_id: &UserId,
        config: &ReminderConfig,
    ) -> Result<(), StorageError> {
        let reminder_days = Self::weekdays_to_json(&config.active_weekdays)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO reminder_settings (
                user_id, is_enabled, daily_reminder_enabled, daily_reminder_time, reminder_days,
                inactive_days_threshold, after_action_reminder, after_new_action_reminder,
                browser_notification, email_notification
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user_id.to_string(),
                config.enabled,
                config.daily_reminder_enabled,
                config.daily_time,
                reminder_days,
                config.inactivity_threshold_days,
                config.after_action_reminder,
                config.after_new_action_reminder,
                config.browser_notification,
                config.email_notification,
            ],
        )?;

        Ok(())
    }

    /// Users that have reminder settings stored
    fn list_users_with_reminders(&self) -> Result<Vec<UserId>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM reminder_settings ORDER BY user_id")?;

        let user_iter = stmt.query_map([], |row| {
            let user_id_str: String = row.get(0)?;
            UserId::from_string(&user_id_str).map_err(|_| {
                rusqlite::Error::InvalidColumnType(
                    0,
                    "Invalid UUID".to_string(),
                    rusqlite::types::Type::Text,
                )
            })
        })?;

        let mut users = Vec::new();
        for user in user_iter {
            users.push(user?);
        }

        Ok(users)
    }

    /// The day a reminder of this kind last fired for the user, if ever
    fn get_last_fired(
        &self,
        user_id: &UserId,
        kind: ReminderKind,
    ) -> Result<Option<NaiveDate>, StorageError> {
        let last: Option<String> = self.conn.query_row(
            "SELECT MAX(triggered_on) FROM reminder_log
             WHERE user_id = ?1 AND reminder_kind = ?2",
            params![user_id.to_string(), kind.as_str()],
            |row| row.get(0),
        )?;

        Ok(last.and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()))
    }

    /// Atomically log a reminder firing
    fn record_fired(&self, key: &DedupKey) -> Result<bool, StorageError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO reminder_log (user_id, reminder_kind, triggered_on)
             VALUES (?1, ?2, ?3)",
            params![
                key.user_id.to_string(),
                key.kind.as_str(),
                key.day.to_string(),
            ],
        )?;

        Ok(inserted == 1)
    }
}
