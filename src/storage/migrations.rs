/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    // Check current version
    let current_version = get_current_version(conn)?;

    // Run migrations if needed
    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the core tables for subjects, practice events, reminder
/// settings, and the reminder firing log.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    // Create subjects table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS subjects (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            is_active BOOLEAN DEFAULT TRUE,
            target_start TEXT,
            target_duration_days INTEGER
        )",
        [],
    )?;

    // Create practice_events table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS practice_events (
            subject_id TEXT NOT NULL,
            occurred_on TEXT NOT NULL,
            outcome TEXT NOT NULL,
            rating INTEGER,
            notes TEXT,
            FOREIGN KEY (subject_id) REFERENCES subjects (id)
        )",
        [],
    )?;

    // Create reminder_settings table
    //
    // reminder_days keeps the historical JSON encoding with Sunday = 0;
    // the adapter translates to ISO weekdays when loading.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS reminder_settings (
            user_id TEXT PRIMARY KEY,
            is_enabled BOOLEAN NOT NULL DEFAULT TRUE,
            daily_reminder_enabled BOOLEAN NOT NULL DEFAULT FALSE,
            daily_reminder_time TEXT,
            reminder_days TEXT NOT NULL DEFAULT '[0,1,2,3,4,5,6]',
            inactive_days_threshold INTEGER NOT NULL DEFAULT 3,
            after_action_reminder BOOLEAN NOT NULL DEFAULT TRUE,
            after_new_action_reminder BOOLEAN NOT NULL DEFAULT TRUE,
            browser_notification BOOLEAN NOT NULL DEFAULT TRUE,
            email_notification BOOLEAN NOT NULL DEFAULT TRUE
        )",
        [],
    )?;

    // Create reminder_log table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS reminder_log (
            user_id TEXT NOT NULL,
            reminder_kind TEXT NOT NULL,
            triggered_on TEXT NOT NULL
        )",
        [],
    )?;

    // Create indexes for better query performance
    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Unique constraint upholding one event per subject and day
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_practice_events_unique
         ON practice_events (subject_id, occurred_on)",
        [],
    )?;

    // Index for finding events by date (for user-level range queries)
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_practice_events_occurred_on
         ON practice_events (occurred_on)",
        [],
    )?;

    // Index for listing a user's subjects
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_subjects_user
         ON subjects (user_id)",
        [],
    )?;

    // Unique constraint that makes reminder firing at-most-once per day.
    // Concurrent polls race to this index; the loser's insert is ignored.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_reminder_log_unique
         ON reminder_log (user_id, reminder_kind, triggered_on)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}
