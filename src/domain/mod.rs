/// Domain module containing core data types and validation
///
/// This module defines the core entities (Subject, EventRecord) and the
/// shared vocabulary types (Outcome, ReminderKind, ID newtypes) that the
/// engine, storage, and report layers all speak.

pub mod event;
pub mod subject;
pub mod types;

// Re-export public types for easy access
pub use event::*;
pub use subject::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid subject name: {0}")]
    InvalidName(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
