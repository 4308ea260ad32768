/// Public library interface for the practice insights engine
///
/// This crate computes derived metrics and reminder decisions from dated
/// practice events: streaks, windowed completion rates, milestones, and
/// reminder eligibility. The engine proper is pure; storage supplies its
/// inputs and the reminder service layer writes its firing log.

// Internal modules
mod domain;
mod engine;
mod reminders;
mod reports;
mod storage;

// Re-export public modules and types
pub use domain::*;
pub use engine::*;
pub use reminders::*;
pub use reports::*;
pub use storage::{PracticeStore, SqliteStore, StorageError};

use thiserror::Error;

/// Errors that can occur in the report and reminder service layers
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Engine error: {0}")]
    Engine(#[from] engine::EngineError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
