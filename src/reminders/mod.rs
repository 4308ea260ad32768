/// Reminder service layer over the eligibility engine
///
/// This module is the caller side of the eligibility contract: it pulls
/// settings and activity from storage, asks the engine for decisions,
/// writes the firing log atomically, and renders notifications for the
/// delivery layer. The engine itself stays pure; everything stateful
/// happens here.

pub mod service;

// Re-export public types for easy access
pub use service::*;
