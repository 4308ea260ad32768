/// Read-model builders over the engine and storage
///
/// The dashboard, insight, and milestone views each used to carry their own
/// copy of the streak and date math; here they are thin adapters that pull
/// events from a PracticeStore, run them through the engine, and shape the
/// typed results callers render. Nothing in this module writes storage.

pub mod dashboard;
pub mod insights;
pub mod milestones;

// Re-export public types for easy access
pub use dashboard::*;
pub use insights::*;
pub use milestones::*;
