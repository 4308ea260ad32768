/// Recent-milestones read model
///
/// Runs the milestone detector across a user's active subjects and applies
/// the display policy: most recent first, capped at twenty. The cap is a
/// presentation choice and lives here so the detector stays a pure fact
/// generator.

use chrono::NaiveDate;

use crate::domain::UserId;
use crate::engine::{milestone, Milestone};
use crate::storage::PracticeStore;
use crate::ServiceError;

/// How many milestones the view shows by default
pub const DEFAULT_MILESTONE_LIMIT: usize = 20;

/// The most recent milestones across all of a user's active subjects
///
/// Milestones are recomputed from history on every call; persisting or
/// deduplicating what was already shown is the caller's concern.
pub fn recent<S: PracticeStore>(
    store: &S,
    user_id: &UserId,
    as_of: NaiveDate,
    limit: Option<usize>,
) -> Result<Vec<Milestone>, ServiceError> {
    let subjects = store.list_subjects(user_id, true)?;

    let mut milestones = Vec::new();
    for subject in &subjects {
        let events = store.list_events(&subject.id)?;
        milestones.extend(milestone::detect(subject, &events, as_of));
    }

    milestones.sort_by(|a, b| b.achieved_on.cmp(&a.achieved_on));
    milestones.truncate(limit.unwrap_or(DEFAULT_MILESTONE_LIMIT));

    Ok(milestones)
}
