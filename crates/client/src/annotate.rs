//! Case annotation of search results.
//!
//! Marks each result item as included in or excluded from the user's
//! active case, by key lookup against the case's item sets. This is a
//! read-only pass: keeping the two sets disjoint is the job of the case
//! store's mutation operations, never of annotation.

use crate::records::{Annotatable, CaseStatus};
use casefinder_core::CaseItemSets;

/// Set each result's case status from the case's item sets.
///
/// Items in neither set keep their default `Neither` status.
pub fn annotate<R: Annotatable>(results: &mut [R], sets: &CaseItemSets) {
    if sets.is_empty() {
        return;
    }

    for item in results.iter_mut() {
        let key = item.key();
        if sets.excluded.contains(&key) {
            item.set_case_status(CaseStatus::Excluded);
        } else if sets.included.contains(&key) {
            item.set_case_status(CaseStatus::Included);
        }
    }
}
