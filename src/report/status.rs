//! Completion-status derivation.

use super::types::{is_empty_value, SubmittedValues};
use crate::models::enums::ReportStatus;

/// Derive the tri-state completion status of a submission.
///
/// Pure function, recomputed from scratch on every save — status is never
/// patched incrementally. A submission with zero keys is `Pending`;
/// otherwise it is `Completed` when every required field name maps to a
/// non-empty value, else `InProgress`.
///
/// An empty required set is vacuously satisfied, so any non-empty
/// submission against it classifies as `Completed`.
pub fn calculate_status(
    values: &SubmittedValues,
    required_field_names: &[String],
) -> ReportStatus {
    if values.is_empty() {
        return ReportStatus::Pending;
    }

    let all_required_filled = required_field_names.iter().all(|name| {
        values
            .get(name)
            .map(|v| !is_empty_value(v))
            .unwrap_or(false)
    });

    if all_required_filled {
        ReportStatus::Completed
    } else {
        ReportStatus::InProgress
    }
}
