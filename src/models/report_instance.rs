use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::ReportStatus;

/// The single filled-report record for one test assignment.
///
/// Created lazily on the first successful save; later saves for the same
/// assignment update this record. `completed_at` is non-null iff
/// `status == Completed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInstance {
    pub id: Uuid,
    pub test_assignment_id: Uuid,
    pub report_type_id: Uuid,
    pub status: ReportStatus,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}
