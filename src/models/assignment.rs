use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// External entity linking a patient to a requested test.
///
/// Owned by the registration side of the system; the report engine only
/// checks existence and holds a foreign key to it. At most one report
/// instance exists per assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAssignment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub assigned_at: NaiveDateTime,
}
