use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored (instance, field, value) row.
///
/// Exactly one of `value_text`/`value_number` is populated, chosen by the
/// owning field's type. At most one row exists per (instance, field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportValue {
    pub id: Uuid,
    pub report_instance_id: Uuid,
    pub report_field_id: Uuid,
    pub value_text: Option<String>,
    pub value_number: Option<f64>,
}
