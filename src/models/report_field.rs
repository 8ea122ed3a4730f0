use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::FieldType;

/// One schema-defined input slot within a report type.
///
/// `normal_range_min`/`max` are advisory display metadata for numeric
/// fields; values outside the range are never rejected.
/// `dropdown_options` is populated for dropdown fields only and preserves
/// the authored option order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportField {
    pub id: Uuid,
    pub report_type_id: Uuid,
    pub field_name: String,
    pub field_label: String,
    pub field_type: FieldType,
    pub field_order: i32,
    pub is_required: bool,
    pub unit: Option<String>,
    pub normal_range_min: Option<f64>,
    pub normal_range_max: Option<f64>,
    pub dropdown_options: Option<Vec<String>>,
    pub default_value: Option<String>,
}
