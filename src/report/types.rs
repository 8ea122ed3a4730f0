//! Shared engine types — boundary shapes served to the HTTP collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::enums::SaveOperation;
use crate::models::{ReportField, ReportInstance, ReportType};

/// The untyped values map as submitted at the boundary: field name to
/// string | number | bool | null. Confined to request parsing and
/// validation; everything past the validator works with typed values.
pub type SubmittedValues = BTreeMap<String, Value>;

/// One validation violation, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field_name: String,
    pub message: String,
}

/// Result of validating a submission: all violations, in field-definition
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
}

/// One inbound save request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReportRequest {
    pub test_assignment_id: Uuid,
    pub report_type_id: Uuid,
    pub created_by: String,
    pub values: SubmittedValues,
}

/// Persisted result of a save, tagged with what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveReportOutcome {
    pub report_instance: ReportInstance,
    pub operation: SaveOperation,
}

/// A saved report assembled for display: instance, schema, and the
/// reverse-mapped values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSheet {
    pub instance: ReportInstance,
    pub report_type: ReportType,
    pub fields: Vec<ReportField>,
    pub values: SubmittedValues,
}

/// A submitted entry counts as absent when it is null or a string that is
/// empty/whitespace-only. Numeric 0 and boolean false are present.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_value_rules() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&json!("")));
        assert!(is_empty_value(&json!("   ")));
        assert!(!is_empty_value(&json!(0)));
        assert!(!is_empty_value(&json!(false)));
        assert!(!is_empty_value(&json!("0")));
        assert!(!is_empty_value(&json!("A")));
    }
}
