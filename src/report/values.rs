//! Typed field values and the EAV row mapping.
//!
//! Forward: submission map → one `ReportValue` row per non-empty entry
//! with a resolvable field, numeric fields routed to `value_number`, all
//! others to `value_text`. Reverse: stored rows → flat map, resolved
//! through the owning field's name and type.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use super::types::{is_empty_value, SubmittedValues};
use crate::models::enums::FieldType;
use crate::models::{ReportField, ReportValue};

/// A submitted value after boundary typing, tagged by the owning field's
/// type.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Choice(String),
}

impl FieldValue {
    /// Type a raw submission entry against its field definition. `None`
    /// when the entry cannot be represented for the field's type.
    pub fn from_submission(field: &ReportField, raw: &Value) -> Option<FieldValue> {
        match field.field_type {
            FieldType::Number => coerce_number(raw).map(FieldValue::Number),
            FieldType::Dropdown => value_as_string(raw).map(FieldValue::Choice),
            FieldType::Text => value_as_string(raw).map(FieldValue::Text),
        }
    }
}

/// A finite number from a JSON number or a string-encoded number.
/// NaN, infinities and non-numeric strings yield `None`.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// String representation of a scalar submission entry. Arrays and objects
/// have none.
pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Forward pass: the complete row set for the current submission.
///
/// Entries that are empty, name no known field, or fail coercion are
/// silently dropped — validation has already gated correctness upstream.
/// Iterates fields in schema order, so the emitted set is deterministic.
pub fn values_to_rows(
    fields: &[ReportField],
    values: &SubmittedValues,
    instance_id: &Uuid,
) -> Vec<ReportValue> {
    let mut rows = Vec::new();
    for field in fields {
        let Some(raw) = values.get(&field.field_name) else {
            continue;
        };
        if is_empty_value(raw) {
            continue;
        }
        let Some(typed) = FieldValue::from_submission(field, raw) else {
            continue;
        };
        let (value_text, value_number) = match typed {
            FieldValue::Number(n) => (None, Some(n)),
            FieldValue::Text(s) | FieldValue::Choice(s) => (Some(s), None),
        };
        rows.push(ReportValue {
            id: Uuid::new_v4(),
            report_instance_id: *instance_id,
            report_field_id: field.id,
            value_text,
            value_number,
        });
    }
    rows
}

/// Reverse pass: stored rows back to a flat values map, numeric columns as
/// JSON numbers, text columns as JSON strings. Rows whose field is no
/// longer in the schema are skipped.
pub fn rows_to_values(fields: &[ReportField], rows: &[ReportValue]) -> SubmittedValues {
    let by_id: HashMap<&Uuid, &ReportField> = fields.iter().map(|f| (&f.id, f)).collect();

    let mut values = SubmittedValues::new();
    for row in rows {
        let Some(field) = by_id.get(&row.report_field_id) else {
            continue;
        };
        if let Some(n) = row.value_number {
            if let Some(value) = number_value(n) {
                values.insert(field.field_name.clone(), value);
            }
        } else if let Some(text) = &row.value_text {
            values.insert(field.field_name.clone(), Value::String(text.clone()));
        }
    }
    values
}

/// REAL storage does not distinguish 9000 from 9000.0; integral values
/// come back as JSON integers.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Some(Value::from(n as i64))
    } else {
        serde_json::Number::from_f64(n).map(Value::Number)
    }
}
