//! Generic field validator.
//!
//! Evaluates every field definition against the submitted map, collecting
//! all violations in field-definition order — no short-circuit, so the
//! caller gets the complete list in one pass.

use super::types::{is_empty_value, FieldError, SubmittedValues, ValidationOutcome};
use super::values::{coerce_number, value_as_string};
use crate::models::enums::FieldType;
use crate::models::ReportField;

/// Validate a submission against a report type's field definitions.
///
/// Rules per field:
/// - required: present and non-empty (numeric 0 and boolean false count
///   as present, whitespace-only strings do not);
/// - number: if present, must coerce to a finite number;
/// - dropdown: if present, must exactly match one option, case-sensitive;
/// - text: if present, must be string-representable.
///
/// Out-of-range numeric values are never violations — the normal range is
/// advisory metadata. Keys with no matching field definition are ignored.
pub fn validate(fields: &[ReportField], values: &SubmittedValues) -> ValidationOutcome {
    let mut errors = Vec::new();

    for field in fields {
        let value = values.get(&field.field_name);
        let present = value.map(|v| !is_empty_value(v)).unwrap_or(false);

        if !present {
            if field.is_required {
                errors.push(FieldError {
                    field_name: field.field_name.clone(),
                    message: format!("{} is required", field.field_label),
                });
            }
            continue;
        }
        let Some(value) = value else { continue };

        match field.field_type {
            FieldType::Number => {
                if coerce_number(value).is_none() {
                    errors.push(FieldError {
                        field_name: field.field_name.clone(),
                        message: format!("{} must be a valid number", field.field_label),
                    });
                }
            }
            FieldType::Dropdown => {
                let options = field.dropdown_options.as_deref().unwrap_or(&[]);
                let matches = value_as_string(value)
                    .map(|s| options.iter().any(|opt| opt == &s))
                    .unwrap_or(false);
                if !matches {
                    errors.push(FieldError {
                        field_name: field.field_name.clone(),
                        message: format!(
                            "{} must be one of: {}",
                            field.field_label,
                            options.join(", ")
                        ),
                    });
                }
            }
            FieldType::Text => {
                if value_as_string(value).is_none() {
                    errors.push(FieldError {
                        field_name: field.field_name.clone(),
                        message: format!("{} must be text", field.field_label),
                    });
                }
            }
        }
    }

    ValidationOutcome {
        is_valid: errors.is_empty(),
        errors,
    }
}
