//! Report instance upsert coordinator.
//!
//! One entry point per direction: [`save_report`] (validate, derive
//! status, lookup-or-create the instance, replace its value rows) and
//! [`load_report`] (instance + schema + reverse-mapped values).

use chrono::{Local, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use super::error::ReportError;
use super::status::calculate_status;
use super::types::{ReportSheet, SaveReportOutcome, SaveReportRequest};
use super::validator::validate;
use super::values::{rows_to_values, values_to_rows};
use crate::db::repository::{
    assignment_exists, find_instance_by_assignment, get_fields_for_report_type,
    get_report_instance, get_report_type, get_values_for_instance, insert_report_instance,
    replace_report_values, update_instance_status,
};
use crate::db::DatabaseError;
use crate::models::enums::{ReportStatus, SaveOperation};
use crate::models::{ReportField, ReportInstance};

/// Save a report submission: create the instance on first save, update it
/// afterwards, and fully replace its value rows either way.
///
/// Validation and reference checks happen before any write; a failure
/// there leaves the database untouched and the caller's values intact for
/// retry. The instance write and the value replace commit as one
/// transaction, so no reader observes a status without its matching rows.
pub fn save_report(
    conn: &Connection,
    request: &SaveReportRequest,
) -> Result<SaveReportOutcome, ReportError> {
    let fields = fields_for_type(conn, &request.report_type_id)?;

    if !assignment_exists(conn, &request.test_assignment_id)? {
        return Err(ReportError::NotFound {
            entity: "TestAssignment".into(),
            id: request.test_assignment_id.to_string(),
        });
    }

    let outcome = validate(&fields, &request.values);
    if !outcome.is_valid {
        tracing::debug!(
            report_type_id = %request.report_type_id,
            errors = outcome.errors.len(),
            "Report submission failed validation"
        );
        return Err(ReportError::Validation(outcome.errors));
    }

    let required_field_names: Vec<String> = fields
        .iter()
        .filter(|f| f.is_required)
        .map(|f| f.field_name.clone())
        .collect();
    let status = calculate_status(&request.values, &required_field_names);

    let now = Local::now().naive_local();
    let completed_at = matches!(status, ReportStatus::Completed).then_some(now);

    let tx = conn.unchecked_transaction().map_err(DatabaseError::from)?;

    let (instance_id, operation) =
        match find_instance_by_assignment(&tx, &request.test_assignment_id)? {
            Some(existing) => {
                update_instance_status(&tx, &existing.id, &status, &now, completed_at.as_ref())?;
                (existing.id, SaveOperation::Updated)
            }
            None => create_or_recover(&tx, request, &status, &now, completed_at.as_ref())?,
        };

    let rows = values_to_rows(&fields, &request.values, &instance_id);
    replace_report_values(&tx, &instance_id, &rows)?;
    tx.commit().map_err(DatabaseError::from)?;

    let instance = get_report_instance(conn, &instance_id)?.ok_or_else(|| {
        ReportError::NotFound {
            entity: "ReportInstance".into(),
            id: instance_id.to_string(),
        }
    })?;

    tracing::info!(
        instance_id = %instance.id,
        test_assignment_id = %request.test_assignment_id,
        status = status.as_str(),
        operation = operation.as_str(),
        values = rows.len(),
        "Report saved"
    );

    Ok(SaveReportOutcome {
        report_instance: instance,
        operation,
    })
}

/// Insert a fresh instance, converting a duplicate-key failure into an
/// update of the row that won the race. Two first-saves can both observe
/// "not found"; the UNIQUE constraint on test_assignment_id makes the
/// loser's insert fail rather than duplicate the instance.
fn create_or_recover(
    conn: &Connection,
    request: &SaveReportRequest,
    status: &ReportStatus,
    now: &NaiveDateTime,
    completed_at: Option<&NaiveDateTime>,
) -> Result<(Uuid, SaveOperation), ReportError> {
    let instance = ReportInstance {
        id: Uuid::new_v4(),
        test_assignment_id: request.test_assignment_id,
        report_type_id: request.report_type_id,
        status: *status,
        created_by: request.created_by.clone(),
        created_at: *now,
        updated_at: *now,
        completed_at: completed_at.copied(),
    };

    match insert_report_instance(conn, &instance) {
        Ok(()) => Ok((instance.id, SaveOperation::Created)),
        Err(e) if e.is_unique_violation() => {
            tracing::warn!(
                test_assignment_id = %request.test_assignment_id,
                "Concurrent first save detected, retrying as update"
            );
            let existing = find_instance_by_assignment(conn, &request.test_assignment_id)?
                .ok_or(ReportError::Database(e))?;
            update_instance_status(conn, &existing.id, status, now, completed_at)?;
            Ok((existing.id, SaveOperation::Updated))
        }
        Err(e) => Err(e.into()),
    }
}

/// Load a saved report for display. `None` when no save has happened yet
/// for the assignment.
pub fn load_report(
    conn: &Connection,
    test_assignment_id: &Uuid,
) -> Result<Option<ReportSheet>, ReportError> {
    let Some(instance) = find_instance_by_assignment(conn, test_assignment_id)? else {
        return Ok(None);
    };

    let report_type = get_report_type(conn, &instance.report_type_id)?.ok_or_else(|| {
        ReportError::NotFound {
            entity: "ReportType".into(),
            id: instance.report_type_id.to_string(),
        }
    })?;
    let fields = fields_for_type(conn, &instance.report_type_id)?;
    let rows = get_values_for_instance(conn, &instance.id)?;
    let values = rows_to_values(&fields, &rows);

    Ok(Some(ReportSheet {
        instance,
        report_type,
        fields,
        values,
    }))
}

fn fields_for_type(
    conn: &Connection,
    report_type_id: &Uuid,
) -> Result<Vec<ReportField>, ReportError> {
    match get_fields_for_report_type(conn, report_type_id) {
        Ok(fields) => Ok(fields),
        Err(DatabaseError::NotFound { .. }) => Err(ReportError::NotFound {
            entity: "ReportType".into(),
            id: report_type_id.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}
