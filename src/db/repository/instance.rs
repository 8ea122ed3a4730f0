use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::ReportStatus;
use crate::models::ReportInstance;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn insert_report_instance(
    conn: &Connection,
    instance: &ReportInstance,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO report_instances (id, test_assignment_id, report_type_id,
         status, created_by, created_at, updated_at, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            instance.id.to_string(),
            instance.test_assignment_id.to_string(),
            instance.report_type_id.to_string(),
            instance.status.as_str(),
            instance.created_by,
            format_timestamp(&instance.created_at),
            format_timestamp(&instance.updated_at),
            instance.completed_at.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}

pub fn get_report_instance(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ReportInstance>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, test_assignment_id, report_type_id, status, created_by,
         created_at, updated_at, completed_at
         FROM report_instances WHERE id = ?1",
    )?;
    match stmt.query_row(params![id.to_string()], |row| {
        Ok(instance_row_from_rusqlite(row))
    }) {
        Ok(row) => Ok(Some(instance_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// The at-most-one instance for an assignment, if a save has happened yet.
pub fn find_instance_by_assignment(
    conn: &Connection,
    test_assignment_id: &Uuid,
) -> Result<Option<ReportInstance>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, test_assignment_id, report_type_id, status, created_by,
         created_at, updated_at, completed_at
         FROM report_instances WHERE test_assignment_id = ?1",
    )?;
    match stmt.query_row(params![test_assignment_id.to_string()], |row| {
        Ok(instance_row_from_rusqlite(row))
    }) {
        Ok(row) => Ok(Some(instance_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Patch status, updated_at and completed_at on an existing instance.
///
/// Status is always recomputed by the caller from the full submission,
/// never adjusted incrementally here.
pub fn update_instance_status(
    conn: &Connection,
    id: &Uuid,
    status: &ReportStatus,
    updated_at: &NaiveDateTime,
    completed_at: Option<&NaiveDateTime>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE report_instances SET status = ?2, updated_at = ?3, completed_at = ?4
         WHERE id = ?1",
        params![
            id.to_string(),
            status.as_str(),
            format_timestamp(updated_at),
            completed_at.map(format_timestamp),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "ReportInstance".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

// Internal row type for ReportInstance mapping
struct InstanceRow {
    id: String,
    test_assignment_id: String,
    report_type_id: String,
    status: String,
    created_by: String,
    created_at: String,
    updated_at: String,
    completed_at: Option<String>,
}

fn instance_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<InstanceRow, rusqlite::Error> {
    Ok(InstanceRow {
        id: row.get(0)?,
        test_assignment_id: row.get(1)?,
        report_type_id: row.get(2)?,
        status: row.get(3)?,
        created_by: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        completed_at: row.get(7)?,
    })
}

fn instance_from_row(row: InstanceRow) -> Result<ReportInstance, DatabaseError> {
    Ok(ReportInstance {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        test_assignment_id: Uuid::parse_str(&row.test_assignment_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_type_id: Uuid::parse_str(&row.report_type_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        status: ReportStatus::from_str(&row.status)?,
        created_by: row.created_by,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        completed_at: row.completed_at.as_deref().map(parse_timestamp).transpose()?,
    })
}
