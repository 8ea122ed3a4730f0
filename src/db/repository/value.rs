use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::ReportValue;

/// Replace every stored value row for an instance with the given set.
///
/// Full-set replace, never a per-row merge: a field cleared in the latest
/// submission leaves no stale row behind. Callers wrap this in a
/// transaction together with the instance write so no reader observes a
/// half-replaced set.
pub fn replace_report_values(
    conn: &Connection,
    instance_id: &Uuid,
    rows: &[ReportValue],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM report_values WHERE report_instance_id = ?1",
        params![instance_id.to_string()],
    )?;
    for row in rows {
        conn.execute(
            "INSERT INTO report_values (id, report_instance_id, report_field_id,
             value_text, value_number)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                row.id.to_string(),
                row.report_instance_id.to_string(),
                row.report_field_id.to_string(),
                row.value_text,
                row.value_number,
            ],
        )?;
    }
    Ok(())
}

/// Stored values for an instance, in the owning fields' schema order.
pub fn get_values_for_instance(
    conn: &Connection,
    instance_id: &Uuid,
) -> Result<Vec<ReportValue>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT v.id, v.report_instance_id, v.report_field_id, v.value_text, v.value_number
         FROM report_values v
         JOIN report_fields f ON f.id = v.report_field_id
         WHERE v.report_instance_id = ?1
         ORDER BY f.field_order ASC",
    )?;

    let rows = stmt.query_map(params![instance_id.to_string()], |row| {
        Ok(value_row_from_rusqlite(row))
    })?;

    let mut values = Vec::new();
    for row in rows {
        values.push(value_from_row(row??)?);
    }
    Ok(values)
}

// Internal row type for ReportValue mapping
struct ValueRow {
    id: String,
    report_instance_id: String,
    report_field_id: String,
    value_text: Option<String>,
    value_number: Option<f64>,
}

fn value_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<ValueRow, rusqlite::Error> {
    Ok(ValueRow {
        id: row.get(0)?,
        report_instance_id: row.get(1)?,
        report_field_id: row.get(2)?,
        value_text: row.get(3)?,
        value_number: row.get(4)?,
    })
}

fn value_from_row(row: ValueRow) -> Result<ReportValue, DatabaseError> {
    Ok(ReportValue {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_instance_id: Uuid::parse_str(&row.report_instance_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_field_id: Uuid::parse_str(&row.report_field_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        value_text: row.value_text,
        value_number: row.value_number,
    })
}
