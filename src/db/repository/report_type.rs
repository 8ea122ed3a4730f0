use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::enums::FieldType;
use crate::models::{ReportField, ReportType};

pub fn insert_report_type(conn: &Connection, rt: &ReportType) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO report_types (id, code, name, description, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            rt.id.to_string(),
            rt.code,
            rt.name,
            rt.description,
            rt.is_active as i32,
        ],
    )?;
    Ok(())
}

pub fn get_report_type(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<ReportType>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, description, is_active
         FROM report_types WHERE id = ?1",
    )?;
    match stmt.query_row(params![id.to_string()], |row| Ok(type_row_from_rusqlite(row))) {
        Ok(row) => Ok(Some(type_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn get_report_type_by_code(
    conn: &Connection,
    code: &str,
) -> Result<Option<ReportType>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, description, is_active
         FROM report_types WHERE code = ?1",
    )?;
    match stmt.query_row(params![code], |row| Ok(type_row_from_rusqlite(row))) {
        Ok(row) => Ok(Some(type_from_row(row?)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

/// Active report types in stable code order, for the type-picker UI.
pub fn list_active_report_types(conn: &Connection) -> Result<Vec<ReportType>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, description, is_active
         FROM report_types WHERE is_active = 1 ORDER BY code",
    )?;

    let rows = stmt.query_map([], |row| Ok(type_row_from_rusqlite(row)))?;

    let mut types = Vec::new();
    for row in rows {
        types.push(type_from_row(row??)?);
    }
    Ok(types)
}

pub fn insert_report_field(conn: &Connection, field: &ReportField) -> Result<(), DatabaseError> {
    let options_json = field
        .dropdown_options
        .as_ref()
        .map(|opts| serde_json::to_string(opts))
        .transpose()
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    conn.execute(
        "INSERT INTO report_fields (id, report_type_id, field_name, field_label,
         field_type, field_order, is_required, unit, normal_range_min,
         normal_range_max, dropdown_options, default_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            field.id.to_string(),
            field.report_type_id.to_string(),
            field.field_name,
            field.field_label,
            field.field_type.as_str(),
            field.field_order,
            field.is_required as i32,
            field.unit,
            field.normal_range_min,
            field.normal_range_max,
            options_json,
            field.default_value,
        ],
    )?;
    Ok(())
}

/// Field definitions for a report type, ordered by field_order ascending.
///
/// A type with no fields yields an empty vec; a missing type is a distinct
/// NotFound so callers can tell "blank schema" from "bad reference".
pub fn get_fields_for_report_type(
    conn: &Connection,
    report_type_id: &Uuid,
) -> Result<Vec<ReportField>, DatabaseError> {
    let type_id = report_type_id.to_string();
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM report_types WHERE id = ?1",
            params![type_id],
            |row| row.get::<_, i64>(0),
        )
        .map(|n| n > 0)?;
    if !exists {
        return Err(DatabaseError::NotFound {
            entity_type: "ReportType".into(),
            id: type_id,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, report_type_id, field_name, field_label, field_type,
         field_order, is_required, unit, normal_range_min, normal_range_max,
         dropdown_options, default_value
         FROM report_fields WHERE report_type_id = ?1 ORDER BY field_order ASC",
    )?;

    let rows = stmt.query_map(params![type_id], |row| Ok(field_row_from_rusqlite(row)))?;

    let mut fields = Vec::new();
    for row in rows {
        fields.push(field_from_row(row??)?);
    }
    Ok(fields)
}

// Internal row type for ReportType mapping
struct TypeRow {
    id: String,
    code: String,
    name: String,
    description: Option<String>,
    is_active: i32,
}

fn type_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<TypeRow, rusqlite::Error> {
    Ok(TypeRow {
        id: row.get(0)?,
        code: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        is_active: row.get(4)?,
    })
}

fn type_from_row(row: TypeRow) -> Result<ReportType, DatabaseError> {
    Ok(ReportType {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        code: row.code,
        name: row.name,
        description: row.description,
        is_active: row.is_active != 0,
    })
}

// Internal row type for ReportField mapping
struct FieldRow {
    id: String,
    report_type_id: String,
    field_name: String,
    field_label: String,
    field_type: String,
    field_order: i32,
    is_required: i32,
    unit: Option<String>,
    normal_range_min: Option<f64>,
    normal_range_max: Option<f64>,
    dropdown_options: Option<String>,
    default_value: Option<String>,
}

fn field_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<FieldRow, rusqlite::Error> {
    Ok(FieldRow {
        id: row.get(0)?,
        report_type_id: row.get(1)?,
        field_name: row.get(2)?,
        field_label: row.get(3)?,
        field_type: row.get(4)?,
        field_order: row.get(5)?,
        is_required: row.get(6)?,
        unit: row.get(7)?,
        normal_range_min: row.get(8)?,
        normal_range_max: row.get(9)?,
        dropdown_options: row.get(10)?,
        default_value: row.get(11)?,
    })
}

fn field_from_row(row: FieldRow) -> Result<ReportField, DatabaseError> {
    let dropdown_options = row
        .dropdown_options
        .as_deref()
        .map(serde_json::from_str::<Vec<String>>)
        .transpose()
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;

    Ok(ReportField {
        id: Uuid::parse_str(&row.id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        report_type_id: Uuid::parse_str(&row.report_type_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        field_name: row.field_name,
        field_label: row.field_label,
        field_type: FieldType::from_str(&row.field_type)?,
        field_order: row.field_order,
        is_required: row.is_required != 0,
        unit: row.unit,
        normal_range_min: row.normal_range_min,
        normal_range_max: row.normal_range_max,
        dropdown_options,
        default_value: row.default_value,
    })
}
