use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::TestAssignment;

pub fn insert_test_assignment(
    conn: &Connection,
    assignment: &TestAssignment,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO test_assignments (id, patient_id, assigned_at)
         VALUES (?1, ?2, ?3)",
        params![
            assignment.id.to_string(),
            assignment.patient_id.to_string(),
            assignment.assigned_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_test_assignment(
    conn: &Connection,
    id: &Uuid,
) -> Result<Option<TestAssignment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, assigned_at FROM test_assignments WHERE id = ?1",
    )?;
    match stmt.query_row(params![id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    }) {
        Ok((id, patient_id, assigned_at)) => Ok(Some(TestAssignment {
            id: Uuid::parse_str(&id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            patient_id: Uuid::parse_str(&patient_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            assigned_at: NaiveDateTime::parse_from_str(&assigned_at, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::from(e)),
    }
}

pub fn assignment_exists(conn: &Connection, id: &Uuid) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM test_assignments WHERE id = ?1",
        params![id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
