//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per entity. All
//! public functions are re-exported here.

mod assignment;
mod instance;
mod report_type;
mod value;

pub use assignment::*;
pub use instance::*;
pub use report_type::*;
pub use value::*;

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use rusqlite::Connection;
    use uuid::Uuid;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::db::DatabaseError;
    use crate::models::enums::{FieldType, ReportStatus};
    use crate::models::*;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn make_assignment(conn: &Connection) -> Uuid {
        let id = Uuid::new_v4();
        insert_test_assignment(
            conn,
            &TestAssignment {
                id,
                patient_id: Uuid::new_v4(),
                assigned_at: ts("2025-03-01 09:00:00"),
            },
        )
        .unwrap();
        id
    }

    fn make_field(type_id: Uuid, name: &str, field_type: FieldType, order: i32) -> ReportField {
        ReportField {
            id: Uuid::new_v4(),
            report_type_id: type_id,
            field_name: name.into(),
            field_label: name.to_uppercase(),
            field_type,
            field_order: order,
            is_required: false,
            unit: None,
            normal_range_min: None,
            normal_range_max: None,
            dropdown_options: None,
            default_value: None,
        }
    }

    fn make_instance(assignment_id: Uuid, type_id: Uuid) -> ReportInstance {
        ReportInstance {
            id: Uuid::new_v4(),
            test_assignment_id: assignment_id,
            report_type_id: type_id,
            status: ReportStatus::Pending,
            created_by: "tech-1".into(),
            created_at: ts("2025-03-01 10:00:00"),
            updated_at: ts("2025-03-01 10:00:00"),
            completed_at: None,
        }
    }

    #[test]
    fn report_type_insert_and_retrieve() {
        let conn = test_db();
        let id = Uuid::new_v4();
        insert_report_type(
            &conn,
            &ReportType {
                id,
                code: "LFT".into(),
                name: "Liver Function Test".into(),
                description: Some("Hepatic panel".into()),
                is_active: true,
            },
        )
        .unwrap();

        let rt = get_report_type(&conn, &id).unwrap().unwrap();
        assert_eq!(rt.code, "LFT");
        assert!(rt.is_active);

        let by_code = get_report_type_by_code(&conn, "LFT").unwrap().unwrap();
        assert_eq!(by_code.id, id);

        assert!(get_report_type_by_code(&conn, "MISSING").unwrap().is_none());
    }

    #[test]
    fn list_active_skips_inactive_types() {
        let conn = test_db();
        insert_report_type(
            &conn,
            &ReportType {
                id: Uuid::new_v4(),
                code: "RETIRED".into(),
                name: "Retired Panel".into(),
                description: None,
                is_active: false,
            },
        )
        .unwrap();

        let active = list_active_report_types(&conn).unwrap();
        // The two seeded built-ins, not the retired one
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|t| t.code != "RETIRED"));
    }

    #[test]
    fn fields_come_back_in_field_order() {
        let conn = test_db();
        let type_id = Uuid::new_v4();
        insert_report_type(
            &conn,
            &ReportType {
                id: type_id,
                code: "KFT".into(),
                name: "Kidney Function Test".into(),
                description: None,
                is_active: true,
            },
        )
        .unwrap();

        // Insert out of order
        insert_report_field(&conn, &make_field(type_id, "creatinine", FieldType::Number, 2)).unwrap();
        insert_report_field(&conn, &make_field(type_id, "urea", FieldType::Number, 1)).unwrap();
        insert_report_field(&conn, &make_field(type_id, "remarks", FieldType::Text, 3)).unwrap();

        let fields = get_fields_for_report_type(&conn, &type_id).unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.field_name.as_str()).collect();
        assert_eq!(names, vec!["urea", "creatinine", "remarks"]);
    }

    #[test]
    fn fields_for_missing_type_is_not_found() {
        let conn = test_db();
        let err = get_fields_for_report_type(&conn, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn fields_for_fieldless_type_is_empty_not_error() {
        let conn = test_db();
        let type_id = Uuid::new_v4();
        insert_report_type(
            &conn,
            &ReportType {
                id: type_id,
                code: "DRAFT".into(),
                name: "Draft Panel".into(),
                description: None,
                is_active: true,
            },
        )
        .unwrap();

        let fields = get_fields_for_report_type(&conn, &type_id).unwrap();
        assert!(fields.is_empty());
    }

    #[test]
    fn seeded_dropdown_options_preserve_order() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let fields = get_fields_for_report_type(&conn, &bg.id).unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_name, "blood_group");
        assert_eq!(
            fields[0].dropdown_options.as_deref(),
            Some(&["A".to_string(), "B".into(), "AB".into(), "O".into()][..])
        );
        assert_eq!(fields[1].field_name, "rh_factor");
        assert!(fields[1].is_required);
    }

    #[test]
    fn duplicate_field_name_within_type_rejected() {
        let conn = test_db();
        let type_id = Uuid::new_v4();
        insert_report_type(
            &conn,
            &ReportType {
                id: type_id,
                code: "DUP".into(),
                name: "Duplicate Fields".into(),
                description: None,
                is_active: true,
            },
        )
        .unwrap();

        insert_report_field(&conn, &make_field(type_id, "hb", FieldType::Number, 1)).unwrap();
        let err = insert_report_field(&conn, &make_field(type_id, "hb", FieldType::Number, 2))
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn instance_insert_and_find_by_assignment() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let assignment_id = make_assignment(&conn);

        assert!(find_instance_by_assignment(&conn, &assignment_id)
            .unwrap()
            .is_none());

        let instance = make_instance(assignment_id, bg.id);
        insert_report_instance(&conn, &instance).unwrap();

        let found = find_instance_by_assignment(&conn, &assignment_id)
            .unwrap()
            .unwrap();
        assert_eq!(found.id, instance.id);
        assert_eq!(found.status, ReportStatus::Pending);
        assert_eq!(found.created_by, "tech-1");
        assert!(found.completed_at.is_none());
    }

    #[test]
    fn second_instance_for_same_assignment_is_unique_violation() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let assignment_id = make_assignment(&conn);

        insert_report_instance(&conn, &make_instance(assignment_id, bg.id)).unwrap();
        let err = insert_report_instance(&conn, &make_instance(assignment_id, bg.id)).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn instance_for_missing_assignment_rejected() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let result = insert_report_instance(&conn, &make_instance(Uuid::new_v4(), bg.id));
        assert!(result.is_err());
    }

    #[test]
    fn update_instance_status_patches_all_three_columns() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let assignment_id = make_assignment(&conn);
        let instance = make_instance(assignment_id, bg.id);
        insert_report_instance(&conn, &instance).unwrap();

        let later = ts("2025-03-02 11:30:00");
        update_instance_status(
            &conn,
            &instance.id,
            &ReportStatus::Completed,
            &later,
            Some(&later),
        )
        .unwrap();

        let updated = get_report_instance(&conn, &instance.id).unwrap().unwrap();
        assert_eq!(updated.status, ReportStatus::Completed);
        assert_eq!(updated.updated_at, later);
        assert_eq!(updated.completed_at, Some(later));
        // created_at untouched
        assert_eq!(updated.created_at, instance.created_at);

        // Back to in_progress clears completed_at
        let later2 = ts("2025-03-02 12:00:00");
        update_instance_status(&conn, &instance.id, &ReportStatus::InProgress, &later2, None)
            .unwrap();
        let updated = get_report_instance(&conn, &instance.id).unwrap().unwrap();
        assert_eq!(updated.status, ReportStatus::InProgress);
        assert!(updated.completed_at.is_none());
    }

    #[test]
    fn update_instance_status_not_found() {
        let conn = test_db();
        let err = update_instance_status(
            &conn,
            &Uuid::new_v4(),
            &ReportStatus::Pending,
            &ts("2025-03-02 11:30:00"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn replace_values_is_a_full_set_replace() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let fields = get_fields_for_report_type(&conn, &bg.id).unwrap();
        let assignment_id = make_assignment(&conn);
        let instance = make_instance(assignment_id, bg.id);
        insert_report_instance(&conn, &instance).unwrap();

        let row = |field: &ReportField, text: &str| ReportValue {
            id: Uuid::new_v4(),
            report_instance_id: instance.id,
            report_field_id: field.id,
            value_text: Some(text.into()),
            value_number: None,
        };

        replace_report_values(
            &conn,
            &instance.id,
            &[row(&fields[0], "A"), row(&fields[1], "POSITIVE")],
        )
        .unwrap();
        assert_eq!(get_values_for_instance(&conn, &instance.id).unwrap().len(), 2);

        // Second submission cleared rh_factor — its row must be gone
        replace_report_values(&conn, &instance.id, &[row(&fields[0], "B")]).unwrap();
        let stored = get_values_for_instance(&conn, &instance.id).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].report_field_id, fields[0].id);
        assert_eq!(stored[0].value_text.as_deref(), Some("B"));

        // Empty submission clears everything
        replace_report_values(&conn, &instance.id, &[]).unwrap();
        assert!(get_values_for_instance(&conn, &instance.id).unwrap().is_empty());
    }

    #[test]
    fn duplicate_value_row_per_field_rejected() {
        let conn = test_db();
        let bg = get_report_type_by_code(&conn, "BLOOD_GROUP").unwrap().unwrap();
        let fields = get_fields_for_report_type(&conn, &bg.id).unwrap();
        let assignment_id = make_assignment(&conn);
        let instance = make_instance(assignment_id, bg.id);
        insert_report_instance(&conn, &instance).unwrap();

        let dup = |text: &str| ReportValue {
            id: Uuid::new_v4(),
            report_instance_id: instance.id,
            report_field_id: fields[0].id,
            value_text: Some(text.into()),
            value_number: None,
        };
        let err = replace_report_values(&conn, &instance.id, &[dup("A"), dup("B")]).unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn assignment_insert_and_exists() {
        let conn = test_db();
        let id = make_assignment(&conn);
        assert!(assignment_exists(&conn, &id).unwrap());
        assert!(!assignment_exists(&conn, &Uuid::new_v4()).unwrap());

        let stored = get_test_assignment(&conn, &id).unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.assigned_at, ts("2025-03-01 09:00:00"));
    }
}
