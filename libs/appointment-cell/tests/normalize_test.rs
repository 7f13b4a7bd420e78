use serde_json::{json, Value};

use appointment_cell::{normalize_record, normalize_response, unwrap_envelope};

#[test]
fn test_field_aliases_yield_the_same_canonical_record() {
    let current = json!({
        "appointmentDate": "2024-05-20",
        "appointmentTime": "10:30",
        "apId": "a-1",
        "descript": "Follow-up visit"
    });
    let snake = json!({
        "appointment_date": "2024-05-20",
        "appointment_time": "10:30",
        "id": "a-1",
        "Descript": "Follow-up visit"
    });
    let legacy = json!({
        "date": "2024-05-20",
        "time": "10:30",
        "appointmentId": "a-1",
        "description": "Follow-up visit"
    });

    let first = normalize_record(&current);
    assert_eq!(first, normalize_record(&snake));
    assert_eq!(first, normalize_record(&legacy));

    assert_eq!(first.id.as_deref(), Some("a-1"));
    assert_eq!(first.date_text.as_deref(), Some("2024-05-20"));
    assert_eq!(first.time_text.as_deref(), Some("10:30"));
    assert_eq!(first.description.as_deref(), Some("Follow-up visit"));
    assert!(first.resolved_instant.is_some());
}

#[test]
fn test_alias_priority_is_first_match_wins() {
    let record = json!({
        "apId": "primary",
        "id": "secondary",
        "appointmentDate": "2024-05-20",
        "date": "1999-01-01"
    });

    let canonical = normalize_record(&record);
    assert_eq!(canonical.id.as_deref(), Some("primary"));
    assert_eq!(canonical.date_text.as_deref(), Some("2024-05-20"));
}

#[test]
fn test_null_aliases_fall_through_to_the_next_name() {
    let record = json!({
        "apId": null,
        "id": 17,
        "appointmentDate": null,
        "appointment_date": "2024-05-20"
    });

    let canonical = normalize_record(&record);
    assert_eq!(canonical.id.as_deref(), Some("17"));
    assert_eq!(canonical.date_text.as_deref(), Some("2024-05-20"));
}

#[test]
fn test_empty_record_normalizes_to_all_absent_fields() {
    let canonical = normalize_record(&json!({}));

    assert_eq!(canonical.id, None);
    assert_eq!(canonical.date_text, None);
    assert_eq!(canonical.time_text, None);
    assert_eq!(canonical.status, None);
    assert_eq!(canonical.doctor, None);
    assert_eq!(canonical.description, None);
    assert_eq!(canonical.resolved_instant, None);
    assert_eq!(canonical.display_status(), "UNKNOWN");
    assert!(!canonical.is_actionable());
}

#[test]
fn test_doctor_descriptor_fields_are_independently_optional() {
    let record = json!({
        "doctor": {"doctorName": "Dr. Adeyemi", "specialization": "Cardiology"}
    });

    let canonical = normalize_record(&record);
    let doctor = canonical.doctor.expect("doctor descriptor should survive");
    assert_eq!(doctor.name.as_deref(), Some("Dr. Adeyemi"));
    assert_eq!(doctor.specialty.as_deref(), Some("Cardiology"));
    assert_eq!(doctor.image, None);

    let nameless = normalize_record(&json!({"doctor": {}}));
    assert!(nameless.doctor.is_some());
    assert_eq!(nameless.doctor_name(), "");
}

#[test]
fn test_unknown_status_is_preserved_verbatim() {
    let canonical = normalize_record(&json!({"status": "RESCHEDULED_TWICE"}));

    assert_eq!(canonical.status.as_deref(), Some("RESCHEDULED_TWICE"));
    assert_eq!(canonical.display_status(), "RESCHEDULED_TWICE");
}

#[test]
fn test_normalization_is_idempotent() {
    let record = json!({
        "id": 5,
        "appointment_date": "2024-01-01",
        "appointment_time": "9:30",
        "status": "PENDING"
    });

    assert_eq!(normalize_record(&record), normalize_record(&record));
}

#[test]
fn test_envelope_shapes_unwrap_in_fixed_precedence() {
    let records = json!([{"id": 1}, {"id": 2}]);

    let bare = records.clone();
    let envelope = json!({"data": records.clone()});
    let doubly_nested = json!({"data": {"appointments": records.clone()}});
    let top_level = json!({"appointments": records.clone()});

    for shape in [&bare, &envelope, &doubly_nested, &top_level] {
        assert_eq!(unwrap_envelope(shape).len(), 2, "shape: {}", shape);
    }
}

#[test]
fn test_singular_data_object_becomes_a_one_record_sequence() {
    let response = json!({"data": {"id": "only", "status": "PENDING"}});

    let records = unwrap_envelope(&response);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("id"), Some(&Value::String("only".into())));
}

#[test]
fn test_unrecognized_envelope_is_scavenged_for_the_first_sequence() {
    let response = json!({
        "meta": {"page": 1},
        "results": [{"id": "scavenged"}]
    });

    let records = unwrap_envelope(&response);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("id"), Some(&Value::String("scavenged".into())));
}

#[test]
fn test_hopeless_shapes_default_to_an_empty_sequence() {
    assert!(unwrap_envelope(&json!({"count": 3})).is_empty());
    assert!(unwrap_envelope(&json!("just a string")).is_empty());
    assert!(unwrap_envelope(&json!(null)).is_empty());
}

#[test]
fn test_every_raw_record_yields_exactly_one_canonical_record() {
    let response = json!({"data": [
        {"id": 1, "appointment_date": "2024-01-01"},
        {"garbage": true},
        {"id": 3, "appointment_date": "not-a-date"}
    ]});

    let canonical = normalize_response(&response);
    assert_eq!(canonical.len(), 3);
    assert!(canonical[0].resolved_instant.is_some());
    assert_eq!(canonical[1].id, None);
    assert_eq!(canonical[2].resolved_instant, None);
}
