// libs/appointment-cell/src/services/normalize.rs
use serde_json::Value;
use tracing::debug;

use crate::models::{CanonicalAppointment, DoctorRef};
use crate::services::temporal;

// Ordered alias tables, first present non-null value wins. The upstream
// producer has renamed these fields across versions without a schema version
// flag, so the lists are kept as data: a new alias is one more entry.
const ID_KEYS: &[&str] = &["apId", "id", "appointmentId"];
const DATE_KEYS: &[&str] = &["appointmentDate", "appointment_date", "date"];
const TIME_KEYS: &[&str] = &["appointmentTime", "appointment_time", "time"];
const DESCRIPTION_KEYS: &[&str] = &["descript", "Descript", "description"];
const DOCTOR_NAME_KEYS: &[&str] = &["name", "doctorName"];
const DOCTOR_SPECIALTY_KEYS: &[&str] = &["specialty", "specialization"];
const DOCTOR_IMAGE_KEYS: &[&str] = &["image"];

/// Unwrap a fetch result to the sequence of raw appointment records.
///
/// The service has been observed returning a bare array, a `data` envelope,
/// a doubly-nested `data.appointments` envelope, an `appointments` envelope,
/// and a singular object. Shapes are tried in that fixed order; if none
/// match, the envelope is scavenged for the first array value, and failing
/// that the result is an explicit empty sequence.
pub fn unwrap_envelope(response: &Value) -> Vec<Value> {
    if let Value::Array(records) = response {
        return records.clone();
    }

    if let Some(Value::Array(records)) = response.get("data") {
        return records.clone();
    }

    if let Some(Value::Array(records)) =
        response.get("data").and_then(|data| data.get("appointments"))
    {
        return records.clone();
    }

    if let Some(Value::Array(records)) = response.get("appointments") {
        return records.clone();
    }

    if let Some(data @ Value::Object(_)) = response.get("data") {
        return vec![data.clone()];
    }

    if let Value::Object(envelope) = response {
        if let Some(Value::Array(records)) = envelope.values().find(|value| value.is_array()) {
            return records.clone();
        }
    }

    debug!("Fetch result carried no recognizable appointment sequence");
    Vec::new()
}

/// Map one raw record onto the canonical shape. Total: absent or malformed
/// fields become `None`, never an error.
pub fn normalize_record(raw: &Value) -> CanonicalAppointment {
    let date_text = first_text(raw, DATE_KEYS);
    let time_text = first_text(raw, TIME_KEYS);
    let resolved_instant = temporal::classify(date_text.as_deref(), time_text.as_deref());

    CanonicalAppointment {
        id: first_text(raw, ID_KEYS),
        date_text,
        time_text,
        status: raw.get("status").and_then(text_value),
        doctor: raw.get("doctor").and_then(doctor_ref),
        description: first_text(raw, DESCRIPTION_KEYS),
        resolved_instant,
    }
}

/// Unwrap a fetch result and normalize every record in it. One canonical
/// appointment per raw record, nothing dropped, nothing duplicated.
pub fn normalize_response(response: &Value) -> Vec<CanonicalAppointment> {
    unwrap_envelope(response)
        .iter()
        .map(normalize_record)
        .collect()
}

fn first_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(text_value))
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn doctor_ref(value: &Value) -> Option<DoctorRef> {
    value.as_object().map(|_| DoctorRef {
        name: first_text(value, DOCTOR_NAME_KEYS),
        specialty: first_text(value, DOCTOR_SPECIALTY_KEYS),
        image: first_text(value, DOCTOR_IMAGE_KEYS),
    })
}
