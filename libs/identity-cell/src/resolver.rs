use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{PatientId, SessionContext};

/// Identity fields probed on the stored session record, in priority order.
/// The aliases cover every naming convention the session producer has used.
const SESSION_ID_KEYS: &[&str] = &["id", "P_ID", "patientId", "userId"];

/// Identity fields probed on the decoded token payload, in priority order.
const TOKEN_ID_KEYS: &[&str] = &["id", "userId", "sub"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Could not determine patient ID")]
    Unresolvable,
}

/// Resolve the patient identity from the stored credentials.
///
/// The session record wins over the token. A malformed session record or
/// token payload is treated as absent rather than as a hard failure, so a
/// half-broken session still falls through to the token before giving up.
pub fn resolve_identity(context: &SessionContext) -> Result<PatientId, IdentityError> {
    if let Some(patient_id) = context.session_record().and_then(identity_from_session) {
        debug!("Resolved patient identity from session record: {}", patient_id);
        return Ok(patient_id);
    }

    if let Some(patient_id) = context.bearer_token().and_then(identity_from_token) {
        debug!("Resolved patient identity from token payload: {}", patient_id);
        return Ok(patient_id);
    }

    Err(IdentityError::Unresolvable)
}

fn identity_from_session(raw: &str) -> Option<PatientId> {
    let record: Value = match serde_json::from_str(raw) {
        Ok(record) => record,
        Err(e) => {
            debug!("Stored session record is not valid JSON: {}", e);
            return None;
        }
    };

    first_identity(&record, SESSION_ID_KEYS)
}

fn identity_from_token(token: &str) -> Option<PatientId> {
    let claims_b64 = token.split('.').nth(1)?;

    let claims_bytes = match URL_SAFE_NO_PAD.decode(claims_b64) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to decode token payload: {}", e);
            return None;
        }
    };

    let claims: Value = match serde_json::from_slice(&claims_bytes) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Failed to parse token payload: {}", e);
            return None;
        }
    };

    first_identity(&claims, TOKEN_ID_KEYS)
}

fn first_identity(record: &Value, keys: &[&str]) -> Option<PatientId> {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(identity_value))
}

fn identity_value(value: &Value) -> Option<PatientId> {
    match value {
        Value::String(id) if !id.is_empty() => Some(PatientId::new(id.clone())),
        Value::Number(id) => Some(PatientId::new(id.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn token_with_payload(payload: &Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, claims)
    }

    #[test]
    fn test_resolves_id_from_session_record() {
        let context = SessionContext::new(Some(r#"{"id":"patient-7"}"#.to_string()), None);

        assert_eq!(resolve_identity(&context).unwrap().as_str(), "patient-7");
    }

    #[test]
    fn test_session_record_aliases_are_tried_in_order() {
        let legacy = SessionContext::new(Some(r#"{"P_ID":42}"#.to_string()), None);
        assert_eq!(resolve_identity(&legacy).unwrap().as_str(), "42");

        let both = SessionContext::new(
            Some(r#"{"patientId":"secondary","id":"primary"}"#.to_string()),
            None,
        );
        assert_eq!(resolve_identity(&both).unwrap().as_str(), "primary");
    }

    #[test]
    fn test_null_session_fields_fall_through_to_later_aliases() {
        let context = SessionContext::new(
            Some(r#"{"id":null,"P_ID":null,"userId":"legacy-9"}"#.to_string()),
            None,
        );

        assert_eq!(resolve_identity(&context).unwrap().as_str(), "legacy-9");
    }

    #[test]
    fn test_malformed_session_record_falls_through_to_token() {
        let context = SessionContext::new(
            Some("not json at all".to_string()),
            Some(token_with_payload(&json!({"sub": "patient-3"}))),
        );

        assert_eq!(resolve_identity(&context).unwrap().as_str(), "patient-3");
    }

    #[test]
    fn test_token_payload_keys_are_tried_in_order() {
        let context = SessionContext::new(
            None,
            Some(token_with_payload(
                &json!({"sub": "fallback", "userId": "middle", "id": 11}),
            )),
        );

        assert_eq!(resolve_identity(&context).unwrap().as_str(), "11");
    }

    #[test]
    fn test_token_without_payload_segment_is_treated_as_absent() {
        let context = SessionContext::new(None, Some("justonepart".to_string()));

        assert_matches!(resolve_identity(&context), Err(IdentityError::Unresolvable));
    }

    #[test]
    fn test_garbled_token_payload_is_treated_as_absent() {
        let context = SessionContext::new(None, Some("a.%%%not-base64%%%.b".to_string()));

        assert_matches!(resolve_identity(&context), Err(IdentityError::Unresolvable));
    }

    #[test]
    fn test_empty_context_is_unresolvable() {
        let context = SessionContext::default();

        assert_matches!(resolve_identity(&context), Err(IdentityError::Unresolvable));
    }

    #[test]
    fn test_empty_string_ids_do_not_count() {
        let context = SessionContext::new(
            Some(r#"{"id":""}"#.to_string()),
            Some(token_with_payload(&json!({"id": ""}))),
        );

        assert_matches!(resolve_identity(&context), Err(IdentityError::Unresolvable));
    }
}
