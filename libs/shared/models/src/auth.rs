use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque patient identifier as supplied by the identity source.
///
/// Upstream producers have emitted both string and integer ids; integers are
/// carried as their decimal rendering so the rest of the system only ever
/// deals with one shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Credentials handed to the identity resolver.
///
/// Both fields are the raw stored values: the session record is an
/// unvalidated JSON string, the bearer token an opaque dot-delimited string.
/// Injected explicitly so the core never reads ambient storage.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session_record: Option<String>,
    bearer_token: Option<String>,
}

impl SessionContext {
    pub fn new(session_record: Option<String>, bearer_token: Option<String>) -> Self {
        Self {
            session_record,
            bearer_token,
        }
    }

    pub fn session_record(&self) -> Option<&str> {
        self.session_record.as_deref()
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}
