// libs/appointment-cell/src/models.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==============================================================================
// CANONICAL APPOINTMENT MODELS
// ==============================================================================

/// The normalized form of a remote appointment record.
///
/// Every field except `resolved_instant` carries the raw value as supplied by
/// whichever producer wrote the record; normalization fills in `None` for
/// anything absent instead of failing. The set is rebuilt wholesale on every
/// successful fetch, so instances are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalAppointment {
    pub id: Option<String>,
    pub date_text: Option<String>,
    pub time_text: Option<String>,
    pub status: Option<String>,
    pub doctor: Option<DoctorRef>,
    pub description: Option<String>,
    /// Derived instant; `None` means the date/time could not be classified.
    pub resolved_instant: Option<NaiveDateTime>,
}

impl CanonicalAppointment {
    /// Status string for display. Unknown statuses are shown verbatim; a
    /// missing status renders as "UNKNOWN".
    pub fn display_status(&self) -> &str {
        self.status.as_deref().unwrap_or("UNKNOWN")
    }

    pub fn status_kind(&self) -> StatusKind {
        StatusKind::from_raw(self.status.as_deref())
    }

    pub fn doctor_name(&self) -> &str {
        self.doctor
            .as_ref()
            .and_then(|doctor| doctor.name.as_deref())
            .unwrap_or("")
    }

    /// Records without an id cannot be mutated remotely.
    pub fn is_actionable(&self) -> bool {
        matches!(self.id.as_deref(), Some(id) if !id.is_empty())
    }

    /// An unclassifiable instant is never upcoming.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        matches!(self.resolved_instant, Some(instant) if instant > now)
    }

    /// Whether the cancel affordance applies: the record must be actionable,
    /// still ahead of us, and not already in a terminal status.
    pub fn can_cancel(&self, now: NaiveDateTime) -> bool {
        self.is_actionable()
            && self.is_upcoming(now)
            && !matches!(
                self.status_kind(),
                StatusKind::Cancelled | StatusKind::Completed
            )
    }
}

/// Doctor descriptor attached to an appointment, every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRef {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub image: Option<String>,
}

/// Closed classification of the open status string, for styling decisions.
/// The raw status is never coerced to this; unknown values stay verbatim on
/// the record and classify as `Unknown` here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Unknown,
}

impl StatusKind {
    pub fn from_raw(status: Option<&str>) -> Self {
        match status {
            Some("PENDING") => StatusKind::Pending,
            Some("CONFIRMED") => StatusKind::Confirmed,
            Some("CANCELLED") => StatusKind::Cancelled,
            Some("COMPLETED") => StatusKind::Completed,
            _ => StatusKind::Unknown,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Pending => write!(f, "pending"),
            StatusKind::Confirmed => write!(f, "confirmed"),
            StatusKind::Cancelled => write!(f, "cancelled"),
            StatusKind::Completed => write!(f, "completed"),
            StatusKind::Unknown => write!(f, "unknown"),
        }
    }
}

// ==============================================================================
// VIEW SELECTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Date,
    Doctor,
    Status,
}

/// Status filter selection. Matching against the record's raw status is
/// exact and case-sensitive; `All` passes everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    All,
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl StatusFilter {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some("PENDING"),
            StatusFilter::Confirmed => Some("CONFIRMED"),
            StatusFilter::Cancelled => Some("CANCELLED"),
            StatusFilter::Completed => Some("COMPLETED"),
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self.as_str() {
            None => true,
            Some(wanted) => status == Some(wanted),
        }
    }
}
