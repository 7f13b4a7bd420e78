// libs/agenda-cell/src/models.rs
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

use appointment_cell::{project, CanonicalAppointment, SortKey, StatusFilter, Tab};
use identity_cell::IdentityError;

// ==============================================================================
// VIEW STATE
// ==============================================================================

/// Fetch lifecycle state. `Loading` blanks the view (initial load only);
/// `Refreshing` keeps the current list on screen while a background or
/// manual fetch runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Refreshing,
    Ready,
    Failed,
}

impl LoadPhase {
    pub fn is_fetching(&self) -> bool {
        matches!(self, LoadPhase::Loading | LoadPhase::Refreshing)
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadPhase::Idle => write!(f, "idle"),
            LoadPhase::Loading => write!(f, "loading"),
            LoadPhase::Refreshing => write!(f, "refreshing"),
            LoadPhase::Ready => write!(f, "ready"),
            LoadPhase::Failed => write!(f, "failed"),
        }
    }
}

/// Process-local view model. Owned by the refresh and mutation coordinators;
/// everything else reads it through [`AgendaState::snapshot`].
#[derive(Debug)]
pub struct ViewState {
    pub appointments: Vec<CanonicalAppointment>,
    pub tab: Tab,
    pub status_filter: StatusFilter,
    pub sort_key: SortKey,
    pub phase: LoadPhase,
    pub error: Option<String>,
    /// Appointment ids with a cancellation currently in flight.
    pub canceling: HashSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            appointments: Vec::new(),
            tab: Tab::Upcoming,
            status_filter: StatusFilter::All,
            sort_key: SortKey::Date,
            phase: LoadPhase::Idle,
            error: None,
            canceling: HashSet::new(),
        }
    }
}

/// Shared handle to the view state.
#[derive(Clone, Default)]
pub struct AgendaState {
    inner: Arc<RwLock<ViewState>>,
}

impl AgendaState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_tab(&self, tab: Tab) {
        self.inner.write().await.tab = tab;
    }

    pub async fn set_status_filter(&self, status_filter: StatusFilter) {
        self.inner.write().await.status_filter = status_filter;
    }

    pub async fn set_sort_key(&self, sort_key: SortKey) {
        self.inner.write().await.sort_key = sort_key;
    }

    /// Read-only projection for the rendering layer: the ordered sequence
    /// under the current selections plus the transient flags.
    pub async fn snapshot(&self, now: NaiveDateTime) -> AgendaSnapshot {
        let state = self.inner.read().await;
        let mut canceling: Vec<String> = state.canceling.iter().cloned().collect();
        canceling.sort();

        AgendaSnapshot {
            appointments: project(
                &state.appointments,
                state.tab,
                state.status_filter,
                state.sort_key,
                now,
            ),
            loading: state.phase == LoadPhase::Loading,
            refreshing: state.phase.is_fetching(),
            error: state.error.clone(),
            canceling,
        }
    }

    pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, ViewState> {
        self.inner.write().await
    }
}

/// What the rendering layer consumes. A plain value: no callbacks back into
/// the core, nothing here mutates the view state.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaSnapshot {
    pub appointments: Vec<CanonicalAppointment>,
    pub loading: bool,
    pub refreshing: bool,
    pub error: Option<String>,
    pub canceling: Vec<String>,
}

impl AgendaSnapshot {
    pub fn is_canceling(&self, appointment_id: &str) -> bool {
        self.canceling.iter().any(|id| id == appointment_id)
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request to appointment service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Appointment service rejected the request ({status}): {}", .message.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, message: Option<String> },
}

impl ServiceError {
    /// The human-readable message supplied by the service, when there is one.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ServiceError::Rejected { message, .. } => message.as_deref(),
            ServiceError::Transport(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Error)]
pub enum CancelError {
    #[error("Appointment is missing an identifier")]
    MissingId,

    #[error("Cancellation was not confirmed")]
    Declined,

    #[error("A cancellation for appointment {0} is already in flight")]
    AlreadyInFlight(String),

    #[error("Failed to cancel appointment: {0}")]
    Service(#[from] ServiceError),
}
