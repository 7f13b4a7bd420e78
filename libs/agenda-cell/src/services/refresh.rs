use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use appointment_cell::{normalize_response, CanonicalAppointment};
use identity_cell::resolve_identity;
use shared_models::auth::SessionContext;

use crate::models::{AgendaState, FetchError, LoadPhase};
use crate::services::client::AppointmentClient;
use crate::services::notify::NotificationSink;

/// Owns the fetch lifecycle: initial load, periodic background poll, manual
/// refresh. At most one fetch is ever in flight; a load requested while one
/// is running is dropped and the caller relies on the next tick.
pub struct RefreshService {
    state: AgendaState,
    client: Arc<AppointmentClient>,
    session: SessionContext,
    sink: Arc<dyn NotificationSink>,
    poll_interval: Duration,
    refresh_tx: mpsc::Sender<()>,
    refresh_rx: Mutex<mpsc::Receiver<()>>,
    is_shutdown: RwLock<bool>,
}

impl RefreshService {
    pub fn new(
        state: AgendaState,
        client: Arc<AppointmentClient>,
        session: SessionContext,
        sink: Arc<dyn NotificationSink>,
        poll_interval: Duration,
    ) -> Self {
        let (refresh_tx, refresh_rx) = mpsc::channel(8);

        Self {
            state,
            client,
            session,
            sink,
            poll_interval,
            refresh_tx,
            refresh_rx: Mutex::new(refresh_rx),
            is_shutdown: RwLock::new(false),
        }
    }

    /// Handle for requesting a reconciliation refresh from elsewhere (the
    /// mutation coordinator, a UI refresh button).
    pub fn refresh_handle(&self) -> mpsc::Sender<()> {
        self.refresh_tx.clone()
    }

    /// Ask the run loop for a refresh. Supersedes the pending periodic tick;
    /// requests arriving while one is already queued are coalesced.
    pub fn request_refresh(&self) {
        if let Err(e) = self.refresh_tx.try_send(()) {
            debug!("Refresh request coalesced: {}", e);
        }
    }

    /// Fetch, normalize and swap in a new canonical set.
    ///
    /// `initial` blanks the view while loading; background and manual
    /// refreshes keep the current list visible. On any failure the previous
    /// set is retained and the error is surfaced on the view state and the
    /// notification sink.
    pub async fn load(&self, initial: bool) {
        {
            let mut state = self.state.write().await;
            if state.phase.is_fetching() {
                debug!("Fetch already in flight, dropping load request");
                return;
            }
            state.phase = if initial {
                LoadPhase::Loading
            } else {
                LoadPhase::Refreshing
            };
        }

        let outcome = self.fetch_canonical_set().await;

        let mut state = self.state.write().await;
        match outcome {
            Ok(appointments) => {
                info!("Loaded {} appointments", appointments.len());
                state.appointments = appointments;
                state.error = None;
                state.phase = LoadPhase::Ready;
            }
            Err(e) => {
                warn!("Appointment refresh failed: {}", e);
                let message = format!("Failed to load appointments. {}", e);
                state.error = Some(message.clone());
                state.phase = LoadPhase::Failed;
                drop(state);

                self.sink.error(&message);
            }
        }
    }

    async fn fetch_canonical_set(&self) -> Result<Vec<CanonicalAppointment>, FetchError> {
        let patient_id = resolve_identity(&self.session)?;
        debug!("Fetching appointments for patient {}", patient_id);

        let response = self.client.list_by_patient(&patient_id).await?;
        Ok(normalize_response(&response))
    }

    /// Drive the fetch lifecycle until shutdown.
    ///
    /// Single-owner scheduling: the loop holds the only timer. Each pass
    /// re-arms a fresh sleep, so the next periodic tick is always relative
    /// to the completion of the latest attempt, and a manual request simply
    /// wins the select and replaces the pending tick.
    pub async fn run(&self) {
        info!(
            "Starting appointment refresh loop (interval {:?})",
            self.poll_interval
        );

        self.load(true).await;

        let mut refresh_rx = self.refresh_rx.lock().await;
        loop {
            if *self.is_shutdown.read().await {
                break;
            }

            tokio::select! {
                _ = sleep(self.poll_interval) => {
                    debug!("Poll interval elapsed, refreshing appointments");
                    self.load(false).await;
                }
                request = refresh_rx.recv() => match request {
                    Some(()) => {
                        debug!("Manual refresh requested");
                        self.load(false).await;
                    }
                    None => break,
                },
                _ = self.wait_for_shutdown() => {
                    debug!("Refresh loop received shutdown signal");
                    break;
                }
            }
        }

        info!("Appointment refresh loop stopped");
    }

    pub async fn shutdown(&self) {
        let mut is_shutdown = self.is_shutdown.write().await;
        *is_shutdown = true;
    }

    async fn wait_for_shutdown(&self) {
        loop {
            if *self.is_shutdown.read().await {
                return;
            }
            sleep(Duration::from_millis(100)).await;
        }
    }
}
