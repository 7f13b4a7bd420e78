use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::models::{AgendaState, CancelError};
use crate::services::client::AppointmentClient;
use crate::services::notify::{ConfirmationGate, NotificationSink};

const CANCEL_PROMPT: &str = "Are you sure you want to cancel this appointment?";
const CANCEL_SUCCESS_MESSAGE: &str = "Appointment cancelled successfully";
const CANCEL_FAILURE_MESSAGE: &str = "Failed to cancel appointment";

/// Drives the cancel-appointment operation: one in-flight cancellation per
/// appointment id, a confirmation gate in front of the remote call, and a
/// reconciliation refresh on success.
pub struct MutationService {
    state: AgendaState,
    client: Arc<AppointmentClient>,
    sink: Arc<dyn NotificationSink>,
    gate: Arc<dyn ConfirmationGate>,
    refresh_tx: mpsc::Sender<()>,
}

impl MutationService {
    pub fn new(
        state: AgendaState,
        client: Arc<AppointmentClient>,
        sink: Arc<dyn NotificationSink>,
        gate: Arc<dyn ConfirmationGate>,
        refresh_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            state,
            client,
            sink,
            gate,
            refresh_tx,
        }
    }

    pub async fn cancel(&self, appointment_id: Option<&str>) -> Result<(), CancelError> {
        let id = match appointment_id {
            Some(id) if !id.is_empty() => id,
            _ => {
                debug!("Cancel requested without an appointment id");
                return Err(CancelError::MissingId);
            }
        };

        if !self.gate.confirm(CANCEL_PROMPT) {
            debug!("Cancellation of {} declined", id);
            return Err(CancelError::Declined);
        }

        // Single-flight keyed by id: a second request for the same id is
        // rejected while the first is in flight; distinct ids may proceed
        // concurrently.
        {
            let mut state = self.state.write().await;
            if !state.canceling.insert(id.to_string()) {
                warn!("Cancellation already in flight for {}", id);
                return Err(CancelError::AlreadyInFlight(id.to_string()));
            }
        }

        let outcome = self.client.cancel(id).await;

        {
            let mut state = self.state.write().await;
            state.canceling.remove(id);
        }

        match outcome {
            Ok(()) => {
                info!("Appointment {} cancelled", id);
                self.sink.success(CANCEL_SUCCESS_MESSAGE);

                // Re-enter the refresh coordinator to reconcile the view.
                if let Err(e) = self.refresh_tx.try_send(()) {
                    debug!("Reconciliation refresh coalesced: {}", e);
                }

                Ok(())
            }
            Err(e) => {
                warn!("Failed to cancel appointment {}: {}", id, e);
                let message = e
                    .service_message()
                    .unwrap_or(CANCEL_FAILURE_MESSAGE)
                    .to_string();
                self.sink.error(&message);

                Err(CancelError::Service(e))
            }
        }
    }
}
