use tracing::{error, info};

/// Destination for user-visible toasts. Fire-and-forget: implementations
/// must not call back into the coordinators.
pub trait NotificationSink: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink for headless operation: notifications go to the log.
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn success(&self, message: &str) {
        info!("notification: {}", message);
    }

    fn error(&self, message: &str) {
        error!("notification: {}", message);
    }
}

/// Synchronous yes/no gate asked before destructive operations.
pub trait ConfirmationGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Gate that approves everything, for embedders that confirm upstream.
pub struct AlwaysConfirm;

impl ConfirmationGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}
