pub mod models;
pub mod services;

pub use models::*;
pub use services::client::AppointmentClient;
pub use services::mutation::MutationService;
pub use services::notify::{AlwaysConfirm, ConfirmationGate, NotificationSink, TracingSink};
pub use services::refresh::RefreshService;
