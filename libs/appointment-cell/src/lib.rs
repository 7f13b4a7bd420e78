pub mod models;
pub mod services;

pub use models::*;
pub use services::normalize::{normalize_record, normalize_response, unwrap_envelope};
pub use services::projection::project;
pub use services::temporal::classify;
