use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::auth::PatientId;

use crate::models::ServiceError;

pub const CANCELLED_STATUS: &str = "CANCELLED";

/// HTTP client for the remote appointment service.
pub struct AppointmentClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl AppointmentClient {
    pub fn new(config: &AppConfig, bearer_token: Option<String>) -> Self {
        // Every request gets a bounded timeout so a hung service cannot pin
        // the refresh loop open indefinitely.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.appointment_api_url.clone(),
            bearer_token,
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.bearer_token {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Response, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut req = self.client.request(method, &url).headers(self.get_headers());

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Appointment service error ({}): {}", status, error_text);

            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: error_message(&error_text),
            });
        }

        Ok(response)
    }

    /// List appointments for a patient. The body shape varies across service
    /// versions; it is returned raw for the normalizer to unwrap.
    pub async fn list_by_patient(&self, patient_id: &PatientId) -> Result<Value, ServiceError> {
        let path = format!("/api/appointments/patient/{}", patient_id);

        let response = self.send(Method::GET, &path, None).await?;
        let data = response.json::<Value>().await?;
        Ok(data)
    }

    /// Update the status of an appointment. The acknowledgement body, if
    /// any, is discarded.
    pub async fn update_status(
        &self,
        appointment_id: &str,
        status: &str,
    ) -> Result<(), ServiceError> {
        let path = format!("/api/appointments/{}/status", appointment_id);

        self.send(Method::PUT, &path, Some(json!({ "status": status })))
            .await?;
        Ok(())
    }

    pub async fn cancel(&self, appointment_id: &str) -> Result<(), ServiceError> {
        self.update_status(appointment_id, CANCELLED_STATUS).await
    }
}

/// Pull the optional human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;

    ["message", "error"]
        .iter()
        .find_map(|key| parsed.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}
