use std::env;
use tracing::warn;

const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub appointment_api_url: String,
    pub session_record: Option<String>,
    pub auth_token: Option<String>,
    pub poll_interval_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            appointment_api_url: env::var("APPOINTMENT_API_URL")
                .unwrap_or_else(|_| {
                    warn!("APPOINTMENT_API_URL not set, using empty value");
                    String::new()
                }),
            session_record: env::var("SESSION_RECORD").ok(),
            auth_token: env::var("AUTH_TOKEN").ok(),
            poll_interval_seconds: parse_seconds(
                "POLL_INTERVAL_SECONDS",
                DEFAULT_POLL_INTERVAL_SECONDS,
            ),
            request_timeout_seconds: parse_seconds(
                "REQUEST_TIMEOUT_SECONDS",
                DEFAULT_REQUEST_TIMEOUT_SECONDS,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.appointment_api_url.is_empty()
    }
}

fn parse_seconds(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("{} is not a valid number of seconds, using {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
