use std::sync::Arc;

use chrono::Utc;
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep, Duration};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda_cell::{
    AgendaSnapshot, AgendaState, AlwaysConfirm, AppointmentClient, MutationService,
    NotificationSink, RefreshService, TracingSink,
};
use appointment_cell::services::format::{format_date_long, format_time_12h};
use shared_config::AppConfig;
use shared_models::auth::SessionContext;

const RENDER_INTERVAL: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting patient appointment agenda");

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        warn!("APPOINTMENT_API_URL is not set; every refresh will fail until it is");
    }

    let session = SessionContext::new(config.session_record.clone(), config.auth_token.clone());
    let client = Arc::new(AppointmentClient::new(&config, config.auth_token.clone()));
    let state = AgendaState::new();
    let sink: Arc<dyn NotificationSink> = Arc::new(TracingSink);

    let refresh = Arc::new(RefreshService::new(
        state.clone(),
        Arc::clone(&client),
        session,
        Arc::clone(&sink),
        Duration::from_secs(config.poll_interval_seconds),
    ));

    // A typed command on stdin is already an explicit user action, so the
    // gate that confirms upstream applies.
    let mutation = MutationService::new(
        state.clone(),
        client,
        sink,
        Arc::new(AlwaysConfirm),
        refresh.refresh_handle(),
    );

    let loop_service = Arc::clone(&refresh);
    let refresh_loop = tokio::spawn(async move { loop_service.run().await });

    let render_state = state.clone();
    let render_loop = tokio::spawn(async move {
        loop {
            sleep(RENDER_INTERVAL).await;
            let snapshot = render_state.snapshot(Utc::now().naive_utc()).await;
            render(&snapshot);
        }
    });

    let refresh_requests = refresh.refresh_handle();
    let command_loop = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line == "refresh" {
                let _ = refresh_requests.try_send(());
            } else if let Some(id) = line.strip_prefix("cancel ") {
                if let Err(e) = mutation.cancel(Some(id.trim())).await {
                    warn!("Cancel request not completed: {}", e);
                }
            } else if !line.is_empty() {
                info!("Unknown command: {} (try: refresh, cancel <id>)", line);
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, stopping agenda");

    refresh.shutdown().await;
    render_loop.abort();
    command_loop.abort();
    let _ = refresh_loop.await;

    Ok(())
}

fn render(snapshot: &AgendaSnapshot) {
    if let Some(error) = &snapshot.error {
        warn!("{}", error);
    }

    if snapshot.refreshing {
        info!("Refreshing appointments...");
    }

    if snapshot.appointments.is_empty() {
        info!("No appointments to show");
        return;
    }

    for appointment in &snapshot.appointments {
        let doctor = match appointment.doctor_name() {
            "" => "Doctor not specified".to_string(),
            name => name.to_string(),
        };
        let date = appointment
            .date_text
            .as_deref()
            .map(format_date_long)
            .unwrap_or_else(|| "Date not specified".to_string());
        let time = appointment
            .time_text
            .as_deref()
            .map(format_time_12h)
            .unwrap_or_default();
        let canceling = appointment
            .id
            .as_deref()
            .map_or(false, |id| snapshot.is_canceling(id));
        let marker = if canceling { " (cancelling)" } else { "" };

        info!(
            "{} - {} {} [{}]{}",
            doctor,
            date,
            time,
            appointment.display_status(),
            marker
        );
    }
}
