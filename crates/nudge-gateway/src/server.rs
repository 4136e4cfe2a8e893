//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use nudge_notify::NotificationOrchestrator;
use nudge_reminders::ReminderPipeline;

/// Shared state for the gateway server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReminderPipeline>,
    pub orchestrator: Arc<NotificationOrchestrator>,
    pub start_time: std::time::Instant,
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(super::routes::health_check))
        .route("/api/v1/reminders", post(super::routes::create_reminder))
        .route("/api/v1/providers", get(super::routes::list_providers))
        .route("/api/v1/providers/{id}/test", post(super::routes::test_provider))
        .route("/api/v1/notifications/send", post(super::routes::send_notification))
        .route("/api/v1/notifications/schedule", post(super::routes::schedule_notification))
        .route("/api/v1/notifications/scheduled", get(super::routes::list_scheduled))
        .route(
            "/api/v1/notifications/scheduled/{id}",
            get(super::routes::get_scheduled).delete(super::routes::cancel_scheduled),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, host: &str, port: u16) -> nudge_core::Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🌐 Gateway listening on http://{addr}");
    axum::serve(listener, build_router(state))
        .await
        .map_err(nudge_core::NudgeError::Io)?;
    Ok(())
}
