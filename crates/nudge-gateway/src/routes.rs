//! API route handlers for the gateway.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};

use nudge_core::types::NotificationPayload;
use nudge_reminders::CreateReminder;

use crate::error::ApiError;
use crate::server::AppState;

/// Health check endpoint.
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "nudge-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Create a reminder from a natural-language prompt.
pub async fn create_reminder(
    State(state): State<AppState>,
    Json(request): Json<CreateReminder>,
) -> Result<impl IntoResponse, ApiError> {
    let reminder = state.pipeline.create(request).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!(reminder))))
}

/// List every registered provider with its availability.
pub async fn list_providers(State(state): State<AppState>) -> Json<serde_json::Value> {
    let providers = state.orchestrator.get_available_providers().await;
    Json(serde_json::json!({ "providers": providers }))
}

/// Send a notification immediately. The result body is authoritative —
/// failures come back as `success: false`, not as error statuses.
pub async fn send_notification(
    State(state): State<AppState>,
    Json(payload): Json<NotificationPayload>,
) -> Json<serde_json::Value> {
    let result = state.orchestrator.send(&payload).await;
    Json(serde_json::json!(result))
}

/// Schedule a notification for future delivery.
pub async fn schedule_notification(
    State(state): State<AppState>,
    Json(payload): Json<NotificationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.orchestrator.schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// List pending notification ids.
pub async fn list_scheduled(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ids = state.orchestrator.scheduled_notifications().await?;
    Ok(Json(serde_json::json!({ "scheduled": ids })))
}

/// Fetch one pending notification.
pub async fn get_scheduled(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.orchestrator.scheduled_notification(&id).await? {
        Some(payload) => Ok(Json(serde_json::json!(payload))),
        None => Err(ApiError {
            status: StatusCode::NOT_FOUND,
            message: format!("Scheduled notification not found: {id}"),
            details: None,
        }),
    }
}

/// Cancel a pending notification.
pub async fn cancel_scheduled(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cancelled = state.orchestrator.cancel_scheduled(&id).await?;
    Ok(Json(serde_json::json!({ "id": id, "cancelled": cancelled })))
}

/// Exercise a provider with a synthetic (or supplied) payload.
pub async fn test_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NotificationPayload>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // An absent or malformed body means "use a synthetic payload".
    let payload = payload.ok().map(|Json(p)| p);
    let result = state.orchestrator.test_provider(&id, payload).await?;
    Ok(Json(serde_json::json!(result)))
}
