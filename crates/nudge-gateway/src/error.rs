//! Error → HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use nudge_core::error::NudgeError;
use nudge_extractor::ExtractError;
use nudge_reminders::ReminderError;

/// An error ready to leave the process as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: &str, details: Option<String>) -> Self {
        Self {
            status,
            message: message.to_string(),
            details,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self
            .status
            .canonical_reason()
            .unwrap_or("Internal Server Error");
        let body = Json(serde_json::json!({
            "statusCode": self.status.as_u16(),
            "message": self.message,
            "error": error,
            "details": self.details,
            "timestamp": Utc::now().to_rfc3339(),
        }));
        (self.status, body).into_response()
    }
}

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::VagueInput(reason) => {
                tracing::warn!("Vague input: {reason}");
                Self::new(StatusCode::BAD_REQUEST, "Invalid input provided", Some(reason))
            }
            ExtractError::MissingRequiredFields => Self::new(
                StatusCode::BAD_REQUEST,
                "Missing required information",
                Some("The task title or date/time could not be determined".into()),
            ),
            ExtractError::NoFunctionCall => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process your request",
                Some("The AI service could not process your input properly".into()),
            ),
            ExtractError::InvalidResponse(detail) => {
                tracing::error!("Invalid extraction response: {detail}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process your request",
                    Some("The AI service returned an invalid response".into()),
                )
            }
            ExtractError::Generation { source } => {
                tracing::error!("Reminder generation failed: {source}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to create reminder",
                    Some("Unable to process your reminder request at this time".into()),
                )
            }
            ExtractError::Transport(source) => {
                tracing::error!("Extraction transport fault: {source}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Service temporarily unavailable",
                    None,
                )
            }
        }
    }
}

impl From<NudgeError> for ApiError {
    fn from(e: NudgeError) -> Self {
        let message = e.to_string();
        match e {
            NudgeError::InvalidInput(_) | NudgeError::ScheduledTimeRequired | NudgeError::InvalidPayload(_) => {
                Self::new(StatusCode::BAD_REQUEST, &message, None)
            }
            NudgeError::ProviderNotFound(_) => Self::new(StatusCode::NOT_FOUND, &message, None),
            NudgeError::ProviderUnavailable(_) | NudgeError::NoAvailableProvider => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, &message, None)
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, &message, None),
        }
    }
}

impl From<ReminderError> for ApiError {
    fn from(e: ReminderError) -> Self {
        match e {
            ReminderError::Extract(inner) => inner.into(),
            ReminderError::Notify(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nudge_core::retry::TransportError;

    #[test]
    fn input_quality_faults_are_bad_requests() {
        let api: ApiError = ExtractError::VagueInput("no date given".into()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.as_deref(), Some("no date given"));

        let api: ApiError = ExtractError::MissingRequiredFields.into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn extraction_service_faults_are_server_errors() {
        let api: ApiError = ExtractError::NoFunctionCall.into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);

        let api: ApiError = ExtractError::Generation {
            source: TransportError::new("upstream down").with_status(503),
        }
        .into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn orchestration_faults_map_case_by_case() {
        let api: ApiError = NudgeError::ProviderNotFound("sms".into()).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert!(api.message.contains("sms"));

        let api: ApiError = NudgeError::NoAvailableProvider.into();
        assert_eq!(api.status, StatusCode::SERVICE_UNAVAILABLE);

        let api: ApiError = NudgeError::ScheduledTimeRequired.into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let api: ApiError = NudgeError::SchedulerNotConfigured.into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
