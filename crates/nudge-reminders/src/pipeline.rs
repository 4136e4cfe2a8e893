//! Reminder pipeline — free text in, scheduled notification out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nudge_core::error::NudgeError;
use nudge_core::types::{ExtractedTask, NotificationPayload};
use nudge_extractor::{ExtractError, ExtractionClient};
use nudge_notify::NotificationOrchestrator;

const MIN_PROMPT_LEN: usize = 3;
const MAX_PROMPT_LEN: usize = 500;

/// Incoming reminder request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReminder {
    pub prompt: String,
    pub timezone: String,
    /// Delivery address; defaults to the console recipient when absent.
    #[serde(default)]
    pub recipient: Option<String>,
}

impl CreateReminder {
    /// Trim and bound-check the request. Violations are client-input
    /// problems.
    pub fn validated(mut self) -> Result<Self, NudgeError> {
        self.prompt = self.prompt.trim().to_string();
        self.timezone = self.timezone.trim().to_string();
        if self.prompt.len() < MIN_PROMPT_LEN {
            return Err(NudgeError::InvalidInput(format!(
                "prompt must be at least {MIN_PROMPT_LEN} characters long"
            )));
        }
        if self.prompt.len() > MAX_PROMPT_LEN {
            return Err(NudgeError::InvalidInput(format!(
                "prompt cannot exceed {MAX_PROMPT_LEN} characters"
            )));
        }
        if self.timezone.is_empty() {
            return Err(NudgeError::InvalidInput("timezone is required".into()));
        }
        Ok(self)
    }
}

/// The created reminder, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub id: String,
    pub title: String,
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Notify(#[from] NudgeError),
}

pub struct ReminderPipeline {
    extractor: ExtractionClient,
    orchestrator: Arc<NotificationOrchestrator>,
}

impl ReminderPipeline {
    pub fn new(extractor: ExtractionClient, orchestrator: Arc<NotificationOrchestrator>) -> Self {
        Self { extractor, orchestrator }
    }

    /// Extract a task from the prompt and schedule its notification.
    pub async fn create(&self, request: CreateReminder) -> Result<Reminder, ReminderError> {
        let request = request.validated()?;
        tracing::info!("💬 Creating reminder from prompt ({} chars)", request.prompt.len());

        let task = self.extractor.extract(&request.prompt, &request.timezone).await?;
        let payload = build_payload(&task, request.recipient.as_deref());

        let id = self.orchestrator.schedule(payload).await?;
        tracing::info!("✅ Reminder scheduled: {id} ('{}' at {})", task.title, task.date_time);

        Ok(Reminder {
            id,
            title: task.title,
            scheduled_at: task.date_time,
        })
    }
}

/// Map an extracted task onto a notification payload.
fn build_payload(task: &ExtractedTask, recipient: Option<&str>) -> NotificationPayload {
    let mut payload = NotificationPayload::new(
        &format!("reminder-{}", uuid::Uuid::new_v4()),
        vec![recipient.unwrap_or("console").to_string()],
        &task.title,
        &format!("Reminder: {} at {}", task.title, task.date_time.to_rfc3339()),
    );
    payload.scheduled_at = Some(task.date_time);
    payload
        .metadata
        .insert("source".into(), serde_json::Value::from("reminder"));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn request(prompt: &str) -> CreateReminder {
        CreateReminder {
            prompt: prompt.into(),
            timezone: "Europe/Berlin".into(),
            recipient: None,
        }
    }

    #[test]
    fn validation_trims_and_bounds_the_prompt() {
        let ok = request("  Buy milk tomorrow  ").validated().unwrap();
        assert_eq!(ok.prompt, "Buy milk tomorrow");

        assert!(request("hi").validated().is_err());
        assert!(request(&"x".repeat(501)).validated().is_err());

        let mut no_tz = request("Buy milk tomorrow");
        no_tz.timezone = "  ".into();
        assert!(no_tz.validated().is_err());
    }

    #[test]
    fn payload_carries_the_extracted_schedule() {
        let task = ExtractedTask {
            title: "Buy milk".into(),
            date_time: Utc::now() + Duration::hours(3),
        };
        let payload = build_payload(&task, None);
        assert!(payload.id.starts_with("reminder-"));
        assert_eq!(payload.recipients, vec!["console".to_string()]);
        assert_eq!(payload.subject, "Buy milk");
        assert_eq!(payload.scheduled_at, Some(task.date_time));
        assert!(payload.validate(Utc::now()).is_ok());

        let addressed = build_payload(&task, Some("me@example.com"));
        assert_eq!(addressed.recipients, vec!["me@example.com".to_string()]);
    }
}
