//! Notification data model — payloads, results, and the extracted task.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{NudgeError, Result};

/// Notification priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

/// Per-payload redelivery override, honored by the sweep when a dispatch
/// attempt fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PayloadRetryConfig {
    pub max_retries: u32,
    /// Delay between redelivery attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

/// Everything needed to deliver one notification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    /// Unique opaque identifier. Callers pre-generate these (uuid v4).
    pub id: String,
    /// Recipient addresses — format depends on the provider (email address,
    /// webhook has no per-recipient meaning, etc.).
    pub recipients: Vec<String>,
    pub subject: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    /// Preferred provider id. The orchestrator falls back to provider
    /// selection when absent.
    #[serde(default)]
    pub provider_id: Option<String>,
    /// When to deliver. Absent means "send immediately".
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Provider-specific extras.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub retry_config: Option<PayloadRetryConfig>,
}

impl NotificationPayload {
    /// Minimal payload with everything optional left at its default.
    pub fn new(id: &str, recipients: Vec<String>, subject: &str, content: &str) -> Self {
        Self {
            id: id.to_string(),
            recipients,
            subject: subject.to_string(),
            content: content.to_string(),
            priority: Priority::Normal,
            provider_id: None,
            scheduled_at: None,
            expires_at: None,
            metadata: HashMap::new(),
            retry_config: None,
        }
    }

    /// Structural + temporal invariants, checked at acceptance time against
    /// the accepting component's clock:
    /// recipients non-empty, subject/content non-empty, `scheduled_at` not in
    /// the past, `expires_at` after `scheduled_at`.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<()> {
        if self.id.is_empty() {
            return Err(NudgeError::InvalidInput("notification id is required".into()));
        }
        if self.recipients.is_empty() {
            return Err(NudgeError::InvalidInput("at least one recipient is required".into()));
        }
        if self.subject.is_empty() || self.content.is_empty() {
            return Err(NudgeError::InvalidInput("subject and content are required".into()));
        }
        if let Some(at) = self.scheduled_at {
            if at < now {
                return Err(NudgeError::InvalidInput(format!(
                    "scheduled time {at} is in the past"
                )));
            }
            if let Some(exp) = self.expires_at
                && exp <= at
            {
                return Err(NudgeError::InvalidInput(
                    "expiration must be after the scheduled time".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Delivery outcome for a single recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryStatus {
    pub recipient: String,
    pub delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of one send operation. For callers of the orchestrator this value
/// is the single source of truth — provider faults are folded into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    pub success: bool,
    pub notification_id: String,
    pub provider_id: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub error: Option<String>,
    pub recipient_count: usize,
    #[serde(default)]
    pub delivery_status: Option<Vec<DeliveryStatus>>,
}

impl NotificationResult {
    /// Failure-shaped result for a payload that never reached a provider (or
    /// whose provider faulted unexpectedly).
    pub fn failure(payload: &NotificationPayload, error: impl Into<String>, provider_id: Option<&str>) -> Self {
        Self {
            success: false,
            notification_id: payload.id.clone(),
            provider_id: provider_id.unwrap_or("unknown").to_string(),
            sent_at: Utc::now(),
            error: Some(error.into()),
            recipient_count: payload.recipients.len(),
            delivery_status: None,
        }
    }
}

/// A task extracted from a natural-language prompt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractedTask {
    pub title: String,
    pub date_time: DateTime<Utc>,
}

/// Availability snapshot for one registered provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub available: bool,
}
