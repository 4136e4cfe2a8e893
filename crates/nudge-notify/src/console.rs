//! Console provider — logs notifications instead of delivering them.
//! The development/testing fallback; always available.

use async_trait::async_trait;
use chrono::Utc;

use nudge_core::Result;
use nudge_core::traits::NotificationProvider;
use nudge_core::types::{DeliveryStatus, NotificationPayload, NotificationResult};

pub struct ConsoleProvider;

impl ConsoleProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationProvider for ConsoleProvider {
    fn provider_id(&self) -> &str {
        "console"
    }

    fn provider_name(&self) -> &str {
        "Console Provider"
    }

    async fn send(&self, payload: &NotificationPayload) -> Result<NotificationResult> {
        tracing::info!("=== CONSOLE NOTIFICATION ===");
        tracing::info!("ID: {}", payload.id);
        tracing::info!("Recipients: {}", payload.recipients.join(", "));
        tracing::info!("Subject: {}", payload.subject);
        tracing::info!("Content: {}", payload.content);
        tracing::info!("Priority: {:?}", payload.priority);
        tracing::info!(
            "Scheduled At: {}",
            payload
                .scheduled_at
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "immediate".into())
        );
        tracing::info!(
            "Metadata: {}",
            serde_json::to_string(&payload.metadata).unwrap_or_default()
        );
        tracing::info!("==========================");

        // Simulated delivery latency.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let now = Utc::now();
        Ok(NotificationResult {
            success: true,
            notification_id: payload.id.clone(),
            provider_id: self.provider_id().to_string(),
            sent_at: now,
            error: None,
            recipient_count: payload.recipients.len(),
            delivery_status: Some(
                payload
                    .recipients
                    .iter()
                    .map(|recipient| DeliveryStatus {
                        recipient: recipient.clone(),
                        delivered: true,
                        delivered_at: Some(now),
                        error: None,
                    })
                    .collect(),
            ),
        })
    }

    async fn is_available(&self) -> bool {
        true
    }

    fn validate_payload(&self, payload: &NotificationPayload) -> bool {
        !payload.id.is_empty()
            && !payload.recipients.is_empty()
            && !payload.subject.is_empty()
            && !payload.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> NotificationPayload {
        NotificationPayload::new("n-1", vec!["dev@example.com".into()], "Hello", "World")
    }

    #[tokio::test]
    async fn send_reports_every_recipient_delivered() {
        let provider = ConsoleProvider::new();
        let result = provider.send(&payload()).await.unwrap();
        assert!(result.success);
        assert_eq!(result.provider_id, "console");
        assert_eq!(result.recipient_count, 1);
        let status = result.delivery_status.unwrap();
        assert!(status.iter().all(|s| s.delivered));
    }

    #[tokio::test]
    async fn always_available() {
        assert!(ConsoleProvider::new().is_available().await);
    }

    #[test]
    fn rejects_structurally_incomplete_payloads() {
        let provider = ConsoleProvider::new();
        assert!(provider.validate_payload(&payload()));

        let mut empty_recipients = payload();
        empty_recipients.recipients.clear();
        assert!(!provider.validate_payload(&empty_recipients));

        let mut empty_subject = payload();
        empty_subject.subject.clear();
        assert!(!provider.validate_payload(&empty_subject));
    }
}
