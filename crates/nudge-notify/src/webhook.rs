//! Webhook provider — POSTs the notification as JSON to a configured URL.

use async_trait::async_trait;
use chrono::Utc;

use nudge_core::Result;
use nudge_core::config::WebhookConfig;
use nudge_core::traits::NotificationProvider;
use nudge_core::types::{NotificationPayload, NotificationResult};

pub struct WebhookProvider {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookProvider {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn failure(&self, payload: &NotificationPayload, error: String) -> NotificationResult {
        NotificationResult::failure(payload, error, Some(self.provider_id()))
    }
}

#[async_trait]
impl NotificationProvider for WebhookProvider {
    fn provider_id(&self) -> &str {
        "webhook"
    }

    fn provider_name(&self) -> &str {
        "Webhook Provider"
    }

    async fn send(&self, payload: &NotificationPayload) -> Result<NotificationResult> {
        let body = serde_json::json!({
            "id": payload.id,
            "recipients": payload.recipients,
            "subject": payload.subject,
            "content": payload.content,
            "priority": payload.priority,
            "metadata": payload.metadata,
            "timestamp": Utc::now().to_rfc3339(),
        });

        let mut req = self
            .client
            .post(&self.config.url)
            .json(&body)
            .timeout(std::time::Duration::from_secs(10));
        for (key, value) in &self.config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(self.failure(payload, format!("Webhook send failed: {e}"))),
        };

        if resp.status().is_success() {
            tracing::info!("✅ Webhook notification sent to {}: {}", self.config.url, payload.id);
            Ok(NotificationResult {
                success: true,
                notification_id: payload.id.clone(),
                provider_id: self.provider_id().to_string(),
                sent_at: Utc::now(),
                error: None,
                recipient_count: payload.recipients.len(),
                delivery_status: None,
            })
        } else {
            Ok(self.failure(payload, format!("Webhook error {}", resp.status())))
        }
    }

    async fn is_available(&self) -> bool {
        self.config.enabled && !self.config.url.is_empty()
    }

    fn validate_payload(&self, payload: &NotificationPayload) -> bool {
        !payload.id.is_empty() && !payload.subject.is_empty() && !payload.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, enabled: bool) -> WebhookConfig {
        WebhookConfig {
            url: url.into(),
            headers: vec![],
            enabled,
        }
    }

    #[tokio::test]
    async fn unavailable_when_disabled_or_unconfigured() {
        assert!(!WebhookProvider::new(config("", true)).is_available().await);
        assert!(
            !WebhookProvider::new(config("https://hooks.example.com", false))
                .is_available()
                .await
        );
        assert!(
            WebhookProvider::new(config("https://hooks.example.com", true))
                .is_available()
                .await
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_failure_result_not_error() {
        // The .invalid TLD never resolves, so the send fails fast.
        let provider = WebhookProvider::new(config("http://nudge.invalid/hook", true));
        let payload =
            NotificationPayload::new("n-1", vec!["ops".into()], "Subject", "Body");
        let result = provider.send(&payload).await.unwrap();
        assert!(!result.success);
        assert!(result.error.unwrap().contains("Webhook send failed"));
    }
}
