//! Email provider — outbound SMTP via async lettre.
//! One message per recipient so delivery status is tracked individually.

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use nudge_core::config::EmailConfig;
use nudge_core::error::{NudgeError, Result};
use nudge_core::traits::NotificationProvider;
use nudge_core::types::{DeliveryStatus, NotificationPayload, NotificationResult};

pub struct EmailProvider {
    config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailProvider {
    pub fn new(config: EmailConfig) -> Result<Self> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| NudgeError::Config(format!("SMTP relay setup failed: {e}")))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();
        Ok(Self { config, transport })
    }

    async fn deliver_one(&self, recipient: &str, payload: &NotificationPayload) -> DeliveryStatus {
        let message = Message::builder()
            .from(match self.config.from.parse() {
                Ok(from) => from,
                Err(e) => {
                    return DeliveryStatus {
                        recipient: recipient.to_string(),
                        delivered: false,
                        delivered_at: None,
                        error: Some(format!("Invalid from address: {e}")),
                    };
                }
            })
            .to(match recipient.parse() {
                Ok(to) => to,
                Err(e) => {
                    return DeliveryStatus {
                        recipient: recipient.to_string(),
                        delivered: false,
                        delivered_at: None,
                        error: Some(format!("Invalid recipient: {e}")),
                    };
                }
            })
            .subject(payload.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(payload.content.clone());

        let message = match message {
            Ok(m) => m,
            Err(e) => {
                return DeliveryStatus {
                    recipient: recipient.to_string(),
                    delivered: false,
                    delivered_at: None,
                    error: Some(format!("Message build failed: {e}")),
                };
            }
        };

        match self.transport.send(message).await {
            Ok(_) => DeliveryStatus {
                recipient: recipient.to_string(),
                delivered: true,
                delivered_at: Some(Utc::now()),
                error: None,
            },
            Err(e) => DeliveryStatus {
                recipient: recipient.to_string(),
                delivered: false,
                delivered_at: None,
                error: Some(format!("SMTP send failed: {e}")),
            },
        }
    }
}

#[async_trait]
impl NotificationProvider for EmailProvider {
    fn provider_id(&self) -> &str {
        "email"
    }

    fn provider_name(&self) -> &str {
        "Email Provider"
    }

    async fn send(&self, payload: &NotificationPayload) -> Result<NotificationResult> {
        let mut delivery_status = Vec::with_capacity(payload.recipients.len());
        for recipient in &payload.recipients {
            delivery_status.push(self.deliver_one(recipient, payload).await);
        }

        let delivered = delivery_status.iter().filter(|s| s.delivered).count();
        let first_error = delivery_status
            .iter()
            .find_map(|s| s.error.clone());

        if delivered == payload.recipients.len() {
            tracing::info!("✅ Email sent: {} ({} recipients)", payload.id, delivered);
        } else {
            tracing::warn!(
                "⚠️ Email partially failed: {} ({}/{} delivered)",
                payload.id,
                delivered,
                payload.recipients.len()
            );
        }

        Ok(NotificationResult {
            success: delivered == payload.recipients.len(),
            notification_id: payload.id.clone(),
            provider_id: self.provider_id().to_string(),
            sent_at: Utc::now(),
            error: first_error,
            recipient_count: payload.recipients.len(),
            delivery_status: Some(delivery_status),
        })
    }

    async fn is_available(&self) -> bool {
        self.config.enabled && !self.config.smtp_host.is_empty() && !self.config.username.is_empty()
    }

    fn validate_payload(&self, payload: &NotificationPayload) -> bool {
        !payload.recipients.is_empty()
            && payload.recipients.iter().all(|r| r.contains('@'))
            && !payload.subject.is_empty()
            && !payload.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".into(),
            smtp_port: 587,
            username: "nudge".into(),
            password: "secret".into(),
            from: "Nudge <nudge@example.com>".into(),
            enabled: true,
        }
    }

    #[tokio::test]
    async fn validates_recipient_addresses() {
        let provider = EmailProvider::new(config()).unwrap();
        let good =
            NotificationPayload::new("n-1", vec!["a@example.com".into()], "Subject", "Body");
        assert!(provider.validate_payload(&good));

        let bad = NotificationPayload::new("n-2", vec!["not-an-address".into()], "Subject", "Body");
        assert!(!provider.validate_payload(&bad));
    }

    #[tokio::test]
    async fn unavailable_when_disabled() {
        let mut cfg = config();
        cfg.enabled = false;
        let provider = EmailProvider::new(cfg).unwrap();
        assert!(!provider.is_available().await);
    }
}
