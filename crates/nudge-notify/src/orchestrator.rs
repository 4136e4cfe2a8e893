//! Notification orchestrator — provider selection, validation, dispatch, and
//! scheduling. Callers treat the returned [`NotificationResult`] as the
//! single source of truth: provider faults never escape as errors.

use std::sync::Arc;

use tokio::sync::RwLock;

use nudge_core::error::{NudgeError, Result};
use nudge_core::traits::{NotificationProvider, NotificationScheduler};
use nudge_core::types::{NotificationPayload, NotificationResult, ProviderInfo};

use crate::registry::ProviderRegistry;

pub struct NotificationOrchestrator {
    registry: RwLock<ProviderRegistry>,
    scheduler: Option<Arc<dyn NotificationScheduler>>,
}

impl NotificationOrchestrator {
    /// Constructor injection — the orchestrator owns the registry it is
    /// handed and holds the scheduler by reference. No ambient globals.
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            scheduler: None,
        }
    }

    pub fn with_scheduler(mut self, scheduler: Arc<dyn NotificationScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub async fn register_provider(&self, provider: Arc<dyn NotificationProvider>) {
        self.registry.write().await.register(provider);
    }

    /// Send immediately via the best available provider. Never raises — a
    /// missing provider becomes a failure-shaped result.
    pub async fn send(&self, payload: &NotificationPayload) -> NotificationResult {
        tracing::info!("📤 Sending notification: {}", payload.id);
        match self.select_best_provider(payload).await {
            Some(provider) => self.send_via(payload, provider).await,
            None => {
                tracing::error!("❌ No available notification providers for {}", payload.id);
                NotificationResult::failure(payload, "No available notification providers", None)
            }
        }
    }

    /// Send via a specific provider. `Err` only when the id is unknown;
    /// availability, validation, and provider faults are folded into the
    /// result.
    pub async fn send_with_provider(
        &self,
        payload: &NotificationPayload,
        provider_id: &str,
    ) -> Result<NotificationResult> {
        tracing::info!("📤 Sending notification: {} with provider: {}", payload.id, provider_id);
        let provider = self
            .registry
            .read()
            .await
            .get(provider_id)
            .ok_or_else(|| NudgeError::ProviderNotFound(provider_id.to_string()))?;
        Ok(self.send_via(payload, provider).await)
    }

    /// Route one payload: honor its provider hint when set, fall back to
    /// selection otherwise. Used by the sweep.
    pub async fn dispatch(&self, payload: &NotificationPayload) -> NotificationResult {
        match &payload.provider_id {
            Some(hint) => match self.send_with_provider(payload, hint).await {
                Ok(result) => result,
                Err(e) => NotificationResult::failure(payload, e.to_string(), Some(hint)),
            },
            None => self.send(payload).await,
        }
    }

    /// Hand a future-dated payload to the scheduler; returns its id.
    pub async fn schedule(&self, payload: NotificationPayload) -> Result<String> {
        if payload.scheduled_at.is_none() {
            return Err(NudgeError::ScheduledTimeRequired);
        }
        let scheduler = self.scheduler.as_ref().ok_or(NudgeError::SchedulerNotConfigured)?;
        tracing::info!(
            "📅 Scheduling notification: {} for {}",
            payload.id,
            payload.scheduled_at.map(|at| at.to_rfc3339()).unwrap_or_default()
        );
        scheduler.schedule(payload).await
    }

    /// Cancel a pending notification; reports whether an entry was removed.
    pub async fn cancel_scheduled(&self, id: &str) -> Result<bool> {
        let scheduler = self.scheduler.as_ref().ok_or(NudgeError::SchedulerNotConfigured)?;
        let cancelled = scheduler.cancel(id).await;
        if cancelled {
            tracing::info!("🗑️ Cancelled scheduled notification: {id}");
        } else {
            tracing::warn!("⚠️ Nothing to cancel for: {id}");
        }
        Ok(cancelled)
    }

    pub async fn scheduled_notifications(&self) -> Result<Vec<String>> {
        let scheduler = self.scheduler.as_ref().ok_or(NudgeError::SchedulerNotConfigured)?;
        Ok(scheduler.scheduled_notifications().await)
    }

    pub async fn scheduled_notification(&self, id: &str) -> Result<Option<NotificationPayload>> {
        let scheduler = self.scheduler.as_ref().ok_or(NudgeError::SchedulerNotConfigured)?;
        Ok(scheduler.scheduled_notification(id).await)
    }

    /// Availability snapshot of every registered provider, in registration
    /// order.
    pub async fn get_available_providers(&self) -> Vec<ProviderInfo> {
        let providers = self.registry.read().await.list();
        let mut infos = Vec::with_capacity(providers.len());
        for provider in providers {
            infos.push(ProviderInfo {
                id: provider.provider_id().to_string(),
                name: provider.provider_name().to_string(),
                available: provider.is_available().await,
            });
        }
        infos
    }

    /// Exercise a provider end to end, synthesizing a payload when none is
    /// supplied.
    pub async fn test_provider(
        &self,
        provider_id: &str,
        test_payload: Option<NotificationPayload>,
    ) -> Result<NotificationResult> {
        let payload = test_payload.unwrap_or_else(|| {
            NotificationPayload::new(
                &format!("test-{}", uuid::Uuid::new_v4()),
                vec!["test@example.com".into()],
                "Test Notification",
                "This is a test notification",
            )
        });
        tracing::info!("🧪 Testing provider: {provider_id}");
        self.send_with_provider(&payload, provider_id).await
    }

    /// First registered provider that is available and accepts the payload.
    async fn select_best_provider(
        &self,
        payload: &NotificationPayload,
    ) -> Option<Arc<dyn NotificationProvider>> {
        let providers = self.registry.read().await.list();
        for provider in providers {
            if provider.is_available().await && provider.validate_payload(payload) {
                return Some(provider);
            }
        }
        None
    }

    async fn send_via(
        &self,
        payload: &NotificationPayload,
        provider: Arc<dyn NotificationProvider>,
    ) -> NotificationResult {
        let provider_id = provider.provider_id().to_string();

        if !provider.is_available().await {
            return NotificationResult::failure(
                payload,
                format!("Provider not available: {provider_id}"),
                Some(&provider_id),
            );
        }
        if !provider.validate_payload(payload) {
            return NotificationResult::failure(
                payload,
                format!("Invalid payload for provider: {provider_id}"),
                Some(&provider_id),
            );
        }

        match provider.send(payload).await {
            Ok(result) => {
                if result.success {
                    tracing::info!("✅ Notification sent: {} via {}", payload.id, provider_id);
                } else {
                    tracing::warn!(
                        "⚠️ Notification failed: {} via {}: {}",
                        payload.id,
                        provider_id,
                        result.error.as_deref().unwrap_or("unknown")
                    );
                }
                result
            }
            Err(e) => {
                tracing::error!("❌ Provider {provider_id} faulted for {}: {e}", payload.id);
                NotificationResult::failure(payload, e.to_string(), Some(&provider_id))
            }
        }
    }
}
