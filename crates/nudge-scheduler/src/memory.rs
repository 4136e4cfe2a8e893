//! In-memory scheduler — a single locked map from notification id to its
//! pending payload.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use nudge_core::error::{NudgeError, Result};
use nudge_core::traits::NotificationScheduler;
use nudge_core::types::NotificationPayload;

#[derive(Default)]
pub struct InMemoryScheduler {
    entries: Mutex<HashMap<String, NotificationPayload>>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim every entry due at `now`. Split out from the trait method so
    /// tests can drive the clock.
    pub async fn take_due_at(&self, now: DateTime<Utc>) -> Vec<NotificationPayload> {
        let mut entries = self.entries.lock().await;
        let due_ids: Vec<String> = entries
            .iter()
            .filter(|(_, payload)| payload.scheduled_at.is_some_and(|at| at <= now))
            .map(|(id, _)| id.clone())
            .collect();
        due_ids
            .iter()
            .filter_map(|id| entries.remove(id))
            .collect()
    }

    pub async fn process_due_at(&self, now: DateTime<Utc>) -> usize {
        let due = self.take_due_at(now).await;
        tracing::info!("🔔 Found {} due notifications", due.len());
        due.len()
    }
}

#[async_trait]
impl NotificationScheduler for InMemoryScheduler {
    async fn schedule(&self, payload: NotificationPayload) -> Result<String> {
        if payload.scheduled_at.is_none() {
            return Err(NudgeError::ScheduledTimeRequired);
        }
        payload.validate(Utc::now())?;

        let id = payload.id.clone();
        tracing::info!(
            "📅 Scheduled notification: {id} for {}",
            payload.scheduled_at.map(|at| at.to_rfc3339()).unwrap_or_default()
        );
        // Same id overwrites — callers pre-generate unique ids.
        self.entries.lock().await.insert(id.clone(), payload);
        Ok(id)
    }

    async fn cancel(&self, id: &str) -> bool {
        let cancelled = self.entries.lock().await.remove(id).is_some();
        if cancelled {
            tracing::info!("🗑️ Cancelled scheduled notification: {id}");
        } else {
            tracing::warn!("⚠️ Nothing to cancel for: {id} (not found)");
        }
        cancelled
    }

    async fn update(&self, id: &str, payload: NotificationPayload) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(id) {
            return Ok(false);
        }
        entries.insert(id.to_string(), payload);
        tracing::info!("✏️ Updated scheduled notification: {id}");
        Ok(true)
    }

    async fn scheduled_notifications(&self) -> Vec<String> {
        self.entries.lock().await.keys().cloned().collect()
    }

    async fn scheduled_notification(&self, id: &str) -> Option<NotificationPayload> {
        self.entries.lock().await.get(id).cloned()
    }

    async fn take_due(&self) -> Vec<NotificationPayload> {
        self.take_due_at(Utc::now()).await
    }

    async fn process_due_notifications(&self) -> usize {
        self.process_due_at(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn payload(id: &str, scheduled_at: Option<DateTime<Utc>>) -> NotificationPayload {
        let mut p = NotificationPayload::new(id, vec!["dev@example.com".into()], "Subject", "Body");
        p.scheduled_at = scheduled_at;
        p
    }

    #[tokio::test]
    async fn schedule_requires_scheduled_time() {
        let scheduler = InMemoryScheduler::new();
        let err = scheduler.schedule(payload("n-1", None)).await.unwrap_err();
        assert!(matches!(err, NudgeError::ScheduledTimeRequired));
    }

    #[tokio::test]
    async fn schedule_rejects_past_times() {
        let scheduler = InMemoryScheduler::new();
        let past = Utc::now() - Duration::minutes(1);
        assert!(scheduler.schedule(payload("n-1", Some(past))).await.is_err());
    }

    #[tokio::test]
    async fn round_trip_then_cancel() {
        let scheduler = InMemoryScheduler::new();
        let p = payload("n-1", Some(Utc::now() + Duration::hours(1)));
        let id = scheduler.schedule(p.clone()).await.unwrap();
        assert_eq!(id, "n-1");
        assert_eq!(scheduler.scheduled_notification("n-1").await, Some(p));

        assert!(scheduler.cancel("n-1").await);
        assert!(scheduler.scheduled_notification("n-1").await.is_none());
        // Second cancel is a safe no-op that reports false.
        assert!(!scheduler.cancel("n-1").await);
    }

    #[tokio::test]
    async fn update_only_existing_entries() {
        let scheduler = InMemoryScheduler::new();
        let at = Utc::now() + Duration::hours(1);
        assert!(!scheduler.update("n-1", payload("n-1", Some(at))).await.unwrap());

        scheduler.schedule(payload("n-1", Some(at))).await.unwrap();
        let mut updated = payload("n-1", Some(at));
        updated.subject = "Changed".into();
        assert!(scheduler.update("n-1", updated).await.unwrap());
        assert_eq!(
            scheduler.scheduled_notification("n-1").await.unwrap().subject,
            "Changed"
        );
    }

    #[tokio::test]
    async fn duplicate_id_overwrites() {
        let scheduler = InMemoryScheduler::new();
        let at = Utc::now() + Duration::hours(1);
        scheduler.schedule(payload("n-1", Some(at))).await.unwrap();
        let mut second = payload("n-1", Some(at));
        second.content = "Replaced".into();
        scheduler.schedule(second).await.unwrap();
        assert_eq!(scheduler.scheduled_notifications().await.len(), 1);
        assert_eq!(
            scheduler.scheduled_notification("n-1").await.unwrap().content,
            "Replaced"
        );
    }

    #[tokio::test]
    async fn sweep_with_nothing_due_is_a_no_op() {
        let scheduler = InMemoryScheduler::new();
        let now = Utc::now();
        scheduler.schedule(payload("n-1", Some(now + Duration::hours(1)))).await.unwrap();
        assert_eq!(scheduler.process_due_at(now).await, 0);
        assert_eq!(scheduler.scheduled_notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn sweep_claims_everything_due() {
        let scheduler = InMemoryScheduler::new();
        let now = Utc::now();
        scheduler.schedule(payload("n-1", Some(now + Duration::hours(1)))).await.unwrap();
        scheduler.schedule(payload("n-2", Some(now + Duration::minutes(30)))).await.unwrap();
        assert_eq!(scheduler.process_due_at(now + Duration::hours(2)).await, 2);
        assert!(scheduler.scheduled_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn sweep_after_clock_advance_claims_the_entry() {
        let scheduler = InMemoryScheduler::new();
        let now = Utc::now();
        scheduler.schedule(payload("n-1", Some(now + Duration::hours(1)))).await.unwrap();

        let due = scheduler.take_due_at(now + Duration::hours(2)).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "n-1");
        assert!(scheduler.scheduled_notification("n-1").await.is_none());
    }
}
