//! Due-item sweep — claims due notifications and drives their dispatch.
//!
//! Claim and dispatch are fused: a payload leaves the pending set only by
//! being handed to the dispatcher, and a failed dispatch puts it back with a
//! redelivery delay. Delivery is therefore at-least-once, bounded by the
//! payload's retry budget.

use std::sync::Arc;

use chrono::{Duration, Utc};

use nudge_core::traits::NotificationScheduler;
use nudge_core::types::{NotificationPayload, NotificationResult};

/// Redelivery budget when the payload carries no override.
pub const DEFAULT_MAX_REDELIVERIES: u32 = 3;
/// Delay before a redelivery attempt when the payload carries no override.
pub const DEFAULT_REDELIVERY_DELAY_MS: u64 = 60_000;

const ATTEMPT_KEY: &str = "delivery_attempt";

/// Run one sweep: claim every due entry, dispatch it, and re-schedule
/// failures. Returns the number of entries claimed.
pub async fn sweep_once<F, Fut>(scheduler: &Arc<dyn NotificationScheduler>, dispatch: &F) -> usize
where
    F: Fn(NotificationPayload) -> Fut + Send + Sync,
    Fut: Future<Output = NotificationResult> + Send,
{
    let due = scheduler.take_due().await;
    let claimed = due.len();
    let now = Utc::now();

    for mut payload in due {
        if payload.expires_at.is_some_and(|exp| exp <= now) {
            tracing::warn!("⏳ Notification expired before dispatch: {}", payload.id);
            continue;
        }

        let result = dispatch(payload.clone()).await;
        if result.success {
            continue;
        }

        let attempt = payload
            .metadata
            .get(ATTEMPT_KEY)
            .and_then(|v| v.as_u64())
            .unwrap_or(0) as u32
            + 1;
        let (max_redeliveries, delay_ms) = payload
            .retry_config
            .as_ref()
            .map(|c| (c.max_retries, c.retry_delay_ms))
            .unwrap_or((DEFAULT_MAX_REDELIVERIES, DEFAULT_REDELIVERY_DELAY_MS));

        if attempt > max_redeliveries {
            tracing::error!(
                "❌ Dropping notification {} after {} failed deliveries: {}",
                payload.id,
                attempt,
                result.error.as_deref().unwrap_or("unknown")
            );
            continue;
        }

        payload
            .metadata
            .insert(ATTEMPT_KEY.into(), serde_json::Value::from(attempt));
        payload.scheduled_at = Some(now + Duration::milliseconds(delay_ms as i64));
        tracing::warn!(
            "🔁 Redelivery {}/{} queued for {} in {}ms",
            attempt,
            max_redeliveries,
            payload.id,
            delay_ms
        );
        if let Err(e) = scheduler.schedule(payload).await {
            tracing::error!("❌ Failed to re-schedule notification: {e}");
        }
    }

    claimed
}

/// Spawn the sweep loop as a background tokio task.
pub fn spawn_sweeper<F, Fut>(
    scheduler: Arc<dyn NotificationScheduler>,
    dispatch: F,
    check_interval_secs: u64,
) -> tokio::task::JoinHandle<()>
where
    F: Fn(NotificationPayload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = NotificationResult> + Send + 'static,
{
    tokio::spawn(async move {
        tracing::info!("⏰ Notification sweep started (check every {check_interval_secs}s)");
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(check_interval_secs));
        loop {
            interval.tick().await;
            let dispatched = sweep_once(&scheduler, &dispatch).await;
            if dispatched > 0 {
                tracing::info!("📣 Sweep dispatched {dispatched} notifications");
            }
        }
    })
}
