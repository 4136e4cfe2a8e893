//! Capability traits — the seams the notification system extends through.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{NotificationPayload, NotificationResult};

/// A pluggable delivery mechanism (console, webhook, email, ...).
///
/// `send` reports expected failures through a `success = false` result rather
/// than an `Err`; an `Err` is reserved for faults the provider itself did not
/// anticipate, and the orchestrator converts those into failure results.
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Process-wide short identifier, immutable after registration.
    fn provider_id(&self) -> &str;

    /// Human-readable display name.
    fn provider_name(&self) -> &str;

    /// Deliver the payload.
    async fn send(&self, payload: &NotificationPayload) -> Result<NotificationResult>;

    /// Cheap, side-effect-free readiness probe.
    async fn is_available(&self) -> bool;

    /// Structural check against this provider's delivery requirements.
    fn validate_payload(&self, payload: &NotificationPayload) -> bool;
}

/// Holds not-yet-due notifications and sweeps them when due.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    /// Store the payload keyed by its own id. Rejects payloads without a
    /// `scheduled_at`. An existing entry with the same id is overwritten —
    /// callers pre-generate unique ids.
    async fn schedule(&self, payload: NotificationPayload) -> Result<String>;

    /// Remove the entry if present. Idempotent: the second cancel of the same
    /// id reports `false`.
    async fn cancel(&self, id: &str) -> bool;

    /// Replace the stored payload, only if the id currently exists.
    async fn update(&self, id: &str, payload: NotificationPayload) -> Result<bool>;

    /// Every pending id, each exactly once. Order is unspecified.
    async fn scheduled_notifications(&self) -> Vec<String>;

    /// Stored payload for the id, if still pending.
    async fn scheduled_notification(&self, id: &str) -> Option<NotificationPayload>;

    /// Atomically claim every due entry (scheduled_at <= now), removing it
    /// from the pending set. The caller owns dispatch of the returned
    /// payloads — on failure it re-schedules, so nothing is dropped.
    async fn take_due(&self) -> Vec<NotificationPayload>;

    /// Claim-and-count form of the sweep: removes every due entry and returns
    /// how many there were.
    async fn process_due_notifications(&self) -> usize;
}
