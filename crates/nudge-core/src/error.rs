//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Workspace-wide error type. Extraction has its own taxonomy in
/// `nudge-extractor`; everything orchestration-shaped lives here.
#[derive(Error, Debug)]
pub enum NudgeError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Provider not available: {0}")]
    ProviderUnavailable(String),

    #[error("Invalid payload for provider: {0}")]
    InvalidPayload(String),

    #[error("No available notification providers")]
    NoAvailableProvider,

    #[error("Scheduled time is required for scheduling notifications")]
    ScheduledTimeRequired,

    #[error("Notification scheduler not configured")]
    SchedulerNotConfigured,

    #[error("Scheduling error: {0}")]
    Schedule(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, NudgeError>;
