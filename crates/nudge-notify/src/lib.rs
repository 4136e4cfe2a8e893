//! # Nudge Notify
//!
//! Delivery side of the pipeline: the provider implementations (console,
//! webhook, email), the provider registry, and the orchestrator that picks a
//! provider, validates the payload, and sends or schedules.

pub mod console;
pub mod email;
pub mod orchestrator;
pub mod registry;
pub mod webhook;

pub use console::ConsoleProvider;
pub use email::EmailProvider;
pub use orchestrator::NotificationOrchestrator;
pub use registry::ProviderRegistry;
pub use webhook::WebhookProvider;
