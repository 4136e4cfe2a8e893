//! # Nudge Extractor
//!
//! Turns a free-text prompt into an [`ExtractedTask`](nudge_core::ExtractedTask)
//! via one OpenAI-compatible chat-completions call with a forced function
//! call. The call is wrapped in the core retry policy; only transport-shaped
//! failures are retried, model-output failures are terminal per attempt.

pub mod client;
pub mod error;
pub mod prompt;
pub mod schema;

pub use client::ExtractionClient;
pub use error::ExtractError;
