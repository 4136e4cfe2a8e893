//! # Nudge Reminders
//!
//! The thin composition root: extraction on one side, notification
//! orchestration on the other. This is the only crate touching both halves.

pub mod pipeline;

pub use pipeline::{CreateReminder, Reminder, ReminderError, ReminderPipeline};
