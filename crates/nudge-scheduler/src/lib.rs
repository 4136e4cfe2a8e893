//! # Nudge Scheduler
//!
//! Holds not-yet-due notifications in memory and sweeps them on an interval.
//! Pending entries are lost on restart — this is the documented trade-off of
//! the in-memory backend, not an accident.
//!
//! The sweep claims due entries atomically and re-schedules any whose
//! dispatch fails, so a delivery fault never silently drops a notification.

pub mod memory;
pub mod sweep;

pub use memory::InMemoryScheduler;
pub use sweep::{spawn_sweeper, sweep_once};
