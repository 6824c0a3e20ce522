//! Break reminders and posture alerts.
//!
//! A debounced, rate-limited state machine over the incoming score
//! stream, plus the notification payloads the UI collaborator renders.

#![warn(missing_docs)]

pub mod engine;
pub mod notify;

pub use engine::{AlertEngine, AlertState};
pub use notify::Notification;
