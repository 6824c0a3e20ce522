//! Pipeline orchestration.
//!
//! Drives the monitoring loop: latest frame in, score out, alert and
//! progression engines advanced, persistence and UI collaborators fed.

#![warn(missing_docs)]

pub mod monitor;
pub mod ui;

pub use monitor::{Monitor, MonitorConfig, StopHandle};
pub use ui::{FrameUpdate, LogUi, UiSink};
