//! Threaded camera capture for deskwell.
//!
//! A dedicated capture thread continuously pulls frames from a
//! [`CameraDevice`] and publishes only the most recent one into a
//! single-slot buffer; the pipeline reads from the slot without ever
//! blocking on device I/O.

#![warn(missing_docs)]

pub mod device;
pub mod source;
pub mod synthetic;

pub use device::{CameraDevice, CaptureError};
pub use source::FrameSource;
pub use synthetic::SyntheticCamera;
