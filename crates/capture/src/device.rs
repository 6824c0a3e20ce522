//! Camera device abstraction.

use image::RgbImage;

/// Errors from camera acquisition and capture.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The device could not be opened. Fatal to starting monitoring.
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),

    /// A single read failed. Transient; the capture loop retries.
    #[error("camera read failed: {0}")]
    ReadFailed(String),
}

/// A camera device handle.
///
/// Implementations own the underlying handle and release it on drop.
/// `read_frame` may block for the duration of one device read but must
/// return within a bounded time so the capture loop can observe its stop
/// flag; failures are reported, not retried, at this level.
pub trait CameraDevice: Send + 'static {
    /// Pull the next raw frame from the device.
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError>;
}
