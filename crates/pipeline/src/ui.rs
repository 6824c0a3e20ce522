//! Rendering collaborator interface.

use deskwell_alerts::Notification;
use deskwell_core::PostureStatus;
use image::RgbImage;

/// One tick's worth of display data.
#[derive(Debug, Clone)]
pub struct FrameUpdate {
    /// Annotated frame at original resolution
    pub image: RgbImage,
    /// Status label for the frame
    pub status: PostureStatus,
    /// Posture score, 0..=100
    pub score: u8,
}

/// Where the pipeline sends display data and popup events.
///
/// Widget layout, chart drawing, and popup styling all live behind this
/// seam.
pub trait UiSink: Send + Sync {
    /// Receive the scored frame for the current tick.
    fn present(&self, update: FrameUpdate);

    /// Receive a discrete notification to render as a transient popup.
    fn notify(&self, notification: Notification);
}

/// Headless sink that reports through the log.
pub struct LogUi;

impl UiSink for LogUi {
    fn present(&self, update: FrameUpdate) {
        tracing::info!(score = update.score, status = %update.status, "frame scored");
    }

    fn notify(&self, notification: Notification) {
        tracing::info!(title = %notification.title, "notification");
    }
}
