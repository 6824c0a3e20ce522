//! Camera frame.

use crate::Time;
use image::RgbImage;

/// An owned, timestamped pixel buffer.
///
/// Frames are transient: the capture slot holds exactly one at a time and
/// readers always receive an independent copy, never an alias into the
/// writer's buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    /// When the frame was captured
    pub timestamp: Time,

    /// RGB pixel data
    pub image: RgbImage,
}

impl Frame {
    /// Create a frame captured now.
    pub fn new(image: RgbImage) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            image,
        }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}
