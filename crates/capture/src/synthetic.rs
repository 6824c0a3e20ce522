//! Synthetic camera device.
//!
//! Generates a moving test pattern at a fixed rate. Used by tests and by
//! the CLI when no real camera backend is wired in.

use std::time::Duration;

use image::{Rgb, RgbImage};

use crate::device::{CameraDevice, CaptureError};

/// A camera that renders a gradient test pattern.
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    frame_interval: Duration,
    tick: u32,
}

impl SyntheticCamera {
    /// "Open" a synthetic device. Device IDs other than 0 are treated as
    /// absent hardware so acquisition failure paths stay exercisable.
    pub fn open(device_id: u32, width: u32, height: u32) -> Result<Self, CaptureError> {
        if device_id != 0 {
            return Err(CaptureError::DeviceUnavailable(format!(
                "no synthetic device with id {device_id}"
            )));
        }
        Ok(Self {
            width,
            height,
            frame_interval: Duration::from_millis(33),
            tick: 0,
        })
    }
}

impl CameraDevice for SyntheticCamera {
    fn read_frame(&mut self) -> Result<RgbImage, CaptureError> {
        std::thread::sleep(self.frame_interval);
        self.tick = self.tick.wrapping_add(1);

        let tick = self.tick;
        let image = RgbImage::from_fn(self.width, self.height, |x, y| {
            let r = ((x + tick) % 256) as u8;
            let g = ((y + tick) % 256) as u8;
            Rgb([r, g, 128])
        });
        Ok(image)
    }
}
