//! Landmark detection capability.
//!
//! The detection model itself is outside this crate; anything that can
//! turn an image into named 2-D keypoints plugs in through
//! [`PoseEstimator`].

use std::collections::HashMap;

use image::RgbImage;

/// Named body keypoints the scorer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keypoint {
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
}

impl Keypoint {
    /// Every keypoint the scorer requires.
    pub const ALL: [Keypoint; 6] = [
        Keypoint::LeftShoulder,
        Keypoint::RightShoulder,
        Keypoint::LeftEar,
        Keypoint::RightEar,
        Keypoint::LeftHip,
        Keypoint::RightHip,
    ];
}

/// A detected 2-D keypoint, coordinates normalized to `[0, 1]` within the
/// image handed to the estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// Normalized x
    pub x: f32,
    /// Normalized y
    pub y: f32,
    /// Detection confidence, `[0, 1]`
    pub visibility: f32,
}

impl Landmark {
    /// Create a fully-visible landmark.
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: 1.0,
        }
    }
}

/// The set of landmarks detected in one image.
///
/// An estimator is free to return a partial set; the scorer treats a
/// missing required keypoint as an analysis error, not a panic.
#[derive(Debug, Clone, Default)]
pub struct PoseLandmarks {
    points: HashMap<Keypoint, Landmark>,
}

impl PoseLandmarks {
    /// Build from (keypoint, landmark) pairs.
    pub fn from_points(points: impl IntoIterator<Item = (Keypoint, Landmark)>) -> Self {
        Self {
            points: points.into_iter().collect(),
        }
    }

    /// Look up a keypoint.
    pub fn get(&self, keypoint: Keypoint) -> Option<Landmark> {
        self.points.get(&keypoint).copied()
    }

    /// Iterate over all detected keypoints.
    pub fn iter(&self) -> impl Iterator<Item = (Keypoint, Landmark)> + '_ {
        self.points.iter().map(|(k, l)| (*k, *l))
    }
}

/// Opaque landmark-detection capability.
pub trait PoseEstimator: Send + Sync {
    /// Detect body landmarks in an image; `None` when no person is visible.
    fn detect(&self, image: &RgbImage) -> Option<PoseLandmarks>;
}
