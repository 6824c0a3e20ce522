//! Scripted pose estimator.
//!
//! Returns a fixed landmark set regardless of input. Used by tests and by
//! the CLI demo path; real model backends implement [`PoseEstimator`]
//! directly.

use image::RgbImage;

use crate::estimator::{Keypoint, Landmark, PoseEstimator, PoseLandmarks};

/// An estimator that always reports the same pose.
#[derive(Debug, Clone)]
pub struct FixturePose {
    landmarks: Option<PoseLandmarks>,
}

impl FixturePose {
    /// Never detects a person.
    pub fn none() -> Self {
        Self { landmarks: None }
    }

    /// Detects exactly the given landmark set.
    pub fn with_landmarks(landmarks: PoseLandmarks) -> Self {
        Self {
            landmarks: Some(landmarks),
        }
    }

    /// An upright pose: vertical ear-shoulder-hip line, level shoulders.
    pub fn upright() -> Self {
        Self::with_landmarks(PoseLandmarks::from_points([
            (Keypoint::LeftEar, Landmark::new(0.40, 0.30)),
            (Keypoint::RightEar, Landmark::new(0.60, 0.30)),
            (Keypoint::LeftShoulder, Landmark::new(0.40, 0.50)),
            (Keypoint::RightShoulder, Landmark::new(0.60, 0.50)),
            (Keypoint::LeftHip, Landmark::new(0.40, 0.90)),
            (Keypoint::RightHip, Landmark::new(0.60, 0.90)),
        ]))
    }

    /// A slouched pose: forward head and uneven shoulders.
    pub fn slouched() -> Self {
        Self::with_landmarks(PoseLandmarks::from_points([
            (Keypoint::LeftEar, Landmark::new(0.55, 0.35)),
            (Keypoint::RightEar, Landmark::new(0.72, 0.35)),
            (Keypoint::LeftShoulder, Landmark::new(0.40, 0.50)),
            (Keypoint::RightShoulder, Landmark::new(0.60, 0.58)),
            (Keypoint::LeftHip, Landmark::new(0.40, 0.90)),
            (Keypoint::RightHip, Landmark::new(0.60, 0.90)),
        ]))
    }
}

impl PoseEstimator for FixturePose {
    fn detect(&self, _image: &RgbImage) -> Option<PoseLandmarks> {
        self.landmarks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_has_every_required_keypoint() {
        let pose = FixturePose::upright();
        let landmarks = pose.detect(&RgbImage::new(8, 8)).unwrap();
        for keypoint in Keypoint::ALL {
            assert!(landmarks.get(keypoint).is_some());
        }
    }

    #[test]
    fn none_detects_nothing() {
        assert!(FixturePose::none().detect(&RgbImage::new(8, 8)).is_none());
    }
}
