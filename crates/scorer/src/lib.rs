//! Pose scoring for deskwell.
//!
//! Converts a camera frame into an annotated frame, a posture status, and
//! a numeric score, using an injected landmark-detection capability.

#![warn(missing_docs)]

pub mod estimator;
pub mod analyzer;
pub mod fixture;

pub use estimator::{Keypoint, Landmark, PoseEstimator, PoseLandmarks};
pub use analyzer::{score_pose, PoseScorer, ScoredFrame};
pub use fixture::FixturePose;
