//! Posture sample - the scorer's per-frame verdict.

use crate::Time;
use serde::{Deserialize, Serialize};

/// Head position relative to the shoulders, derived from the neck angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadAlignment {
    /// Neck angle in the upright band
    Good,
    /// Slight forward head
    FairForward,
    /// Pronounced forward head
    PoorForward,
}

/// Outcome of analyzing a single frame.
///
/// The head deduction and the shoulder deduction are independent, so a
/// scored status carries both rather than a single flat label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostureStatus {
    /// Landmarks were found and scored
    Scored {
        /// Head position band
        head: HeadAlignment,
        /// Whether the shoulder-alignment deduction applied
        shoulders_uneven: bool,
    },
    /// The detector returned no landmarks
    NoPersonDetected,
    /// Landmarks were returned but an expected keypoint was missing
    AnalysisError,
}

impl PostureStatus {
    /// Whether this status carries a meaningful score.
    pub fn is_scored(&self) -> bool {
        matches!(self, PostureStatus::Scored { .. })
    }
}

impl std::fmt::Display for PostureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostureStatus::Scored {
                head,
                shoulders_uneven,
            } => {
                let base = match head {
                    HeadAlignment::Good => "Good Posture",
                    HeadAlignment::FairForward => "Fair - Slight Forward Head",
                    HeadAlignment::PoorForward => "Poor - Head Forward",
                };
                f.write_str(base)?;
                if *shoulders_uneven {
                    f.write_str(" (Shoulders Uneven)")?;
                }
                Ok(())
            }
            PostureStatus::NoPersonDetected => f.write_str("No person detected"),
            PostureStatus::AnalysisError => f.write_str("Error"),
        }
    }
}

/// A scored frame, immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureSample {
    /// When the underlying frame was analyzed
    pub timestamp: Time,

    /// Posture quality, 0..=100
    pub score: u8,

    /// Status label for the sample
    pub status: PostureStatus,
}

impl PostureSample {
    /// Create a sample timestamped now.
    pub fn new(score: u8, status: PostureStatus) -> Self {
        Self {
            timestamp: chrono::Utc::now(),
            score,
            status,
        }
    }
}
