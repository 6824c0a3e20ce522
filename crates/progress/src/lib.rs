//! Points, badges, and streaks.
//!
//! The progression engine consumes the score stream indirectly: it reads
//! back the persisted posture history and progression records to compute
//! badge unlocks, streaks, and aggregate statistics.

#![warn(missing_docs)]

pub mod engine;
pub mod stats;

pub use engine::{ProgressionEngine, UserStats};
pub use stats::{Analytics, PostureStatistics};
