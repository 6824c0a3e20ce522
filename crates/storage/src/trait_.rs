//! Storage trait abstraction.

use async_trait::async_trait;
use deskwell_core::{AwardedBadge, PointAction, PostureSample, ProgressionRecord, Time, UserId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend unavailable
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for deskwell data.
///
/// Methods take `&self`; backends use interior mutability so a single
/// handle can be shared between the pipeline and the progression engine.
/// Callers in the monitoring loop treat every failure as non-fatal.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Posture history ===

    /// Append a posture sample to a user's history.
    async fn append_posture_sample(&self, user: &UserId, sample: &PostureSample) -> Result<()>;

    /// Load up to `limit` samples for a user, newest first.
    async fn posture_history(&self, user: &UserId, limit: usize) -> Result<Vec<PostureSample>>;

    // === Progression ===

    /// Grant points for an action: one logical read-modify-write that
    /// appends a history entry and bumps the total.
    async fn record_points(&self, user: &UserId, action: PointAction, at: Time) -> Result<()>;

    /// Load a user's progression record.
    async fn progression(&self, user: &UserId) -> Result<Option<ProgressionRecord>>;

    /// Load every progression record, ordered by total points descending.
    /// Tie order is whatever the backend iterates, stable within one call.
    async fn all_progressions(&self) -> Result<Vec<ProgressionRecord>>;

    // === Badges ===

    /// Record an awarded badge.
    async fn award_badge(&self, award: &AwardedBadge) -> Result<()>;

    /// Load all badges awarded to a user.
    async fn badges(&self, user: &UserId) -> Result<Vec<AwardedBadge>>;
}
