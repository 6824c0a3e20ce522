//! In-memory storage implementation.
//!
//! Used by tests and ephemeral runs where nothing should outlive the
//! process. Progression records are kept in insertion order so leaderboard
//! tie order is stable across calls.

use std::collections::HashMap;

use async_trait::async_trait;
use deskwell_core::{AwardedBadge, PointAction, PostureSample, ProgressionRecord, Time, UserId};
use tokio::sync::Mutex;

use super::{Result, Storage};

#[derive(Default)]
struct Inner {
    posture: HashMap<UserId, Vec<PostureSample>>,
    progression: Vec<ProgressionRecord>,
    badges: Vec<AwardedBadge>,
}

/// HashMap-backed storage behind a single async mutex.
#[derive(Default)]
pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn append_posture_sample(&self, user: &UserId, sample: &PostureSample) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .posture
            .entry(user.clone())
            .or_default()
            .push(sample.clone());
        Ok(())
    }

    async fn posture_history(&self, user: &UserId, limit: usize) -> Result<Vec<PostureSample>> {
        let inner = self.inner.lock().await;
        let mut samples = inner.posture.get(user).cloned().unwrap_or_default();
        samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        samples.truncate(limit);
        Ok(samples)
    }

    async fn record_points(&self, user: &UserId, action: PointAction, at: Time) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.progression.iter_mut().find(|r| &r.user_id == user) {
            Some(record) => record.grant(action, at),
            None => {
                let mut record = ProgressionRecord::new(user.clone());
                record.grant(action, at);
                inner.progression.push(record);
            }
        }
        Ok(())
    }

    async fn progression(&self, user: &UserId) -> Result<Option<ProgressionRecord>> {
        let inner = self.inner.lock().await;
        Ok(inner.progression.iter().find(|r| &r.user_id == user).cloned())
    }

    async fn all_progressions(&self) -> Result<Vec<ProgressionRecord>> {
        let inner = self.inner.lock().await;
        let mut records = inner.progression.clone();
        // Stable sort keeps insertion order for equal totals.
        records.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        Ok(records)
    }

    async fn award_badge(&self, award: &AwardedBadge) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.badges.push(award.clone());
        Ok(())
    }

    async fn badges(&self, user: &UserId) -> Result<Vec<AwardedBadge>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .badges
            .iter()
            .filter(|b| &b.user_id == user)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskwell_core::PostureStatus;

    #[tokio::test]
    async fn history_is_per_user() {
        let storage = MemoryStorage::new();
        let a = UserId::new("a");
        let b = UserId::new("b");

        let sample = PostureSample::new(42, PostureStatus::NoPersonDetected);
        storage.append_posture_sample(&a, &sample).await.unwrap();

        assert_eq!(storage.posture_history(&a, 10).await.unwrap().len(), 1);
        assert!(storage.posture_history(&b, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leaderboard_ties_keep_insertion_order() {
        let storage = MemoryStorage::new();
        let now = chrono::Utc::now();

        storage
            .record_points(&UserId::new("first"), PointAction::GoodPosture, now)
            .await
            .unwrap();
        storage
            .record_points(&UserId::new("second"), PointAction::GoodPosture, now)
            .await
            .unwrap();

        let all = storage.all_progressions().await.unwrap();
        assert_eq!(all[0].user_id, UserId::new("first"));
        assert_eq!(all[1].user_id, UserId::new("second"));
    }
}
