//! JSON file storage implementation.
//!
//! Stores data as per-user JSON files under a root directory:
//! `posture/<user>.json` (sample history), `progression/<user>.json`
//! (progression record), `badges/<user>.json` (awarded badges).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use deskwell_core::{AwardedBadge, PointAction, PostureSample, ProgressionRecord, Time, UserId};
use tokio::fs;
use tokio::sync::Mutex;

use super::{Result, Storage, StorageError};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
    // Serializes read-modify-write cycles; the files themselves are not locked.
    write_lock: Mutex<()>,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the subdirectories needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("posture")).await?;
        fs::create_dir_all(root.join("progression")).await?;
        fs::create_dir_all(root.join("badges")).await?;

        tracing::debug!(root = %root.display(), "opened json storage");

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    fn posture_path(&self, user: &UserId) -> PathBuf {
        self.root.join("posture").join(file_name(user))
    }
    fn progression_path(&self, user: &UserId) -> PathBuf {
        self.root.join("progression").join(file_name(user))
    }
    fn badges_path(&self, user: &UserId) -> PathBuf {
        self.root.join("badges").join(file_name(user))
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn append_posture_sample(&self, user: &UserId, sample: &PostureSample) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.posture_path(user);
        let mut samples: Vec<PostureSample> = read_json(&path).await?.unwrap_or_default();
        samples.push(sample.clone());
        write_json(&path, &samples).await
    }

    async fn posture_history(&self, user: &UserId, limit: usize) -> Result<Vec<PostureSample>> {
        let mut samples: Vec<PostureSample> =
            read_json(&self.posture_path(user)).await?.unwrap_or_default();
        samples.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        samples.truncate(limit);
        Ok(samples)
    }

    async fn record_points(&self, user: &UserId, action: PointAction, at: Time) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.progression_path(user);
        let mut record: ProgressionRecord = read_json(&path)
            .await?
            .unwrap_or_else(|| ProgressionRecord::new(user.clone()));
        record.grant(action, at);
        write_json(&path, &record).await
    }

    async fn progression(&self, user: &UserId) -> Result<Option<ProgressionRecord>> {
        read_json(&self.progression_path(user)).await
    }

    async fn all_progressions(&self) -> Result<Vec<ProgressionRecord>> {
        let mut records = Vec::new();
        let mut rd = fs::read_dir(self.root.join("progression")).await?;
        while let Some(entry) = rd.next_entry().await? {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            if let Some(record) = read_json::<ProgressionRecord>(&entry.path()).await? {
                records.push(record);
            }
        }
        // Stable sort keeps directory order for equal totals.
        records.sort_by(|a, b| b.total_points.cmp(&a.total_points));
        Ok(records)
    }

    async fn award_badge(&self, award: &AwardedBadge) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.badges_path(&award.user_id);
        let mut badges: Vec<AwardedBadge> = read_json(&path).await?.unwrap_or_default();
        badges.push(award.clone());
        write_json(&path, &badges).await
    }

    async fn badges(&self, user: &UserId) -> Result<Vec<AwardedBadge>> {
        Ok(read_json(&self.badges_path(user)).await?.unwrap_or_default())
    }
}

/// Map a user ID to a safe file name.
fn file_name(user: &UserId) -> String {
    let safe: String = user
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.json", safe)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json.as_bytes()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskwell_core::{BadgeId, HeadAlignment, PostureStatus};

    fn sample(score: u8) -> PostureSample {
        PostureSample::new(
            score,
            PostureStatus::Scored {
                head: HeadAlignment::Good,
                shoulders_uneven: false,
            },
        )
    }

    #[tokio::test]
    async fn posture_history_is_newest_first_and_limited() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let user = UserId::new("alex");

        for score in [60, 70, 80] {
            storage.append_posture_sample(&user, &sample(score)).await.unwrap();
        }

        let history = storage.posture_history(&user, 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history[0].timestamp >= history[1].timestamp);
    }

    #[tokio::test]
    async fn record_points_folds_into_total() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let user = UserId::new("alex");
        let now = chrono::Utc::now();

        storage.record_points(&user, PointAction::GoodPosture, now).await.unwrap();
        storage.record_points(&user, PointAction::ExcellentPosture, now).await.unwrap();

        let record = storage.progression(&user).await.unwrap().unwrap();
        assert_eq!(record.total_points, 30);
        assert_eq!(record.history.len(), 2);
    }

    #[tokio::test]
    async fn all_progressions_sorts_by_points_descending() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let now = chrono::Utc::now();

        storage
            .record_points(&UserId::new("low"), PointAction::GoodPosture, now)
            .await
            .unwrap();
        storage
            .record_points(&UserId::new("high"), PointAction::DailyGoalMet, now)
            .await
            .unwrap();

        let all = storage.all_progressions().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].user_id, UserId::new("high"));
    }

    #[tokio::test]
    async fn badges_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let user = UserId::new("alex");

        storage
            .award_badge(&AwardedBadge {
                user_id: user.clone(),
                badge: BadgeId::PostureNovice,
                awarded_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        let badges = storage.badges(&user).await.unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge, BadgeId::PostureNovice);
    }

    #[tokio::test]
    async fn unknown_user_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        let user = UserId::new("nobody");

        assert!(storage.posture_history(&user, 10).await.unwrap().is_empty());
        assert!(storage.progression(&user).await.unwrap().is_none());
        assert!(storage.badges(&user).await.unwrap().is_empty());
    }
}
