//! Aggregate posture statistics and insight text.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use deskwell_core::{Time, UserId};
use deskwell_storage::{Result, Storage};

/// Records considered when computing aggregate statistics.
const STATS_HISTORY_WINDOW: usize = 1000;

/// Aggregate posture numbers over the recent history window.
#[derive(Debug, Clone, Default)]
pub struct PostureStatistics {
    /// Mean score
    pub average_score: f32,

    /// Highest score
    pub best_score: u8,

    /// Lowest score
    pub worst_score: u8,

    /// Number of records considered
    pub total_sessions: usize,

    /// Share of records at or above the good threshold, 0..=100
    pub good_posture_percentage: f32,
}

/// Read-only aggregate queries over the posture history.
pub struct Analytics {
    storage: Arc<dyn Storage>,
}

impl Analytics {
    /// Create an analytics view over a storage handle.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Aggregate statistics over the recent window. All zeros without
    /// history.
    pub async fn statistics(&self, user: &UserId) -> Result<PostureStatistics> {
        let records = self
            .storage
            .posture_history(user, STATS_HISTORY_WINDOW)
            .await?;
        if records.is_empty() {
            return Ok(PostureStatistics::default());
        }

        let scores: Vec<u8> = records.iter().map(|r| r.score).collect();
        let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
        let good = scores.iter().filter(|&&s| s >= 70).count();

        Ok(PostureStatistics {
            average_score: sum as f32 / scores.len() as f32,
            best_score: scores.iter().copied().max().unwrap_or(0),
            worst_score: scores.iter().copied().min().unwrap_or(0),
            total_sessions: scores.len(),
            good_posture_percentage: good as f32 / scores.len() as f32 * 100.0,
        })
    }

    /// Mean score per calendar day over the trailing `days`, oldest
    /// first. Days without records are omitted.
    pub async fn daily_averages(
        &self,
        user: &UserId,
        days: u32,
        now: Time,
    ) -> Result<Vec<(NaiveDate, f32)>> {
        let start = now - Duration::days(i64::from(days));
        let records = self
            .storage
            .posture_history(user, STATS_HISTORY_WINDOW)
            .await?;

        let mut by_day: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();
        for record in records {
            if record.timestamp >= start && record.timestamp <= now {
                by_day
                    .entry(record.timestamp.date_naive())
                    .or_default()
                    .push(record.score);
            }
        }

        Ok(by_day
            .into_iter()
            .map(|(date, scores)| {
                let sum: u32 = scores.iter().map(|&s| u32::from(s)).sum();
                (date, sum as f32 / scores.len() as f32)
            })
            .collect())
    }

    /// Plain-text observations about the user's recent posture.
    pub async fn insights(&self, user: &UserId) -> Result<Vec<String>> {
        let stats = self.statistics(user).await?;
        let mut insights = Vec::new();

        insights.push(
            if stats.average_score >= 80.0 {
                "Excellent work! Your average posture is outstanding."
            } else if stats.average_score >= 70.0 {
                "Good job! Your posture is above average."
            } else if stats.average_score >= 50.0 {
                "Fair posture. Consider taking more frequent breaks."
            } else {
                "Your posture needs improvement. Focus on sitting upright."
            }
            .to_string(),
        );

        if stats.good_posture_percentage >= 75.0 {
            insights.push(format!(
                "You maintain good posture {:.1}% of the time!",
                stats.good_posture_percentage
            ));
        } else {
            insights.push(format!(
                "Try to increase your good posture percentage (currently {:.1}%).",
                stats.good_posture_percentage
            ));
        }

        Ok(insights)
    }
}
