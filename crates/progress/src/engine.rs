//! Progression engine: point grants, badge unlocks, streaks, leaderboard.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use deskwell_core::{AwardedBadge, BadgeId, BadgeThreshold, PointAction, PointGrant, Time, UserId};
use deskwell_storage::{Result, Storage};

/// How many history records badge checks look back over.
const BADGE_HISTORY_WINDOW: usize = 500;

/// How many history records streak calculation looks back over.
const STREAK_HISTORY_WINDOW: usize = 1000;

/// Score at or above which a record counts as a good-posture minute.
const GOOD_POSTURE_SCORE: u8 = 70;

/// Aggregate view of one user's progression.
#[derive(Debug, Clone)]
pub struct UserStats {
    /// Current point total
    pub total_points: u32,

    /// Number of badges earned
    pub total_badges: usize,

    /// All awarded badges
    pub badges: Vec<AwardedBadge>,

    /// Most recent point grants, oldest first, at most ten
    pub recent_activity: Vec<PointGrant>,
}

/// Stateful point accumulator, badge unlocker, and streak calculator.
pub struct ProgressionEngine {
    storage: Arc<dyn Storage>,
}

impl ProgressionEngine {
    /// Create an engine over a storage handle.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Grant the points for an action and return how many were granted.
    /// The append and the total bump are one logical write at the
    /// storage layer.
    pub async fn award_points(
        &self,
        user: &UserId,
        action: PointAction,
        now: Time,
    ) -> Result<u32> {
        self.storage.record_points(user, action, now).await?;
        tracing::debug!(user = %user, action = %action, points = action.points(), "points granted");
        Ok(action.points())
    }

    /// Evaluate badge thresholds and award anything newly met.
    ///
    /// Existence is checked before insert, so repeated calls with
    /// unchanged history never double-award. Returns the badges earned
    /// by this call.
    pub async fn check_and_award_badges(&self, user: &UserId, now: Time) -> Result<Vec<BadgeId>> {
        let total_points = self
            .storage
            .progression(user)
            .await?
            .map(|r| r.total_points)
            .unwrap_or(0);

        let history = self
            .storage
            .posture_history(user, BADGE_HISTORY_WINDOW)
            .await?;
        let good_posture_minutes = history
            .iter()
            .filter(|r| r.status.is_scored() && r.score >= GOOD_POSTURE_SCORE)
            .count() as u32;

        let existing: BTreeSet<&'static str> = self
            .storage
            .badges(user)
            .await?
            .iter()
            .map(|b| b.badge.name())
            .collect();

        let mut earned = Vec::new();
        for badge_id in BadgeId::ALL {
            let met = match badge_id.badge().threshold {
                BadgeThreshold::TotalPoints(limit) => total_points >= limit,
                BadgeThreshold::GoodPostureMinutes(limit) => good_posture_minutes >= limit,
                // Break and streak badges stay in the catalog for display
                // but are not evaluated here.
                BadgeThreshold::DailyBreaks(_) | BadgeThreshold::StreakDays(_) => false,
            };
            if met && !existing.contains(badge_id.name()) {
                self.storage
                    .award_badge(&AwardedBadge {
                        user_id: user.clone(),
                        badge: badge_id,
                        awarded_at: now,
                    })
                    .await?;
                tracing::info!(user = %user, badge = badge_id.name(), "badge awarded");
                earned.push(badge_id);
            }
        }

        Ok(earned)
    }

    /// Length of the run of consecutive calendar days with activity,
    /// counted back from the most recent active day. Zero without
    /// history.
    pub async fn calculate_streak(&self, user: &UserId) -> Result<u32> {
        let history = self
            .storage
            .posture_history(user, STREAK_HISTORY_WINDOW)
            .await?;
        if history.is_empty() {
            return Ok(0);
        }

        let dates: BTreeSet<NaiveDate> =
            history.iter().map(|r| r.timestamp.date_naive()).collect();

        let mut streak = 1;
        let mut run = dates.iter().rev();
        let Some(&first) = run.next() else {
            return Ok(0);
        };
        let mut current = first;
        for &previous in run {
            // A gap of exactly one day continues the run; anything else
            // terminates it.
            if (current - previous).num_days() == 1 {
                streak += 1;
                current = previous;
            } else {
                break;
            }
        }

        Ok(streak)
    }

    /// 1-based rank by total points descending. Ties keep the backend's
    /// iteration order; an unknown user ranks 1.
    pub async fn get_leaderboard_position(&self, user: &UserId) -> Result<usize> {
        let all = self.storage.all_progressions().await?;
        Ok(all
            .iter()
            .position(|r| &r.user_id == user)
            .map(|idx| idx + 1)
            .unwrap_or(1))
    }

    /// Aggregate progression view for display.
    pub async fn user_stats(&self, user: &UserId) -> Result<UserStats> {
        let record = self.storage.progression(user).await?;
        let badges = self.storage.badges(user).await?;

        let (total_points, recent_activity) = match record {
            Some(record) => {
                let start = record.history.len().saturating_sub(10);
                (record.total_points, record.history[start..].to_vec())
            }
            None => (0, Vec::new()),
        };

        Ok(UserStats {
            total_points,
            total_badges: badges.len(),
            badges,
            recent_activity,
        })
    }
}
