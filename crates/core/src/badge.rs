//! Badge catalog and awarded-badge facts.

use crate::{Time, UserId};
use serde::{Deserialize, Serialize};

/// Identifier for a badge in the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    /// 10 minutes of good posture
    PostureNovice,
    /// 1 hour of good posture
    PosturePro,
    /// 4 hours of good posture
    PostureMaster,
    /// 5 breaks in a day
    BreakTaker,
    /// 1000 total points
    WellnessWarrior,
    /// 3-day streak
    StreakStarter,
    /// 7-day streak
    StreakLegend,
}

impl BadgeId {
    /// All catalog entries, in display order.
    pub const ALL: [BadgeId; 7] = [
        BadgeId::PostureNovice,
        BadgeId::PosturePro,
        BadgeId::PostureMaster,
        BadgeId::BreakTaker,
        BadgeId::WellnessWarrior,
        BadgeId::StreakStarter,
        BadgeId::StreakLegend,
    ];

    /// Catalog entry for this badge.
    pub fn badge(&self) -> Badge {
        let (name, description, threshold) = match self {
            BadgeId::PostureNovice => (
                "Posture Novice",
                "Maintained good posture for 10 minutes",
                BadgeThreshold::GoodPostureMinutes(10),
            ),
            BadgeId::PosturePro => (
                "Posture Pro",
                "Maintained good posture for 1 hour",
                BadgeThreshold::GoodPostureMinutes(60),
            ),
            BadgeId::PostureMaster => (
                "Posture Master",
                "Maintained good posture for 4 hours",
                BadgeThreshold::GoodPostureMinutes(240),
            ),
            BadgeId::BreakTaker => (
                "Break Taker",
                "Took 5 breaks in a day",
                BadgeThreshold::DailyBreaks(5),
            ),
            BadgeId::WellnessWarrior => (
                "Wellness Warrior",
                "Scored 1000 total points",
                BadgeThreshold::TotalPoints(1000),
            ),
            BadgeId::StreakStarter => (
                "Streak Starter",
                "Maintained 3-day streak",
                BadgeThreshold::StreakDays(3),
            ),
            BadgeId::StreakLegend => (
                "Streak Legend",
                "Maintained 7-day streak",
                BadgeThreshold::StreakDays(7),
            ),
        };
        Badge {
            id: *self,
            name,
            description,
            threshold,
        }
    }

    /// Human-readable badge name.
    pub fn name(&self) -> &'static str {
        self.badge().name
    }
}

/// Condition that unlocks a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BadgeThreshold {
    /// Total points at or above the value
    TotalPoints(u32),
    /// Count of good-posture minutes at or above the value
    GoodPostureMinutes(u32),
    /// Breaks taken within a day at or above the value
    DailyBreaks(u32),
    /// Consecutive active days at or above the value
    StreakDays(u32),
}

/// A catalog entry. The catalog is fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    /// Catalog identifier
    pub id: BadgeId,
    /// Display name
    pub name: &'static str,
    /// Display description
    pub description: &'static str,
    /// Unlock condition
    pub threshold: BadgeThreshold,
}

/// Persisted fact: a user earned a badge.
///
/// At most one awarded badge exists per (user, badge) pair; the progression
/// engine checks existing awards before inserting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardedBadge {
    /// Who earned it
    pub user_id: UserId,

    /// Which badge
    pub badge: BadgeId,

    /// When it was awarded
    pub awarded_at: Time,
}
