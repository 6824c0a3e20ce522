//! Progression record - the per-user point accumulator.

use crate::{Time, UserId};
use serde::{Deserialize, Serialize};

/// Actions that earn points.
///
/// The table is closed: every grantable action is a variant with a fixed
/// value, so there is no runtime "unknown action earns zero" path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointAction {
    /// Sample scored at or above the good threshold
    GoodPosture,
    /// Sample scored at or above the excellent threshold
    ExcellentPosture,
    /// A break reminder fired and the break was taken
    BreakTaken,
    /// A monitoring session ran to completion
    SessionCompleted,
    /// The daily goal was met
    DailyGoalMet,
}

impl PointAction {
    /// Points granted for this action.
    pub fn points(&self) -> u32 {
        match self {
            PointAction::GoodPosture => 10,
            PointAction::ExcellentPosture => 20,
            PointAction::BreakTaken => 15,
            PointAction::SessionCompleted => 50,
            PointAction::DailyGoalMet => 100,
        }
    }
}

impl std::fmt::Display for PointAction {
    // Same names as the serde renames so log lines and stored history agree.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PointAction::GoodPosture => "good_posture",
            PointAction::ExcellentPosture => "excellent_posture",
            PointAction::BreakTaken => "break_taken",
            PointAction::SessionCompleted => "session_completed",
            PointAction::DailyGoalMet => "daily_goal_met",
        };
        f.write_str(name)
    }
}

/// A single point grant in a user's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointGrant {
    /// What was rewarded
    pub action: PointAction,

    /// Points granted
    pub points: u32,

    /// When the grant happened
    pub timestamp: Time,
}

/// Durable per-user accumulator of points and action history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionRecord {
    /// Owner of the record
    pub user_id: UserId,

    /// Fold-sum of every grant in `history`
    pub total_points: u32,

    /// Last mutation time
    pub last_updated: Time,

    /// Append-only, insertion-ordered grant history
    pub history: Vec<PointGrant>,
}

impl ProgressionRecord {
    /// Create an empty record for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            total_points: 0,
            last_updated: chrono::Utc::now(),
            history: Vec::new(),
        }
    }

    /// Append a grant and bump the total.
    pub fn grant(&mut self, action: PointAction, at: Time) {
        let points = action.points();
        self.total_points += points;
        self.last_updated = at;
        self.history.push(PointGrant {
            action,
            points,
            timestamp: at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_keeps_total_in_sync_with_history() {
        let mut record = ProgressionRecord::new(UserId::new("jo"));
        let now = chrono::Utc::now();
        record.grant(PointAction::GoodPosture, now);
        record.grant(PointAction::BreakTaken, now);

        assert_eq!(record.total_points, 25);
        assert_eq!(record.history.len(), 2);
        let summed: u32 = record.history.iter().map(|g| g.points).sum();
        assert_eq!(summed, record.total_points);
    }

    #[test]
    fn point_table_matches_action_values() {
        assert_eq!(PointAction::GoodPosture.points(), 10);
        assert_eq!(PointAction::ExcellentPosture.points(), 20);
        assert_eq!(PointAction::BreakTaken.points(), 15);
        assert_eq!(PointAction::SessionCompleted.points(), 50);
        assert_eq!(PointAction::DailyGoalMet.points(), 100);
    }
}
