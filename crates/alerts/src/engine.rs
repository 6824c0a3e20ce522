//! Alert debounce and rate-limit state machine.

use chrono::Duration;
use deskwell_core::Time;

/// Score below which a sample counts toward the poor-posture streak.
const POOR_SCORE_LIMIT: u8 = 50;

/// Consecutive poor samples required before a posture alert may fire.
const STREAK_REQUIRED: u32 = 3;

/// Process-lifetime alert state, owned by the orchestrator context and
/// never shared across threads.
#[derive(Debug, Clone)]
pub struct AlertState {
    /// When the last break reminder fired (or monitoring started)
    pub last_break_time: Time,

    /// When the last posture alert fired (or monitoring started)
    pub last_posture_alert_time: Time,

    /// Consecutive samples below the poor threshold
    pub poor_posture_streak: u32,

    /// Runtime alert toggle
    pub enabled: bool,
}

/// Debounce/rate-limiter over the score stream.
///
/// The caller supplies `now` on every check, so the machine is a pure
/// function of its inputs and its own state. A posture alert requires a
/// sustained streak of poor samples AND an elapsed cooldown; a single
/// good sample clears the streak outright. This is a strict debounce,
/// not a moving average.
#[derive(Debug, Clone)]
pub struct AlertEngine {
    break_interval: Duration,
    posture_cooldown: Duration,
    state: AlertState,
}

impl AlertEngine {
    /// Create an engine with the default intervals (30 min breaks,
    /// 5 min posture cooldown), with both timers anchored at `now`.
    pub fn new(now: Time) -> Self {
        Self {
            break_interval: Duration::minutes(30),
            posture_cooldown: Duration::minutes(5),
            state: AlertState {
                last_break_time: now,
                last_posture_alert_time: now,
                poor_posture_streak: 0,
                enabled: true,
            },
        }
    }

    /// Set the break reminder interval, in minutes.
    pub fn set_break_interval(&mut self, minutes: u32) {
        self.break_interval = Duration::minutes(i64::from(minutes));
    }

    /// Set the minimum gap between posture alerts, in minutes.
    pub fn set_posture_check_interval(&mut self, minutes: u32) {
        self.posture_cooldown = Duration::minutes(i64::from(minutes));
    }

    /// Restart the break window from `now`.
    pub fn reset_break_timer(&mut self, now: Time) {
        self.state.last_break_time = now;
    }

    /// Flip the runtime toggle; counters and timestamps are untouched.
    pub fn toggle_alerts(&mut self) -> bool {
        self.state.enabled = !self.state.enabled;
        self.state.enabled
    }

    /// Whether alerts are currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Current poor-posture streak length.
    pub fn poor_streak(&self) -> u32 {
        self.state.poor_posture_streak
    }

    /// Advance the break-reminder machine. Returns true exactly when a
    /// reminder should fire, at most once per interval.
    pub fn check_break_reminder(&mut self, now: Time) -> bool {
        if !self.state.enabled {
            return false;
        }
        if now - self.state.last_break_time >= self.break_interval {
            tracing::info!("break reminder due");
            self.state.last_break_time = now;
            return true;
        }
        false
    }

    /// Advance the posture-alert machine with one sample score. Returns
    /// true exactly when an alert should fire.
    pub fn check_posture_alert(&mut self, score: u8, now: Time) -> bool {
        if !self.state.enabled {
            return false;
        }

        if score < POOR_SCORE_LIMIT {
            self.state.poor_posture_streak += 1;

            if self.state.poor_posture_streak >= STREAK_REQUIRED
                && now - self.state.last_posture_alert_time >= self.posture_cooldown
            {
                tracing::info!(streak = self.state.poor_posture_streak, "posture alert due");
                self.state.last_posture_alert_time = now;
                self.state.poor_posture_streak = 0;
                return true;
            }
        } else {
            // One good sample clears the streak unconditionally.
            self.state.poor_posture_streak = 0;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> Time {
        chrono::Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn after_secs(secs: i64) -> Time {
        t0() + Duration::seconds(secs)
    }

    #[test]
    fn good_scores_never_trigger_an_alert() {
        let mut engine = AlertEngine::new(t0());
        for i in 0..1000 {
            assert!(!engine.check_posture_alert(50, after_secs(600 + i)));
            assert_eq!(engine.poor_streak(), 0);
        }
    }

    #[test]
    fn three_poor_samples_after_cooldown_fire_exactly_once() {
        let mut engine = AlertEngine::new(t0());
        let now = after_secs(600); // cooldown (300 s) already elapsed

        assert!(!engine.check_posture_alert(10, now));
        assert!(!engine.check_posture_alert(10, now));
        assert!(engine.check_posture_alert(10, now));
        assert_eq!(engine.poor_streak(), 0);

        // More poor samples inside the new cooldown do not re-trigger.
        assert!(!engine.check_posture_alert(10, now + Duration::seconds(1)));
        assert!(!engine.check_posture_alert(10, now + Duration::seconds(2)));
        assert!(!engine.check_posture_alert(10, now + Duration::seconds(3)));
    }

    #[test]
    fn one_good_sample_resets_the_streak() {
        let mut engine = AlertEngine::new(t0());
        let now = after_secs(600);

        assert!(!engine.check_posture_alert(20, now));
        assert!(!engine.check_posture_alert(20, now));
        assert_eq!(engine.poor_streak(), 2);

        assert!(!engine.check_posture_alert(80, now));
        assert_eq!(engine.poor_streak(), 0);

        // Counting restarts from one.
        assert!(!engine.check_posture_alert(20, now));
        assert_eq!(engine.poor_streak(), 1);
    }

    #[test]
    fn break_reminder_fires_once_per_window() {
        let mut engine = AlertEngine::new(t0());

        let mut fired = Vec::new();
        for second in 0..=3600 {
            if engine.check_break_reminder(after_secs(second)) {
                fired.push(second);
            }
        }
        // 30-minute interval over one hour of per-second calls: exactly
        // two reminders, at 1800 s and 3600 s.
        assert_eq!(fired, vec![1800, 3600]);
    }

    #[test]
    fn disabled_engine_is_inert_but_keeps_state() {
        let mut engine = AlertEngine::new(t0());
        let now = after_secs(600);

        engine.check_posture_alert(10, now);
        engine.check_posture_alert(10, now);
        assert_eq!(engine.poor_streak(), 2);

        assert!(!engine.toggle_alerts());
        assert!(!engine.check_posture_alert(10, now));
        assert!(!engine.check_break_reminder(after_secs(7200)));
        assert_eq!(engine.poor_streak(), 2);

        assert!(engine.toggle_alerts());
        assert!(engine.check_posture_alert(10, now));
    }

    #[test]
    fn interval_setters_take_minutes() {
        let mut engine = AlertEngine::new(t0());
        engine.set_break_interval(1);
        assert!(!engine.check_break_reminder(after_secs(59)));
        assert!(engine.check_break_reminder(after_secs(60)));

        engine.set_posture_check_interval(1);
        let now = after_secs(120);
        engine.check_posture_alert(10, now);
        engine.check_posture_alert(10, now);
        assert!(engine.check_posture_alert(10, now));
    }

    #[test]
    fn reset_break_timer_restarts_the_window() {
        let mut engine = AlertEngine::new(t0());
        engine.reset_break_timer(after_secs(1700));
        assert!(!engine.check_break_reminder(after_secs(1800)));
        assert!(engine.check_break_reminder(after_secs(1700 + 1800)));
    }
}
