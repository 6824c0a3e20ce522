//! The monitoring loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use deskwell_alerts::{AlertEngine, Notification};
use deskwell_capture::FrameSource;
use deskwell_core::{Config, PointAction, PostureSample, UserId};
use deskwell_progress::ProgressionEngine;
use deskwell_scorer::{PoseEstimator, PoseScorer};
use deskwell_storage::Storage;

use crate::ui::{FrameUpdate, UiSink};

/// Loop tuning for the orchestrator.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Whose history the loop writes
    pub user: UserId,

    /// Score at or above which a tick earns good-posture points
    pub good_score: u8,

    /// Score at or above which a tick earns excellent-posture points
    pub excellent_score: u8,

    /// Pause between ticks
    pub tick_interval: Duration,

    /// Stop after this many ticks; `None` runs until stopped
    pub max_ticks: Option<usize>,
}

impl MonitorConfig {
    /// Build loop tuning from the app config.
    pub fn from_config(user: UserId, config: &Config) -> Self {
        Self {
            user,
            good_score: config.good_score,
            excellent_score: config.excellent_score,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            max_ticks: None,
        }
    }
}

/// Handle for stopping a running monitor from another task.
#[derive(Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the loop to stop after the current tick.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Pipeline orchestrator.
///
/// Owns the frame source, the scorer, and the alert state; shares the
/// storage handle with the progression engine. Everything downstream of
/// scoring degrades gracefully: a persistence failure is logged at the
/// call site and the loop continues.
pub struct Monitor<E> {
    source: FrameSource,
    scorer: PoseScorer<E>,
    alerts: AlertEngine,
    progression: ProgressionEngine,
    storage: Arc<dyn Storage>,
    ui: Arc<dyn UiSink>,
    config: MonitorConfig,
    stop: Arc<AtomicBool>,
    ticks: usize,
}

impl<E: PoseEstimator> Monitor<E> {
    /// Assemble the pipeline around an already-started frame source.
    pub fn new(
        source: FrameSource,
        scorer: PoseScorer<E>,
        alerts: AlertEngine,
        storage: Arc<dyn Storage>,
        ui: Arc<dyn UiSink>,
        config: MonitorConfig,
    ) -> Self {
        let progression = ProgressionEngine::new(Arc::clone(&storage));
        Self {
            source,
            scorer,
            alerts,
            progression,
            storage,
            ui,
            config,
            stop: Arc::new(AtomicBool::new(false)),
            ticks: 0,
        }
    }

    /// Handle for stopping the loop from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Run until the tick budget is spent or the stop handle fires.
    /// Returns the number of ticks completed.
    pub async fn run(&mut self) -> usize {
        loop {
            if self.stop.load(Ordering::Relaxed) {
                break;
            }
            if let Some(max) = self.config.max_ticks {
                if self.ticks >= max {
                    break;
                }
            }
            self.tick().await;
            self.ticks += 1;
            tokio::time::sleep(self.config.tick_interval).await;
        }
        self.ticks
    }

    /// One pipeline cycle: read, score, persist, progress, alert, show.
    pub async fn tick(&mut self) {
        let Some(frame) = self.source.read() else {
            // Nothing captured yet; idle until the capture thread
            // publishes its first frame.
            return;
        };

        let scored = self.scorer.analyze(&frame.image);
        let now = chrono::Utc::now();
        let user = self.config.user.clone();

        let sample = PostureSample {
            timestamp: now,
            score: scored.score,
            status: scored.status,
        };
        // Metrics-not-recorded beats a dead loop at every write below.
        if let Err(err) = self.storage.append_posture_sample(&user, &sample).await {
            tracing::warn!(error = %err, "failed to persist posture sample");
        }

        let action = if scored.score >= self.config.excellent_score {
            Some(PointAction::ExcellentPosture)
        } else if scored.score >= self.config.good_score {
            Some(PointAction::GoodPosture)
        } else {
            None
        };
        if let Some(action) = action {
            if let Err(err) = self.progression.award_points(&user, action, now).await {
                tracing::warn!(error = %err, "failed to award points");
            }
        }

        match self.progression.check_and_award_badges(&user, now).await {
            Ok(earned) => {
                for badge in earned {
                    self.ui.notify(Notification::achievement(badge.name()));
                }
            }
            Err(err) => tracing::warn!(error = %err, "badge check failed"),
        }

        if self.alerts.check_posture_alert(scored.score, now) {
            self.ui.notify(Notification::posture_alert());
        }

        if self.alerts.check_break_reminder(now) {
            self.ui.notify(Notification::break_reminder());
            if let Err(err) = self
                .progression
                .award_points(&user, PointAction::BreakTaken, now)
                .await
            {
                tracing::warn!(error = %err, "failed to award break points");
            }
        }

        self.ui.present(FrameUpdate {
            image: scored.image,
            status: scored.status,
            score: scored.score,
        });
    }

    /// End the session: grant completion points, then stop capture and
    /// release the device.
    pub async fn finish(self) {
        let now = chrono::Utc::now();
        if let Err(err) = self
            .progression
            .award_points(&self.config.user, PointAction::SessionCompleted, now)
            .await
        {
            tracing::warn!(error = %err, "failed to award session points");
        }
        self.source.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskwell_capture::SyntheticCamera;
    use deskwell_core::PostureStatus;
    use deskwell_scorer::FixturePose;
    use deskwell_storage::MemoryStorage;
    use std::sync::Mutex;

    struct RecordingUi {
        presents: Mutex<Vec<(PostureStatus, u8)>>,
        notifications: Mutex<Vec<Notification>>,
    }

    impl RecordingUi {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                presents: Mutex::new(Vec::new()),
                notifications: Mutex::new(Vec::new()),
            })
        }
    }

    impl UiSink for RecordingUi {
        fn present(&self, update: FrameUpdate) {
            self.presents
                .lock()
                .unwrap()
                .push((update.status, update.score));
        }

        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }
    }

    fn config(user: &str, max_ticks: usize) -> MonitorConfig {
        MonitorConfig {
            user: UserId::new(user),
            good_score: 70,
            excellent_score: 85,
            tick_interval: Duration::from_millis(5),
            max_ticks: Some(max_ticks),
        }
    }

    fn started_source() -> FrameSource {
        let camera = SyntheticCamera::open(0, 64, 48).expect("synthetic device 0 opens");
        let source = FrameSource::start(camera);
        // Wait for the first frame so every test tick has one.
        let deadline = std::time::Instant::now() + Duration::from_secs(2);
        while source.read().is_none() && std::time::Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        source
    }

    #[tokio::test]
    async fn ticks_persist_samples_and_points() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let ui = RecordingUi::new();
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::upright()),
            AlertEngine::new(chrono::Utc::now()),
            storage.clone(),
            ui.clone(),
            config("tess", 3),
        );

        assert_eq!(monitor.run().await, 3);

        let user = UserId::new("tess");
        let history = storage.posture_history(&user, 100).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history.iter().all(|s| s.score == 100));

        // Perfect scores earn excellent-posture points every tick.
        let record = storage.progression(&user).await.unwrap().unwrap();
        assert_eq!(record.total_points, 60);

        assert_eq!(ui.presents.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn sustained_poor_scores_raise_a_posture_alert() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let ui = RecordingUi::new();
        // Anchor the machine in the past so the cooldown has elapsed.
        let engine = AlertEngine::new(chrono::Utc::now() - chrono::Duration::minutes(10));
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::none()),
            engine,
            storage,
            ui.clone(),
            config("tess", 4),
        );

        monitor.run().await;

        let notifications = ui.notifications.lock().unwrap();
        let alerts = notifications
            .iter()
            .filter(|n| n.title == "Posture Alert!")
            .count();
        assert_eq!(alerts, 1);
    }

    #[tokio::test]
    async fn due_break_grants_points_and_notifies() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let ui = RecordingUi::new();
        let engine = AlertEngine::new(chrono::Utc::now() - chrono::Duration::minutes(31));
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::upright()),
            engine,
            storage.clone(),
            ui.clone(),
            config("tess", 1),
        );

        monitor.run().await;

        assert!(ui
            .notifications
            .lock()
            .unwrap()
            .iter()
            .any(|n| n.title == "Break Time!"));
        let record = storage
            .progression(&UserId::new("tess"))
            .await
            .unwrap()
            .unwrap();
        // Excellent posture (20) plus the break (15).
        assert_eq!(record.total_points, 35);
    }

    #[tokio::test]
    async fn earned_badges_are_announced_once() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let user = UserId::new("tess");
        let now = chrono::Utc::now();
        // Seed enough good history for the novice badge.
        for _ in 0..10 {
            storage
                .append_posture_sample(
                    &user,
                    &PostureSample {
                        timestamp: now,
                        score: 90,
                        status: PostureStatus::Scored {
                            head: deskwell_core::HeadAlignment::Good,
                            shoulders_uneven: false,
                        },
                    },
                )
                .await
                .unwrap();
        }

        let ui = RecordingUi::new();
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::upright()),
            AlertEngine::new(now),
            storage,
            ui.clone(),
            config("tess", 3),
        );

        monitor.run().await;

        let notifications = ui.notifications.lock().unwrap();
        let achievements = notifications
            .iter()
            .filter(|n| n.title == "Achievement Unlocked!")
            .count();
        assert_eq!(achievements, 1);
    }

    #[tokio::test]
    async fn stop_handle_halts_the_loop() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let ui = RecordingUi::new();
        let mut config = config("tess", 10_000);
        config.tick_interval = Duration::from_millis(1);
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::upright()),
            AlertEngine::new(chrono::Utc::now()),
            storage,
            ui,
            config,
        );

        let handle = monitor.stop_handle();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.stop();
        });

        let ticks = monitor.run().await;
        assert!(ticks < 10_000);
    }

    #[tokio::test]
    async fn finish_awards_session_completion() {
        let storage: Arc<MemoryStorage> = Arc::new(MemoryStorage::new());
        let ui = RecordingUi::new();
        let mut monitor = Monitor::new(
            started_source(),
            PoseScorer::new(FixturePose::upright()),
            AlertEngine::new(chrono::Utc::now()),
            storage.clone(),
            ui,
            config("tess", 1),
        );

        monitor.run().await;
        monitor.finish().await;

        let record = storage
            .progression(&UserId::new("tess"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.total_points, 20 + 50);
    }
}
