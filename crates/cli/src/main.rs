//! Deskwell CLI - posture monitoring and progression reports.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use deskwell_alerts::AlertEngine;
use deskwell_capture::{FrameSource, SyntheticCamera};
use deskwell_core::{Config, UserId};
use deskwell_pipeline::{LogUi, Monitor, MonitorConfig};
use deskwell_progress::{Analytics, ProgressionEngine};
use deskwell_scorer::{FixturePose, PoseScorer};
use deskwell_storage::{JsonStorage, Storage};

#[derive(Parser)]
#[command(name = "deskwell")]
#[command(about = "Desk posture monitoring with breaks, alerts, and progression", long_about = None)]
struct Cli {
    /// Storage directory
    #[arg(long, default_value = ".deskwell")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the monitoring loop
    Monitor {
        /// User to record history for
        #[arg(long, default_value = "default_user")]
        user: String,
        /// Optional config file (TOML); defaults are used when absent
        #[arg(long)]
        config: Option<PathBuf>,
        /// Stop after this many ticks (runs until Ctrl-C when omitted)
        #[arg(long)]
        ticks: Option<usize>,
    },
    /// Show points, badges, streak, and posture statistics
    Stats {
        /// User to report on
        user: String,
    },
    /// Show the current daily streak
    Streak {
        /// User to report on
        user: String,
    },
    /// Show leaderboard position and standings
    Leaderboard {
        /// User to highlight
        user: String,
    },
    /// List earned badges
    Badges {
        /// User to report on
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let storage = Arc::new(JsonStorage::new(&cli.data_dir).await?);

    match cli.command {
        Commands::Monitor {
            user,
            config,
            ticks,
        } => {
            let config = match config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            run_monitor(storage, UserId::new(user), config, ticks).await?;
        }
        Commands::Stats { user } => {
            let user = UserId::new(user);
            let progression = ProgressionEngine::new(storage.clone());
            let analytics = Analytics::new(storage);

            let stats = progression.user_stats(&user).await?;
            let streak = progression.calculate_streak(&user).await?;
            let posture = analytics.statistics(&user).await?;

            println!("Stats for {}", user);
            println!("  Total points: {}", stats.total_points);
            println!("  Badges earned: {}", stats.total_badges);
            println!("  Current streak: {} days", streak);
            println!("  Average posture score: {:.1}/100", posture.average_score);
            println!("  Best / worst: {} / {}", posture.best_score, posture.worst_score);
            println!("  Sessions recorded: {}", posture.total_sessions);
            println!(
                "  Good posture: {:.1}% of the time",
                posture.good_posture_percentage
            );
            for insight in analytics.insights(&user).await? {
                println!("  - {}", insight);
            }
        }
        Commands::Streak { user } => {
            let progression = ProgressionEngine::new(storage);
            let streak = progression.calculate_streak(&UserId::new(user)).await?;
            println!("{} day streak", streak);
        }
        Commands::Leaderboard { user } => {
            let target = UserId::new(user);
            let progression = ProgressionEngine::new(storage.clone());
            let position = progression.get_leaderboard_position(&target).await?;
            println!("Position: #{}", position);

            let all = storage.all_progressions().await?;
            for (idx, record) in all.iter().enumerate() {
                let marker = if record.user_id == target { "*" } else { " " };
                println!(
                    " {}{:>3}. {} - {} points",
                    marker,
                    idx + 1,
                    record.user_id,
                    record.total_points
                );
            }
        }
        Commands::Badges { user } => {
            let user = UserId::new(user);
            let progression = ProgressionEngine::new(storage);
            let stats = progression.user_stats(&user).await?;

            if stats.badges.is_empty() {
                println!("No badges earned yet");
            }
            for awarded in stats.badges {
                let badge = awarded.badge.badge();
                println!(
                    "  {} - {} (earned {})",
                    badge.name,
                    badge.description,
                    awarded.awarded_at.format("%Y-%m-%d")
                );
            }
        }
    }

    Ok(())
}

async fn run_monitor(
    storage: Arc<JsonStorage>,
    user: UserId,
    config: Config,
    ticks: Option<usize>,
) -> Result<()> {
    // The synthetic device and fixture pose stand in until a real camera
    // backend and landmark model are wired through the capture and
    // scorer traits.
    let camera = SyntheticCamera::open(
        config.camera_id,
        config.capture_width,
        config.capture_height,
    )?;
    let source = FrameSource::start(camera);

    let scorer = PoseScorer::new(FixturePose::upright()).with_process_width(config.process_width);

    let mut alerts = AlertEngine::new(chrono::Utc::now());
    alerts.set_break_interval(config.break_interval_mins);
    alerts.set_posture_check_interval(config.posture_check_interval_mins);

    let mut monitor_config = MonitorConfig::from_config(user, &config);
    monitor_config.max_ticks = ticks;

    let mut monitor = Monitor::new(
        source,
        scorer,
        alerts,
        storage,
        Arc::new(LogUi),
        monitor_config,
    );

    let handle = monitor.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            handle.stop();
        }
    });

    info!("monitoring started");
    let ticks = monitor.run().await;
    monitor.finish().await;
    info!("monitoring stopped after {} ticks", ticks);

    Ok(())
}
