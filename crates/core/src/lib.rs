//! Deskwell core data models.
//!
//! This crate defines the fundamental data structures shared by the
//! posture monitoring pipeline: frames, samples, progression records,
//! badges, and configuration.

#![warn(missing_docs)]

// Identity
mod id;

// Live pipeline data
mod frame;
mod sample;

// Progression & gamification
mod progression;
mod badge;

// Configuration
mod config;

pub use id::UserId;
pub use frame::Frame;
pub use sample::{HeadAlignment, PostureSample, PostureStatus};
pub use progression::{PointAction, PointGrant, ProgressionRecord};
pub use badge::{AwardedBadge, Badge, BadgeId, BadgeThreshold};
pub use config::{Config, ConfigError};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
