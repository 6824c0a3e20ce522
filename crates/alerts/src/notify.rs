//! Notification payloads for the UI collaborator.

/// A transient popup: title, body, and how long to keep it on screen.
/// Rendering is entirely the UI collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Popup title
    pub title: String,
    /// Popup body
    pub message: String,
    /// Display duration in milliseconds
    pub duration_ms: u64,
}

impl Notification {
    /// The periodic break reminder.
    pub fn break_reminder() -> Self {
        Self {
            title: "Break Time!".to_string(),
            message: "You've been working for 30 minutes.\n\
                      Time to take a short break!\n\n\
                      Stretch, walk around, and rest your eyes."
                .to_string(),
            duration_ms: 5000,
        }
    }

    /// The sustained-poor-posture alert.
    pub fn posture_alert() -> Self {
        Self {
            title: "Posture Alert!".to_string(),
            message: "Poor posture detected!\n\n\
                      Please adjust your sitting position:\n\
                      - Sit up straight\n\
                      - Keep shoulders relaxed\n\
                      - Align your ears with your shoulders"
                .to_string(),
            duration_ms: 5000,
        }
    }

    /// A newly earned badge.
    pub fn achievement(badge_name: &str) -> Self {
        Self {
            title: "Achievement Unlocked!".to_string(),
            message: format!("Congratulations! You earned:\n{badge_name}"),
            duration_ms: 4000,
        }
    }
}
