//! CLI commands for Gator.
//!
//! Each command wraps an `AppStore`, runs one action and returns a
//! serializable output that renders as JSON or human-readable text:
//! - **Companion**: status, levels, customize
//! - **Daily care**: habits, mood, journal, streak

// Companion
pub mod customize;
pub mod levels;
pub mod status;

// Daily care
pub mod habits;
pub mod journal;
pub mod mood;
pub mod streak;

pub use customize::CustomizeCommand;
pub use habits::HabitsCommand;
pub use journal::JournalCommand;
pub use levels::LevelsCommand;
pub use mood::MoodCommand;
pub use status::StatusCommand;
pub use streak::StreakCommand;

use crate::core::{ExperienceGain, UnlockedItem};

/// Human-readable lines for an experience gain: XP, level-up and unlocks.
pub(crate) fn describe_gain(gain: &ExperienceGain) -> Vec<String> {
    let mut lines = Vec::new();
    if gain.amount == 0 {
        return lines;
    }

    lines.push(format!("+{} XP", gain.amount));
    if gain.leveled_up {
        lines.push(format!("Level up! Now level {}.", gain.new_level));
    }
    for item in &gain.unlocked {
        lines.push(match item {
            UnlockedItem::Accessory(a) => format!("Unlocked accessory: {}", a.display_name()),
            UnlockedItem::Environment(e) => {
                format!("Unlocked environment: {}", e.display_name())
            }
        });
    }
    lines
}

/// Render a progress fraction as a fixed-width bar.
pub(crate) fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}
