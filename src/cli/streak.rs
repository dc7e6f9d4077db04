//! Streak command for Gator.
//!
//! Runs the inactivity check and reports the streak, its status relative to
//! today and the next milestone.

use serde::Serialize;

use crate::app::AppStore;
use crate::clock::Clock;
use crate::core::{StreakStatus, STREAK_MILESTONES};
use crate::storage::StateStore;

/// Options for the streak command.
#[derive(Debug, Clone, Default)]
pub struct StreakOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the streak command.
#[derive(Debug, Clone, Serialize)]
pub struct StreakOutput {
    pub success: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub status: StreakStatus,
    /// True when this run reset the streak.
    pub was_reset: bool,
    /// Consecutive days with at least one habit completed.
    pub habit_streak: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_milestone: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The streak command implementation.
pub struct StreakCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> StreakCommand<S, C> {
    /// Create a new streak command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the streak command.
    pub fn run(&mut self, _options: &StreakOptions) -> StreakOutput {
        let was_reset = self.app.check_and_update_streak();
        let streak = self.app.streak();
        let current = streak.current_streak;

        let mut output = StreakOutput {
            success: true,
            current_streak: current,
            longest_streak: streak.longest_streak,
            status: self.app.streak_status(),
            was_reset,
            habit_streak: self.app.habit_streak().current_streak,
            next_milestone: STREAK_MILESTONES.iter().copied().find(|m| *m > current),
            error: None,
        };
        if let Err(e) = self.app.flush() {
            output.success = false;
            output.error = Some(format!("Failed to save state: {}", e));
        }
        output
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StreakOutput, options: &StreakOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StreakOutput) -> String {
        let mut lines = Vec::new();
        if output.was_reset {
            lines.push("Your streak ended. Check in today to start a new one.".to_string());
        }
        lines.push(format!(
            "Current streak: {} day(s) ({})",
            output.current_streak,
            output.status.as_str()
        ));
        lines.push(format!("Longest streak: {} day(s)", output.longest_streak));
        lines.push(format!("Habit streak: {} day(s)", output.habit_streak));
        if let Some(next) = output.next_milestone {
            lines.push(format!(
                "Next milestone: {} days ({} to go)",
                next,
                next - output.current_streak
            ));
        }
        if let Some(error) = &output.error {
            lines.push(format!("Warning: {}", error));
        }
        lines.join("\n")
    }
}
