//! Mood command for Gator.
//!
//! Logs a 1-5 mood check-in. A check-in counts as today's streak activity
//! and earns the configured mood reward.

use serde::Serialize;

use crate::app::{AppStore, CheckInReport};
use crate::cli::describe_gain;
use crate::clock::Clock;
use crate::core::{is_milestone, MoodEntry, MoodLevel, StreakTransition};
use crate::storage::StateStore;

/// Options for the mood command.
#[derive(Debug, Clone, Default)]
pub struct MoodOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the mood command.
#[derive(Debug, Clone, Serialize)]
pub struct MoodOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_in: Option<CheckInReport<MoodEntry>>,
    pub current_streak: u32,
    /// Today's streak length is a milestone.
    pub milestone: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MoodOutput {
    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            check_in: None,
            current_streak: 0,
            milestone: false,
            error: Some(error.into()),
        }
    }
}

/// The mood command implementation.
pub struct MoodCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> MoodCommand<S, C> {
    /// Create a new mood command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the mood command.
    pub fn run(&mut self, level: u8, note: Option<String>, _options: &MoodOptions) -> MoodOutput {
        let level = match MoodLevel::new(level) {
            Ok(level) => level,
            Err(e) => return MoodOutput::failure(e.to_string()),
        };

        let report = self.app.add_mood_entry(level, note);
        let current_streak = self.app.streak().current_streak;
        let milestone = report.streak.is_some_and(|t| t.changed()) && is_milestone(current_streak);

        let mut output = MoodOutput {
            success: true,
            check_in: Some(report),
            current_streak,
            milestone,
            error: None,
        };
        if let Err(e) = self.app.flush() {
            output.success = false;
            output.error = Some(format!("Failed to save state: {}", e));
        }
        output
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &MoodOutput, options: &MoodOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &MoodOutput) -> String {
        let Some(report) = &output.check_in else {
            return format!(
                "Mood check-in failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        };

        let mut lines = vec![format!(
            "Mood logged {} ({}/5)",
            report.record.level.emoji(),
            report.record.level.value()
        )];
        lines.extend(describe_gain(&report.gain));

        match report.streak {
            Some(StreakTransition::Started) => lines.push("Streak started!".to_string()),
            Some(StreakTransition::Extended) => {
                lines.push(format!("Streak: {} days", output.current_streak))
            }
            Some(StreakTransition::Reset) => lines.push("Fresh start: streak at 1 day".to_string()),
            _ => {}
        }
        if output.milestone {
            lines.push(format!("{}-day milestone!", output.current_streak));
        }
        if let Some(error) = &output.error {
            lines.push(format!("Warning: {}", error));
        }

        lines.join("\n")
    }
}
