//! Status command for Gator.
//!
//! Shows the gator, its level progress, today's progress and the streak.
//! Runs the launch-time streak decay check first so a missed day shows up.

use serde::Serialize;

use crate::app::AppStore;
use crate::cli::progress_bar;
use crate::clock::Clock;
use crate::core::{Accessory, DailyProgress, Environment, GatorExpression, StreakStatus};
use crate::storage::StateStore;

/// Options for the status command.
#[derive(Debug, Clone, Default)]
pub struct StatusOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the status command.
#[derive(Debug, Clone, Serialize)]
pub struct StatusOutput {
    pub success: bool,
    pub name: String,
    pub level: u32,
    pub experience: u32,
    /// Threshold of the next level; absent at the top of the table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_level_at: Option<u32>,
    pub level_fraction: f64,
    pub accessory: Accessory,
    pub environment: Environment,
    pub expression: GatorExpression,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub streak_status: StreakStatus,
    pub today: DailyProgress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The status command implementation.
pub struct StatusCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> StatusCommand<S, C> {
    /// Create a new status command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the status command.
    pub fn run(&mut self, _options: &StatusOptions) -> StatusOutput {
        self.app.check_and_update_streak();

        let gator = self.app.gator();
        let table = self.app.level_table();
        let next_level_at =
            (!table.is_max_level(gator.level)).then(|| table.experience_for_next_level(gator.level));
        let progress = self.app.current_level_progress();
        let streak = self.app.streak();

        let mut output = StatusOutput {
            success: true,
            name: gator.name.clone(),
            level: gator.level,
            experience: gator.experience,
            next_level_at,
            level_fraction: progress.fraction,
            accessory: gator.accessory,
            environment: gator.environment,
            expression: self.app.expression(),
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            streak_status: self.app.streak_status(),
            today: self.app.daily_progress(),
            error: None,
        };

        if let Err(e) = self.app.flush() {
            output.success = false;
            output.error = Some(format!("Failed to save state: {}", e));
        }
        output
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &StatusOutput, options: &StatusOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &StatusOutput) -> String {
        let mut lines = vec![format!(
            "{} the gator ({})",
            output.name,
            output.expression.as_str()
        )];

        let xp_line = match output.next_level_at {
            Some(next) => format!(
                "Level {}  {}  {}/{} XP",
                output.level,
                progress_bar(output.level_fraction, 20),
                output.experience,
                next
            ),
            None => format!("Level {} (max)  {} XP", output.level, output.experience),
        };
        lines.push(xp_line);
        lines.push(format!(
            "Wearing: {}  |  Home: {}",
            output.accessory.display_name(),
            output.environment.display_name()
        ));
        lines.push(format!(
            "Streak: {} day(s), best {} ({})",
            output.current_streak,
            output.longest_streak,
            output.streak_status.as_str()
        ));
        lines.push(format!(
            "Today: {}/{} habits, mood {}, journal {}  {}",
            output.today.habits_completed,
            output.today.habits_total,
            if output.today.has_mood_entry { "✓" } else { "-" },
            if output.today.has_journal_entry { "✓" } else { "-" },
            progress_bar(output.today.overall, 10)
        ));

        if let Some(error) = &output.error {
            lines.push(format!("Warning: {}", error));
        }

        lines.join("\n")
    }
}
