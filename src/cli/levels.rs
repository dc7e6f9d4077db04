//! Levels command for Gator.
//!
//! Prints the level table with each level's threshold and unlock, marking
//! the levels the gator has reached.

use serde::Serialize;

use crate::app::AppStore;
use crate::clock::Clock;
use crate::core::{Accessory, Environment};
use crate::storage::StateStore;

/// Options for the levels command.
#[derive(Debug, Clone, Default)]
pub struct LevelsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One row of the level table.
#[derive(Debug, Clone, Serialize)]
pub struct LevelRow {
    pub level: u32,
    pub experience_required: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessory: Option<Accessory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
    pub reached: bool,
}

/// Output format for the levels command.
#[derive(Debug, Clone, Serialize)]
pub struct LevelsOutput {
    pub success: bool,
    pub current_level: u32,
    pub experience: u32,
    pub levels: Vec<LevelRow>,
}

/// The levels command implementation.
pub struct LevelsCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> LevelsCommand<S, C> {
    /// Create a new levels command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the levels command.
    pub fn run(&self, _options: &LevelsOptions) -> LevelsOutput {
        let gator = self.app.gator();
        let levels = self
            .app
            .level_table()
            .thresholds()
            .iter()
            .map(|t| {
                let unlock = self.app.unlocks_for_level(t.level).unwrap_or_default();
                LevelRow {
                    level: t.level,
                    experience_required: t.experience_required,
                    accessory: unlock.accessory,
                    environment: unlock.environment,
                    reached: t.level <= gator.level,
                }
            })
            .collect();

        LevelsOutput {
            success: true,
            current_level: gator.level,
            experience: gator.experience,
            levels,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &LevelsOutput, options: &LevelsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &LevelsOutput) -> String {
        let mut lines = vec![format!(
            "Level {} with {} XP",
            output.current_level, output.experience
        )];
        lines.push(String::new());
        lines.push(format!("{:<3}  {:<6}  {:>7}  {}", "", "LEVEL", "XP", "UNLOCK"));
        lines.push("-".repeat(40));

        for row in &output.levels {
            let unlock = match (row.accessory, row.environment) {
                (Some(a), _) => a.display_name(),
                (None, Some(e)) => e.display_name(),
                (None, None) => "",
            };
            lines.push(format!(
                "{:<3}  {:<6}  {:>7}  {}",
                if row.reached { "✓" } else { "" },
                row.level,
                row.experience_required,
                unlock
            ));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::core::AppState;
    use crate::storage::MemoryStateStore;
    use chrono::NaiveDate;

    fn command(experience: u32) -> LevelsCommand<MemoryStateStore, FixedClock> {
        let mut state = AppState::new();
        state.gator.experience = experience;
        let app = AppStore::open(
            MemoryStateStore::with_state(state),
            FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            Config::default(),
        );
        LevelsCommand::new(app)
    }

    #[test]
    fn test_levels_lists_table() {
        let cmd = command(720);
        let output = cmd.run(&LevelsOptions::default());

        assert_eq!(output.levels.len(), 25);
        assert_eq!(output.current_level, 5);
        assert!(output.levels[4].reached);
        assert!(!output.levels[5].reached);
        assert_eq!(output.levels[2].accessory, Some(Accessory::Bow));
        assert_eq!(output.levels[4].environment, Some(Environment::Garden));
        assert!(output.levels[1].accessory.is_none());
    }

    #[test]
    fn test_levels_human_output() {
        let cmd = command(0);
        let output = cmd.run(&LevelsOptions::default());
        let text = cmd.format_output(&output, &LevelsOptions::default());

        assert!(text.starts_with("Level 1 with 0 XP"));
        assert!(text.contains("Starry Night"));
    }
}
