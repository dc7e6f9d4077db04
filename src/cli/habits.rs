//! Habits command for Gator.
//!
//! Lists today's habits and completes, toggles or adds them.

use serde::Serialize;

use crate::app::{AppStore, HabitCompletionReport};
use crate::cli::describe_gain;
use crate::clock::Clock;
use crate::core::{Habit, HabitCategory, NewHabit};
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the habits command.
#[derive(Debug, Clone, Default)]
pub struct HabitsOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
    /// Include inactive habits in listings.
    pub all: bool,
}

/// What the habits command should do.
#[derive(Debug, Clone)]
pub enum HabitsAction {
    List,
    Complete {
        habit_id: String,
    },
    Toggle {
        habit_id: String,
    },
    Add {
        name: String,
        icon: String,
        category: HabitCategory,
        reward: u32,
    },
}

/// A habit with today's completion state.
#[derive(Debug, Clone, Serialize)]
pub struct HabitView {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: HabitCategory,
    pub experience_reward: u32,
    pub is_active: bool,
    pub completed_today: bool,
    /// Days this habit has been completed, all time.
    pub total_completions: usize,
}

/// Output format for the habits command.
#[derive(Debug, Clone, Serialize)]
pub struct HabitsOutput {
    pub success: bool,
    pub habits: Vec<HabitView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<HabitCompletionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HabitsOutput {
    fn success(habits: Vec<HabitView>) -> Self {
        Self {
            success: true,
            habits,
            completion: None,
            message: None,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            habits: vec![],
            completion: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// The habits command implementation.
pub struct HabitsCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> HabitsCommand<S, C> {
    /// Create a new habits command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the habits command.
    pub fn run(&mut self, action: HabitsAction, options: &HabitsOptions) -> HabitsOutput {
        match self.execute(action, options) {
            Ok(mut output) => {
                if let Err(e) = self.app.flush() {
                    output.success = false;
                    output.error = Some(format!("Failed to save state: {}", e));
                }
                output
            }
            Err(e) => HabitsOutput::failure(e.to_string()),
        }
    }

    fn execute(&mut self, action: HabitsAction, options: &HabitsOptions) -> Result<HabitsOutput> {
        match action {
            HabitsAction::List => Ok(HabitsOutput::success(self.views(options.all))),
            HabitsAction::Complete { habit_id } => {
                let report = self.app.complete_habit(&habit_id)?;
                let mut output = HabitsOutput::success(self.views(options.all));
                output.completion = Some(report);
                Ok(output)
            }
            HabitsAction::Toggle { habit_id } => {
                let active = self.app.toggle_habit_active(&habit_id)?;
                let mut output = HabitsOutput::success(self.views(true));
                output.message = Some(format!(
                    "Habit {} is now {}.",
                    habit_id,
                    if active { "active" } else { "inactive" }
                ));
                Ok(output)
            }
            HabitsAction::Add {
                name,
                icon,
                category,
                reward,
            } => {
                let habit = self
                    .app
                    .add_habit(NewHabit::custom(name, icon, category, reward))?;
                let mut output = HabitsOutput::success(self.views(options.all));
                output.message = Some(format!("Added habit {} ({}).", habit.name, habit.id));
                Ok(output)
            }
        }
    }

    fn views(&self, include_inactive: bool) -> Vec<HabitView> {
        self.app
            .habits()
            .iter()
            .filter(|h| include_inactive || h.is_active)
            .map(|h: &Habit| HabitView {
                id: h.id.clone(),
                name: h.name.clone(),
                icon: h.icon.clone(),
                category: h.category,
                experience_reward: h.experience_reward,
                is_active: h.is_active,
                completed_today: self.app.is_habit_completed_today(&h.id),
                total_completions: self.app.habit_completion_count(&h.id),
            })
            .collect()
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &HabitsOutput, options: &HabitsOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &HabitsOutput) -> String {
        let mut lines = Vec::new();

        if let Some(report) = &output.completion {
            if report.newly_completed {
                lines.push(format!("Completed {}.", report.habit_id));
                lines.extend(describe_gain(&report.gain));
            } else {
                lines.push(format!("{} is already done today.", report.habit_id));
            }
            lines.push(String::new());
        }
        if let Some(message) = &output.message {
            lines.push(message.clone());
            lines.push(String::new());
        }

        if !output.success {
            lines.push(format!(
                "Habits failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            ));
            return lines.join("\n");
        }

        if output.habits.is_empty() {
            lines.push("No habits.".to_string());
            return lines.join("\n");
        }

        for habit in &output.habits {
            let mark = if habit.completed_today { "[x]" } else { "[ ]" };
            let inactive = if habit.is_active { "" } else { " (inactive)" };
            lines.push(format!(
                "{} {} {:<28} {:>3} XP  {}{}",
                mark,
                habit.icon,
                habit.name,
                habit.experience_reward,
                habit.id,
                inactive
            ));
        }

        lines.join("\n")
    }
}
