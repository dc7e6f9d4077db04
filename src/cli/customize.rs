//! Customize command for Gator.
//!
//! Changes the gator's accessory, environment or name. Selecting something
//! that has not been unlocked leaves the gator as it was.

use serde::Serialize;

use crate::app::AppStore;
use crate::clock::Clock;
use crate::core::{Accessory, Environment};
use crate::error::Result;
use crate::storage::StateStore;

/// Options for the customize command.
#[derive(Debug, Clone, Default)]
pub struct CustomizeOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// What to change.
#[derive(Debug, Clone)]
pub enum CustomizeAction {
    Accessory(String),
    Environment(String),
    Name(String),
}

/// Output format for the customize command.
#[derive(Debug, Clone, Serialize)]
pub struct CustomizeOutput {
    pub success: bool,
    /// Whether the requested change took effect.
    pub applied: bool,
    pub name: String,
    pub accessory: Accessory,
    pub environment: Environment,
    pub unlocked_accessories: Vec<Accessory>,
    pub unlocked_environments: Vec<Environment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The customize command implementation.
pub struct CustomizeCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> CustomizeCommand<S, C> {
    /// Create a new customize command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the customize command.
    pub fn run(&mut self, action: CustomizeAction, _options: &CustomizeOptions) -> CustomizeOutput {
        let result = self.apply(action);

        let mut output = self.snapshot();
        match result {
            Ok(applied) => {
                output.applied = applied;
                if let Err(e) = self.app.flush() {
                    output.success = false;
                    output.error = Some(format!("Failed to save state: {}", e));
                }
            }
            Err(e) => {
                output.success = false;
                output.error = Some(e.to_string());
            }
        }
        output
    }

    fn apply(&mut self, action: CustomizeAction) -> Result<bool> {
        match action {
            CustomizeAction::Accessory(id) => Ok(self.app.select_accessory(id.parse()?)),
            CustomizeAction::Environment(id) => Ok(self.app.select_environment(id.parse()?)),
            CustomizeAction::Name(name) => {
                self.app.set_gator_name(&name)?;
                Ok(true)
            }
        }
    }

    fn snapshot(&self) -> CustomizeOutput {
        let gator = self.app.gator();
        CustomizeOutput {
            success: true,
            applied: false,
            name: gator.name.clone(),
            accessory: gator.accessory,
            environment: gator.environment,
            unlocked_accessories: gator.unlocked_accessories.iter().copied().collect(),
            unlocked_environments: gator.unlocked_environments.iter().copied().collect(),
            error: None,
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &CustomizeOutput, options: &CustomizeOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &CustomizeOutput) -> String {
        if let Some(error) = &output.error {
            return format!("Customize failed: {}", error);
        }

        let mut lines = Vec::new();
        if !output.applied {
            lines.push("That isn't unlocked yet. Keep leveling up!".to_string());
        }
        lines.push(format!(
            "{} is wearing {} at the {}.",
            output.name,
            output.accessory.display_name(),
            output.environment.display_name()
        ));
        lines.push(format!(
            "Accessories: {}",
            output
                .unlocked_accessories
                .iter()
                .map(|a| a.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        lines.push(format!(
            "Environments: {}",
            output
                .unlocked_environments
                .iter()
                .map(|e| e.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        lines.join("\n")
    }
}
