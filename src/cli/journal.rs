//! Journal command for Gator.
//!
//! Adds, edits, deletes and lists journal entries. New entries earn the
//! configured journal reward.

use serde::Serialize;

use crate::app::AppStore;
use crate::cli::describe_gain;
use crate::clock::Clock;
use crate::core::{ExperienceGain, JournalEntry, JournalUpdate, MoodLevel};
use crate::error::Result;
use crate::storage::StateStore;
use crate::util::truncate;

/// Options for the journal command.
#[derive(Debug, Clone, Default)]
pub struct JournalOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// What the journal command should do.
#[derive(Debug, Clone)]
pub enum JournalAction {
    Add {
        content: String,
        prompt: Option<String>,
        mood: Option<u8>,
    },
    Edit {
        entry_id: String,
        content: String,
    },
    Delete {
        entry_id: String,
    },
    List {
        limit: usize,
    },
}

/// Output format for the journal command.
#[derive(Debug, Clone, Serialize)]
pub struct JournalOutput {
    pub success: bool,
    pub entries: Vec<JournalEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<ExperienceGain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JournalOutput {
    fn success(entries: Vec<JournalEntry>) -> Self {
        Self {
            success: true,
            entries,
            gain: None,
            message: None,
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            entries: vec![],
            gain: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// The journal command implementation.
pub struct JournalCommand<S: StateStore, C: Clock> {
    app: AppStore<S, C>,
}

impl<S: StateStore, C: Clock> JournalCommand<S, C> {
    /// Create a new journal command.
    pub fn new(app: AppStore<S, C>) -> Self {
        Self { app }
    }

    /// Run the journal command.
    pub fn run(&mut self, action: JournalAction, _options: &JournalOptions) -> JournalOutput {
        match self.execute(action) {
            Ok(mut output) => {
                if let Err(e) = self.app.flush() {
                    output.success = false;
                    output.error = Some(format!("Failed to save state: {}", e));
                }
                output
            }
            Err(e) => JournalOutput::failure(e.to_string()),
        }
    }

    fn execute(&mut self, action: JournalAction) -> Result<JournalOutput> {
        match action {
            JournalAction::Add {
                content,
                prompt,
                mood,
            } => {
                let mood = mood.map(MoodLevel::new).transpose()?;
                let report = self.app.add_journal_entry(&content, prompt, mood)?;
                let mut output = JournalOutput::success(vec![report.record]);
                output.gain = Some(report.gain);
                Ok(output)
            }
            JournalAction::Edit { entry_id, content } => {
                let entry = self
                    .app
                    .update_journal_entry(&entry_id, JournalUpdate::content(content))?;
                let mut output = JournalOutput::success(vec![entry]);
                output.message = Some(format!("Updated {}.", entry_id));
                Ok(output)
            }
            JournalAction::Delete { entry_id } => {
                self.app.delete_journal_entry(&entry_id)?;
                let mut output = JournalOutput::success(vec![]);
                output.message = Some(format!("Deleted {}.", entry_id));
                Ok(output)
            }
            JournalAction::List { limit } => {
                let entries = self
                    .app
                    .journal_entries()
                    .into_iter()
                    .take(limit)
                    .cloned()
                    .collect();
                Ok(JournalOutput::success(entries))
            }
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &JournalOutput, options: &JournalOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &JournalOutput) -> String {
        if !output.success && output.entries.is_empty() {
            return format!(
                "Journal failed: {}",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let mut lines = Vec::new();
        if let Some(gain) = &output.gain {
            lines.push("Journal entry saved.".to_string());
            lines.extend(describe_gain(gain));
        }
        if let Some(message) = &output.message {
            lines.push(message.clone());
        }

        if output.gain.is_none() && output.message.is_none() && output.entries.is_empty() {
            lines.push("No journal entries.".to_string());
        }

        for entry in &output.entries {
            let mood = entry.mood.map(|m| m.emoji()).unwrap_or(" ");
            lines.push(format!(
                "{}  {}  {}  {}",
                entry.date,
                mood,
                entry.id,
                truncate(&entry.content, 60)
            ));
        }

        if let Some(error) = &output.error {
            lines.push(format!("Warning: {}", error));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::Config;
    use crate::storage::MemoryStateStore;
    use chrono::NaiveDate;
    use std::sync::Arc;

    type TestCommand = JournalCommand<Arc<MemoryStateStore>, Arc<FixedClock>>;

    fn command() -> (TestCommand, Arc<MemoryStateStore>, Arc<FixedClock>) {
        let storage = Arc::new(MemoryStateStore::new());
        let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 3).unwrap()));
        let app = AppStore::open(Arc::clone(&storage), Arc::clone(&clock), Config::default());
        (JournalCommand::new(app), storage, clock)
    }

    fn add(cmd: &mut TestCommand, content: &str) -> JournalOutput {
        cmd.run(
            JournalAction::Add {
                content: content.to_string(),
                prompt: None,
                mood: Some(4),
            },
            &JournalOptions::default(),
        )
    }

    #[test]
    fn test_add_entry() {
        let (mut cmd, storage, _clock) = command();
        let output = add(&mut cmd, "Walked by the river");

        assert!(output.success);
        assert_eq!(output.gain.as_ref().unwrap().amount, 15);
        assert_eq!(output.entries[0].mood, Some(MoodLevel::new(4).unwrap()));
        assert_eq!(storage.snapshot().unwrap().journal_entries.len(), 1);
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (mut cmd, _storage, _clock) = command();
        assert!(!add(&mut cmd, "  ").success);

        let output = cmd.run(
            JournalAction::Add {
                content: "ok".to_string(),
                prompt: None,
                mood: Some(9),
            },
            &JournalOptions::default(),
        );
        assert!(!output.success);
    }

    #[test]
    fn test_edit_delete_list() {
        let (mut cmd, storage, clock) = command();
        let id = add(&mut cmd, "first").entries[0].id.clone();
        clock.advance_days(1);
        add(&mut cmd, "second");

        let listed = cmd.run(JournalAction::List { limit: 10 }, &JournalOptions::default());
        assert_eq!(listed.entries.len(), 2);
        assert_eq!(listed.entries[0].content, "second");

        let edited = cmd.run(
            JournalAction::Edit {
                entry_id: id.clone(),
                content: "first, revised".to_string(),
            },
            &JournalOptions::default(),
        );
        assert_eq!(edited.entries[0].content, "first, revised");

        let deleted = cmd.run(
            JournalAction::Delete {
                entry_id: id.clone(),
            },
            &JournalOptions::default(),
        );
        assert!(deleted.success);
        assert_eq!(storage.snapshot().unwrap().journal_entries.len(), 1);

        let missing = cmd.run(JournalAction::Delete { entry_id: id }, &JournalOptions::default());
        assert!(!missing.success);
        assert!(missing.error.unwrap().contains("journal entry not found"));
    }

    #[test]
    fn test_list_empty_text() {
        let (mut cmd, _storage, _clock) = command();
        let output = cmd.run(JournalAction::List { limit: 5 }, &JournalOptions::default());
        let text = cmd.format_output(&output, &JournalOptions::default());
        assert_eq!(text, "No journal entries.");
    }
}
