//! The persisted application snapshot.
//!
//! `AppState` is the single blob the storage layer reads and writes. It
//! aggregates the gator, the habit catalogue, the completion ledger, mood
//! and journal records, the streak and the optional user profile.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::gator::Gator;
use crate::core::habits::{default_habits, Habit};
use crate::core::journal::{JournalEntry, MoodEntry};
use crate::core::ledger::CompletionLedger;
use crate::core::levels::LevelTable;
use crate::core::streak::StreakData;
use crate::util::generate_id;

/// Current snapshot schema version.
pub const STATE_SCHEMA_VERSION: u32 = 1;

/// The person using the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub has_completed_onboarding: bool,
    #[serde(default)]
    pub notifications_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<NaiveTime>,
}

impl UserProfile {
    /// A fresh profile that has not finished onboarding.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id("user", now),
            created_at: now,
            has_completed_onboarding: false,
            notifications_enabled: false,
            reminder_time: None,
        }
    }
}

/// Full application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub gator: Gator,
    #[serde(default = "default_habits")]
    pub habits: Vec<Habit>,
    #[serde(default)]
    pub completions: CompletionLedger,
    #[serde(default)]
    pub mood_entries: Vec<MoodEntry>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub streak: StreakData,
}

fn default_schema_version() -> u32 {
    STATE_SCHEMA_VERSION
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: STATE_SCHEMA_VERSION,
            user: None,
            gator: Gator::default(),
            habits: default_habits(),
            completions: CompletionLedger::new(),
            mood_entries: Vec::new(),
            journal_entries: Vec::new(),
            streak: StreakData::default(),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn habit_mut(&mut self, habit_id: &str) -> Option<&mut Habit> {
        self.habits.iter_mut().find(|h| h.id == habit_id)
    }

    pub fn active_habits(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|h| h.is_active)
    }

    /// Repair a loaded snapshot so the gator and ledger invariants hold.
    pub fn normalize(&mut self, table: &LevelTable) {
        self.gator.normalize(table);

        let removed = self.completions.dedup();
        if removed > 0 {
            tracing::warn!(removed, "dropped duplicate habit completions from snapshot");
        }

        if self.streak.longest_streak < self.streak.current_streak {
            self.streak.longest_streak = self.streak.current_streak;
        }
    }
}
