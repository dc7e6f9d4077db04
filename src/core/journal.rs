//! Mood check-ins and journal entries.
//!
//! Plain timestamped records. They earn experience only through the store,
//! which owns the reward amounts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GatorError, Result};
use crate::util::generate_id;

/// Mood on a 1 (very low) to 5 (great) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(GatorError::invalid_input(format!(
                "mood level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn emoji(&self) -> &'static str {
        match self.0 {
            1 => "😢",
            2 => "😔",
            3 => "😐",
            4 => "🙂",
            _ => "😊",
        }
    }
}

impl TryFrom<u8> for MoodLevel {
    type Error = GatorError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

/// One mood check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub date: NaiveDate,
    pub level: MoodLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    pub fn new(
        level: MoodLevel,
        note: Option<String>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id("mood", now),
            date: today,
            level,
            note: note
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            created_at: now,
        }
    }
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodLevel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Create an entry. Content must not be blank.
    pub fn new(
        content: &str,
        prompt: Option<String>,
        mood: Option<MoodLevel>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let content = content.trim();
        if content.is_empty() {
            return Err(GatorError::invalid_input("journal entry cannot be empty"));
        }
        Ok(Self {
            id: generate_id("journal", now),
            date: today,
            prompt,
            content: content.to_string(),
            mood,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update and bump `updated_at`.
    pub fn apply(&mut self, update: JournalUpdate, now: DateTime<Utc>) -> Result<()> {
        if let Some(content) = update.content {
            let content = content.trim();
            if content.is_empty() {
                return Err(GatorError::invalid_input("journal entry cannot be empty"));
            }
            self.content = content.to_string();
        }
        if let Some(prompt) = update.prompt {
            self.prompt = prompt;
        }
        if let Some(mood) = update.mood {
            self.mood = mood;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Partial update for a journal entry. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalUpdate {
    pub content: Option<String>,
    pub prompt: Option<Option<String>>,
    pub mood: Option<Option<MoodLevel>>,
}

impl JournalUpdate {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }
}
