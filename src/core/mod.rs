//! Core types and logic for Gator.
//!
//! Pure domain engines: the level table, gator progression, the streak
//! engine, the habit completion ledger, mood/journal records and the
//! derived daily views. Nothing in here touches the filesystem or the
//! wall clock; callers pass dates and timestamps in.

pub mod cosmetics;
pub mod daily;
pub mod gator;
pub mod habits;
pub mod journal;
pub mod ledger;
pub mod levels;
pub mod state;
pub mod streak;

pub use cosmetics::{Accessory, Environment};
pub use daily::{expression_for, DailyProgress};
pub use gator::{ExperienceGain, Gator, GatorExpression, UnlockedItem};
pub use habits::{default_habits, Habit, HabitCategory, NewHabit};
pub use journal::{JournalEntry, JournalUpdate, MoodEntry, MoodLevel};
pub use ledger::{CompletionLedger, CompletionOutcome, HabitCompletion};
pub use levels::{LevelProgress, LevelTable, LevelThreshold, Unlock, STANDARD_LEVELS};
pub use state::{AppState, UserProfile, STATE_SCHEMA_VERSION};
pub use streak::{
    is_milestone, streak_from_dates, StreakData, StreakStatus, StreakSummary, StreakTransition,
    STREAK_MILESTONES,
};
