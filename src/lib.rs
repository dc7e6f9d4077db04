//! Gator - progression and streak engine for a self-care companion
//!
//! A virtual gator grows as its owner completes daily self-care habits,
//! logs moods and writes journal entries. Experience drives a level table
//! that unlocks cosmetics; consecutive active days build a streak.

pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod core;
pub mod error;
pub mod storage;
pub mod util;

pub use app::{AppStore, CheckInReport, HabitCompletionReport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use core::{AppState, Gator, LevelTable, StreakData};
pub use error::{GatorError, Result};
pub use storage::{FileStateStore, MemoryStateStore, StateStore};

// CLI commands
pub use cli::{
    CustomizeCommand, HabitsCommand, JournalCommand, LevelsCommand, MoodCommand, StatusCommand,
    StreakCommand,
};
