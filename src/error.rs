//! Unified error types for Gator.
//!
//! Engine operations are total over well-formed input, so most of these
//! variants come from the edges: storage, configuration and user input.
//! Persistence failures are fail-open: the in-memory state stays the source
//! of truth and the caller decides whether to retry.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Gator operations.
#[derive(Error, Debug)]
pub enum GatorError {
    /// I/O errors from state file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML (de)serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// A habit id that is not in the habit list.
    #[error("habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    /// A journal entry id that is not in the journal.
    #[error("journal entry not found: {entry_id}")]
    JournalEntryNotFound { entry_id: String },

    /// Selecting a cosmetic that has not been unlocked yet.
    #[error("{kind} '{id}' is not unlocked")]
    NotUnlocked { kind: &'static str, id: String },

    /// Rejected user input (empty names, out-of-range mood, ...).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A level table that violates its ordering invariants.
    #[error("invalid level table: {message}")]
    InvalidTable { message: String },
}

/// A specialized Result type for Gator operations.
pub type Result<T> = std::result::Result<T, GatorError>;

impl GatorError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a habit not found error.
    pub fn habit_not_found(habit_id: impl Into<String>) -> Self {
        Self::HabitNotFound {
            habit_id: habit_id.into(),
        }
    }

    /// Create a journal entry not found error.
    pub fn journal_entry_not_found(entry_id: impl Into<String>) -> Self {
        Self::JournalEntryNotFound {
            entry_id: entry_id.into(),
        }
    }

    /// Create a not-unlocked error for a cosmetic kind ("accessory", "environment").
    pub fn not_unlocked(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotUnlocked {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invalid level table error.
    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    /// Whether the failure leaves in-memory state intact and can be retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Serde { .. })
    }
}

impl From<io::Error> for GatorError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Trait for fail-open error handling.
///
/// Log the error and carry on with a safe value instead of aborting the
/// user's action.
pub trait FailOpen<T> {
    /// Handle an error by logging a warning and returning the default value.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("{}: {} (fail-open: using default)", context, err);
                T::default()
            }
        }
    }
}

/// Exit codes for the Gator CLI.
pub mod exit_codes {
    /// Command completed.
    pub const OK: i32 = 0;

    /// Command failed (bad input, unknown id, storage error).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
