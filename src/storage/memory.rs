//! In-memory snapshot storage for testing.
//!
//! This module provides a thread-safe in-memory implementation of the
//! StateStore trait, primarily for use in unit tests.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::core::AppState;
use crate::error::{GatorError, Result};
use crate::storage::StateStore;

/// In-memory state store for testing.
///
/// Writes can be switched to fail so callers can exercise the
/// persistence-failure path.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: RwLock<Option<AppState>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStateStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `state`.
    pub fn with_state(state: AppState) -> Self {
        Self {
            state: RwLock::new(Some(state)),
            ..Self::default()
        }
    }

    /// Make subsequent `save` calls fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored snapshot.
    pub fn snapshot(&self) -> Option<AppState> {
        self.state.read().unwrap().clone()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        Ok(self.state.read().unwrap().clone())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatorError::storage(
                "<memory>",
                io::Error::other("writes disabled"),
            ));
        }
        *self.state.write().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.state.write().unwrap() = None;
        Ok(())
    }
}
