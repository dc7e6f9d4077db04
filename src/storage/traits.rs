//! State storage traits for Gator.
//!
//! This module defines the `StateStore` trait for snapshot persistence.

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::AppState;
use crate::error::Result;

/// Trait for snapshot storage backends.
///
/// The whole application state is one opaque blob: loaded once on start,
/// written after every mutation.
pub trait StateStore: Send + Sync {
    /// Load the stored snapshot.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    fn load(&self) -> Result<Option<AppState>>;

    /// Replace the stored snapshot.
    fn save(&self, state: &AppState) -> Result<()>;

    /// Remove the stored snapshot.
    ///
    /// Returns `Ok(())` even if nothing was stored.
    fn clear(&self) -> Result<()>;

    /// Check if a snapshot exists.
    fn exists(&self) -> Result<bool> {
        Ok(self.load()?.is_some())
    }

    /// Move a snapshot that failed to load out of the way, so the next
    /// `save` cannot destroy it.
    ///
    /// Returns where it was moved, or `None` when there was nothing to keep.
    fn quarantine(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Blanket implementation of StateStore for Arc-wrapped stores.
///
/// Lets tests keep a handle on the store they hand to an `AppStore`.
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    fn load(&self) -> Result<Option<AppState>> {
        (**self).load()
    }

    fn save(&self, state: &AppState) -> Result<()> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }

    fn quarantine(&self) -> Result<Option<PathBuf>> {
        (**self).quarantine()
    }
}
