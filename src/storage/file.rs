//! File-based snapshot storage for Gator.
//!
//! The snapshot is a single JSON file, `~/.gator/state.json` by default.
//! Atomic writes are achieved via temp file + rename pattern.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::core::AppState;
use crate::error::{GatorError, Result};
use crate::storage::StateStore;
use crate::util::{read_to_string_with_limit, MAX_STATE_FILE_SIZE};

/// File-based state storage.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    /// Path of the snapshot file.
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store at the path named by `config`, under the gator home.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = config.state_path().ok_or_else(|| {
            GatorError::config("Could not determine state file location (no home directory)")
        })?;
        Self::with_path(path)
    }

    /// Create a store at a specific path, creating its parent directory.
    pub fn with_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| GatorError::storage(parent, e))?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Path an unreadable snapshot is moved to, e.g. `state.json.corrupt-20240301093000`.
    fn quarantine_path(&self, now: DateTime<Utc>) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "state.json".to_string());
        self.path
            .with_file_name(format!("{}.corrupt-{}", name, now.format("%Y%m%d%H%M%S")))
    }

    /// Write the snapshot atomically using temp file + rename.
    fn atomic_write(&self, state: &AppState) -> Result<()> {
        let temp_path = self.temp_path();

        let json = serde_json::to_string_pretty(state)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| GatorError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| GatorError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| GatorError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &self.path).map_err(|e| GatorError::storage(&self.path, e))?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = read_to_string_with_limit(&self.path, MAX_STATE_FILE_SIZE)?;
        let state: AppState = serde_json::from_str(&content)?;

        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        self.atomic_write(state)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| GatorError::storage(&self.path, e))?;
        }

        // Also clean up any temp file
        let temp_path = self.temp_path();
        if temp_path.exists() {
            let _ = fs::remove_file(&temp_path);
        }

        Ok(())
    }

    fn quarantine(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let target = self.quarantine_path(Utc::now());
        fs::rename(&self.path, &target).map_err(|e| GatorError::storage(&self.path, e))?;
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_state_store_roundtrip;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStateStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_path(dir.path().join("state.json")).unwrap();
        (store, dir)
    }

    #[test]
    fn test_file_state_store_roundtrip() {
        let (store, _dir) = create_test_store();
        test_state_store_roundtrip(&store);
    }

    #[test]
    fn test_with_path_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("state.json");

        let _store = FileStateStore::with_path(&nested).unwrap();

        assert!(dir.path().join("nested").is_dir());
        assert!(!nested.exists());
    }

    #[test]
    fn test_from_config_uses_absolute_state_file() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.state_file = dir.path().join("custom.json").display().to_string();

        let store = FileStateStore::from_config(&config).unwrap();
        assert_eq!(store.path(), dir.path().join("custom.json"));
    }

    #[test]
    fn test_atomic_write_creates_valid_json() {
        let (store, _dir) = create_test_store();

        store.save(&AppState::new()).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        let parsed: AppState = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, AppState::new());
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();

        store.save(&AppState::new()).unwrap();

        assert!(!store.temp_path().exists());
        assert!(store
            .temp_path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with('.'));
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let (store, _dir) = create_test_store();
        fs::write(store.path(), "not valid json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, GatorError::Serde { .. }));
    }

    #[test]
    fn test_quarantine_keeps_unreadable_snapshot() {
        let (store, dir) = create_test_store();
        let original = r#"{"gator": {"experience": 5000}, "mood_entries": [{"level": 9}]}"#;
        fs::write(store.path(), original).unwrap();
        assert!(store.load().is_err());

        let moved = store.quarantine().unwrap().unwrap();
        assert_eq!(moved.parent(), Some(dir.path()));
        assert!(moved
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("state.json.corrupt-"));
        assert!(!store.path().exists());

        // A fresh save no longer touches the old data.
        store.save(&AppState::new()).unwrap();
        assert_eq!(fs::read_to_string(&moved).unwrap(), original);
        assert_eq!(store.load().unwrap(), Some(AppState::new()));
    }

    #[test]
    fn test_quarantine_without_file_is_noop() {
        let (store, _dir) = create_test_store();
        assert_eq!(store.quarantine().unwrap(), None);
    }

    #[test]
    fn test_clear_removes_file() {
        let (store, _dir) = create_test_store();
        store.save(&AppState::new()).unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let (store, dir) = create_test_store();
        drop(dir);

        let err = store.save(&AppState::new()).unwrap_err();
        assert!(matches!(err, GatorError::Storage { .. }));
    }
}
