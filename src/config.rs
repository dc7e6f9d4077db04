//! Configuration loading for Gator.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.gator/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The app runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FailOpen, GatorError, Result};

/// Main configuration struct for Gator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Experience awarded for non-habit activities.
    pub rewards: RewardsConfig,
    /// Streak policy.
    pub streak: StreakConfig,
    /// Snapshot location.
    pub storage: StorageConfig,
}

/// Experience rewards for check-ins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RewardsConfig {
    /// XP for a mood check-in.
    pub mood_check_in: u32,
    /// XP for a journal entry.
    pub journal_entry: u32,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            mood_check_in: 10,
            journal_entry: 15,
        }
    }
}

/// Which actions count as daily activity for the streak.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreakConfig {
    /// When true, completing a habit also records streak activity.
    /// Mood check-ins always do.
    pub count_habit_completions: bool,
}

/// Where the snapshot lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// State file name, relative to the gator home unless absolute.
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: DEFAULT_STATE_FILE.to_string(),
        }
    }
}

/// Default state file name.
pub const DEFAULT_STATE_FILE: &str = "state.json";

impl StorageConfig {
    /// Check if a state file value is usable.
    pub fn is_valid_state_file(value: &str) -> bool {
        !value.trim().is_empty()
    }
}

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. User config (`~/.gator/config.toml`)
    /// 3. Defaults
    pub fn load() -> Self {
        match gator_home() {
            Some(home) => Self::load_from_home(&home),
            None => {
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific gator home directory.
    pub fn load_from_home(home: &Path) -> Self {
        // Start with defaults
        let mut config = Config::default();

        // Layer 3 → 2: Apply user config
        let config_path = home.join("config.toml");
        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(user_config) => config = config.merge(user_config),
                Err(e) => tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "ignoring unreadable config file"
                ),
            }
        }

        // Layer 2 → 1: Apply environment variables
        config.apply_env_overrides();

        config
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| GatorError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| GatorError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // GATOR_MOOD_REWARD
        if let Ok(val) = env::var("GATOR_MOOD_REWARD") {
            match val.parse::<u32>() {
                Ok(n) => self.rewards.mood_check_in = n,
                Err(_) => eprintln!(
                    "Warning: Invalid GATOR_MOOD_REWARD value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.rewards.mood_check_in
                ),
            }
        }

        // GATOR_JOURNAL_REWARD
        if let Ok(val) = env::var("GATOR_JOURNAL_REWARD") {
            match val.parse::<u32>() {
                Ok(n) => self.rewards.journal_entry = n,
                Err(_) => eprintln!(
                    "Warning: Invalid GATOR_JOURNAL_REWARD value '{}'. \
                    Expected a non-negative integer. Using '{}'.",
                    val, self.rewards.journal_entry
                ),
            }
        }

        // GATOR_STREAK_ON_HABIT
        if let Ok(val) = env::var("GATOR_STREAK_ON_HABIT") {
            match val.as_str() {
                "true" | "1" => self.streak.count_habit_completions = true,
                "false" | "0" => self.streak.count_habit_completions = false,
                _ => eprintln!(
                    "Warning: Invalid GATOR_STREAK_ON_HABIT value '{}'. \
                    Expected true/false. Using '{}'.",
                    val, self.streak.count_habit_completions
                ),
            }
        }

        // GATOR_STATE_FILE
        if let Ok(val) = env::var("GATOR_STATE_FILE") {
            if StorageConfig::is_valid_state_file(&val) {
                self.storage.state_file = val;
            } else {
                eprintln!(
                    "Warning: Invalid GATOR_STATE_FILE value '{}'. \
                    Must not be empty. Using '{}'.",
                    val, self.storage.state_file
                );
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Values from `other` take precedence when they differ from defaults,
    /// so a layer only needs to specify its customizations. A value
    /// explicitly set to the default cannot override a lower layer.
    fn merge(mut self, other: Config) -> Self {
        let default_rewards = RewardsConfig::default();
        if other.rewards.mood_check_in != default_rewards.mood_check_in {
            self.rewards.mood_check_in = other.rewards.mood_check_in;
        }
        if other.rewards.journal_entry != default_rewards.journal_entry {
            self.rewards.journal_entry = other.rewards.journal_entry;
        }

        if other.streak.count_habit_completions {
            self.streak.count_habit_completions = true;
        }

        if other.storage.state_file != DEFAULT_STATE_FILE
            && StorageConfig::is_valid_state_file(&other.storage.state_file)
        {
            self.storage.state_file = other.storage.state_file;
        }

        self
    }

    /// Load config with fail-open behavior.
    ///
    /// If loading fails for any reason, returns defaults.
    pub fn load_fail_open() -> Self {
        let result: Result<Self> = Ok(Self::load());
        result.fail_open_default("loading config")
    }

    /// Resolve the snapshot path against `home`.
    pub fn state_path_in(&self, home: &Path) -> PathBuf {
        let file = Path::new(&self.storage.state_file);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            home.join(file)
        }
    }

    /// Resolve the snapshot path against the gator home.
    pub fn state_path(&self) -> Option<PathBuf> {
        gator_home().map(|home| self.state_path_in(&home))
    }
}

/// Get the Gator home directory.
///
/// Uses `GATOR_HOME` when set and non-empty, otherwise `~/.gator`.
/// Relative `GATOR_HOME` values are canonicalized when they exist.
pub fn gator_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("GATOR_HOME") {
        if home.is_empty() {
            tracing::warn!("GATOR_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("GATOR_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".gator"));
    }

    // Containerized/minimal environments without HOME
    let fallback_path = fallback_gator_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

#[cfg(unix)]
fn fallback_gator_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/gator-{}", uid))
}

#[cfg(not(unix))]
fn fallback_gator_home() -> PathBuf {
    std::env::temp_dir().join("gator")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_VARS: &[&str] = &[
        "GATOR_MOOD_REWARD",
        "GATOR_JOURNAL_REWARD",
        "GATOR_STREAK_ON_HABIT",
        "GATOR_STATE_FILE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join("config.toml"), content).unwrap();
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.rewards.mood_check_in, 10);
        assert_eq!(config.rewards.journal_entry, 15);
        assert!(!config.streak.count_habit_completions);
        assert_eq!(config.storage.state_file, "state.json");
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
[rewards]
mood_check_in = 25

[streak]
count_habit_completions = true
"#,
        );

        let config = Config::load_from_file(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.rewards.mood_check_in, 25);
        assert!(config.streak.count_habit_completions);
        // Other fields should be defaults
        assert_eq!(config.rewards.journal_entry, 15);
        assert_eq!(config.storage.state_file, "state.json");
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(GatorError::Storage { .. })));
    }

    #[test]
    fn test_load_from_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "this is not valid toml [[[");

        let result = Config::load_from_file(&dir.path().join("config.toml"));
        assert!(matches!(result, Err(GatorError::Config { .. })));
    }

    #[test]
    #[serial]
    fn test_user_config_applied() {
        clear_env();
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[rewards]\njournal_entry = 40\n");

        let config = Config::load_from_home(dir.path());
        assert_eq!(config.rewards.journal_entry, 40);
        assert_eq!(config.rewards.mood_check_in, 10);
    }

    #[test]
    #[serial]
    fn test_invalid_user_config_falls_back_to_defaults() {
        clear_env();
        let dir = TempDir::new().unwrap();
        write_config(&dir, "rewards = 7");

        let config = Config::load_from_home(dir.path());
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_env_var_precedence() {
        clear_env();
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[rewards]\nmood_check_in = 30\n");

        env::set_var("GATOR_MOOD_REWARD", "50");
        let config = Config::load_from_home(dir.path());
        assert_eq!(config.rewards.mood_check_in, 50);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides() {
        clear_env();
        env::set_var("GATOR_MOOD_REWARD", "12");
        env::set_var("GATOR_JOURNAL_REWARD", "0");
        env::set_var("GATOR_STREAK_ON_HABIT", "1");
        env::set_var("GATOR_STATE_FILE", "other.json");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_home(dir.path());

        assert_eq!(config.rewards.mood_check_in, 12);
        assert_eq!(config.rewards.journal_entry, 0);
        assert!(config.streak.count_habit_completions);
        assert_eq!(config.storage.state_file, "other.json");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_env_var_invalid_values_ignored() {
        clear_env();
        env::set_var("GATOR_MOOD_REWARD", "lots");
        env::set_var("GATOR_STREAK_ON_HABIT", "maybe");
        env::set_var("GATOR_STATE_FILE", "  ");

        let dir = TempDir::new().unwrap();
        let config = Config::load_from_home(dir.path());

        assert_eq!(config.rewards.mood_check_in, 10);
        assert!(!config.streak.count_habit_completions);
        assert_eq!(config.storage.state_file, "state.json");

        clear_env();
    }

    #[test]
    fn test_merge_keeps_lower_layer_customizations() {
        let mut base = Config::default();
        base.rewards.mood_check_in = 20;

        let mut overlay = Config::default();
        overlay.rewards.journal_entry = 5;

        let merged = base.merge(overlay);
        assert_eq!(merged.rewards.mood_check_in, 20);
        assert_eq!(merged.rewards.journal_entry, 5);
    }

    #[test]
    fn test_state_path_in() {
        let home = Path::new("/home/someone/.gator");
        let mut config = Config::default();
        assert_eq!(config.state_path_in(home), home.join("state.json"));

        config.storage.state_file = "/var/lib/gator.json".to_string();
        assert_eq!(
            config.state_path_in(home),
            PathBuf::from("/var/lib/gator.json")
        );
    }

    #[test]
    #[serial]
    fn test_gator_home_with_env() {
        let dir = TempDir::new().unwrap();
        env::set_var("GATOR_HOME", dir.path().to_str().unwrap());

        let home = gator_home().unwrap();
        assert_eq!(home, dir.path());

        env::remove_var("GATOR_HOME");
    }

    #[test]
    #[serial]
    fn test_gator_home_fallback() {
        env::remove_var("GATOR_HOME");

        let home = gator_home();
        assert!(home.is_some());
        let home = home.unwrap();
        assert!(home.ends_with(".gator") || home.to_string_lossy().contains("gator-"));
    }

    #[test]
    #[serial]
    fn test_gator_home_empty_env() {
        env::set_var("GATOR_HOME", "");

        let home = gator_home();
        assert!(home.is_some());

        env::remove_var("GATOR_HOME");
    }

    #[test]
    #[serial]
    fn test_load_fail_open() {
        clear_env();
        let config = Config::load_fail_open();
        assert!(StorageConfig::is_valid_state_file(&config.storage.state_file));
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let mut config = Config::default();
        config.rewards.mood_check_in = 3;
        config.streak.count_habit_completions = true;
        config.storage.state_file = "gator.json".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
