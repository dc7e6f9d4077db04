//! Utility functions shared across Gator modules.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{GatorError, Result};

/// Maximum state file size that will be read into memory (10 MB).
///
/// Years of daily entries stay far below this; a bigger file is almost
/// certainly not ours.
pub const MAX_STATE_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Generate a record id such as `mood_20240301093000123_9f1c2a7b`.
///
/// The millisecond timestamp keeps ids roughly time-ordered; the random
/// suffix keeps them unique across separate runs of the binary.
pub fn generate_id(prefix: &str, now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        now.format("%Y%m%d%H%M%S%3f"),
        &suffix[..8]
    )
}

/// Read a file into a string, refusing anything above `max_size` bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or exceeds `max_size`.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| GatorError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(GatorError::serde(format!(
            "file {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            max_size
        )));
    }

    fs::read_to_string(path).map_err(|e| GatorError::storage(path, e))
}

/// Truncate a string with ellipsis, counting characters rather than bytes.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}
