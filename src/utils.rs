//! Utility functions for timestamps, logging helpers, and file system checks.
//!
//! This module provides helpers used throughout the crawl pipeline:
//! - KST wall-clock access for publish-time math and output directory names
//! - String truncation for logging raw feed bodies
//! - File system validation for the output directory

use chrono::{DateTime, FixedOffset, Utc};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Current wall-clock time in the KST (+09:00) offset.
///
/// Every timestamp the crawler emits, from `publishedAt` fallbacks to the
/// output directory name, is anchored to this offset.
///
/// # Returns
///
/// The current instant as a `DateTime<FixedOffset>` at UTC+9.
pub fn now_kst() -> DateTime<FixedOffset> {
    let kst = FixedOffset::east_opt(9 * 3600).unwrap();
    Utc::now().with_timezone(&kst)
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes with an ellipsis and
/// byte count indicator appended. The cut is backed off to the nearest
/// character boundary so multi-byte text (Korean headlines, for one) never
/// splits mid-character.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits in `max` bytes, otherwise a truncated
/// version with `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let cut = (0..=max).rev().find(|i| s.is_char_boundary(*i)).unwrap_or(0);
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Arguments
///
/// * `path` - The directory path to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable, or an error describing
/// the failure.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
