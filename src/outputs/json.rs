//! JSON artifact generation for the backend.
//!
//! The ranked items are serialized as a pretty-printed array with Korean
//! text left unescaped, which is the shape the consuming backend reads.

use crate::models::NewsItem;
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

/// File name the consuming backend looks for inside a run directory.
pub const ARTIFACT_FILE: &str = "news_extracted.json";

/// Write ranked items to `{out_dir}/news_extracted.json`.
///
/// Creates the run directory if needed and writes the serialized items as
/// pretty-printed JSON.
///
/// # Arguments
///
/// * `items` - The ranked items to serialize
/// * `out_dir` - Timestamped run directory
///
/// # Returns
///
/// The artifact path on success, or an error if serialization, directory
/// creation, or the file write fails.
#[instrument(level = "info", skip_all, fields(out_dir = %out_dir))]
pub async fn write_items(items: &[NewsItem], out_dir: &str) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(items)?;

    info!(%out_dir, "Ensuring run directory exists");
    if let Err(e) = fs::create_dir_all(out_dir).await {
        error!(%out_dir, error = %e, "Failed to create run dir");
        return Err(e.into());
    }

    let path = format!("{}/{}", out_dir.trim_end_matches('/'), ARTIFACT_FILE);

    info!(path = %path, "Writing JSON");
    fs::write(&path, json).await?;
    info!(path = %path, count = items.len(), "Wrote crawl artifact");

    Ok(path)
}
