//! JSON snapshot of the dashboard for external viewers.
//!
//! The file holds exactly what a view needs: stories, videos, the last
//! updated time, the error message and the ticker. It is written to a
//! temporary file first and renamed into place so readers never see a
//! partial document.

use crate::dashboard::DashboardState;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

pub const SNAPSHOT_FILENAME: &str = "snapshot.json";

/// Write `state` to `{json_output_dir}/snapshot.json`.
///
/// # Returns
///
/// The path written, or an error if directory creation or writing fails.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    state: &DashboardState,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(state)?;

    if let Err(e) = fs::create_dir_all(json_output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = PathBuf::from(json_output_dir).join(SNAPSHOT_FILENAME);
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, &path).await?;
    info!(path = %path.display(), stories = state.stories.len(), videos = state.videos.len(), "Wrote dashboard snapshot");

    Ok(path)
}
