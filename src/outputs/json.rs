//! Reading and writing the per-site JSON logs.
//!
//! Batches are written pretty-printed so the cache files stay readable by
//! hand; with `BTreeMap`-backed field maps the bytes are deterministic for
//! identical inputs.

use crate::models::{PlayerProfile, RosterMap};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// File name of the cached batch inside a site directory.
pub const BATCH_FILE: &str = "player_data.json";

/// File name of the roster log inside a site directory.
pub const ROSTER_FILE: &str = "player_profile_urls.json";

/// Directory holding one site's logs: `<data_dir>/logs_<site>`.
pub fn site_dir(data_dir: &Path, site: &str) -> PathBuf {
    data_dir.join(format!("logs_{site}"))
}

/// Path of one site's cached batch.
pub fn batch_path(data_dir: &Path, site: &str) -> PathBuf {
    site_dir(data_dir, site).join(BATCH_FILE)
}

/// Write the batch to `<dir>/player_data.json`, creating the directory.
#[instrument(level = "info", skip(batch))]
pub async fn write_batch(dir: &Path, batch: &[PlayerProfile]) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(batch)?;
    let path = dir.join(BATCH_FILE);
    fs::create_dir_all(dir).await?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), records = batch.len(), "Wrote player data");
    Ok(path)
}

/// Write the roster log to `<dir>/player_profile_urls.json`.
#[instrument(level = "info", skip(roster))]
pub async fn write_roster_log(dir: &Path, roster: &RosterMap) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(roster)?;
    let path = dir.join(ROSTER_FILE);
    fs::create_dir_all(dir).await?;
    fs::write(&path, json).await?;
    info!(path = %path.display(), players = roster.len(), "Wrote roster log");
    Ok(path)
}

/// Load a cached batch. A missing file is not an error here; callers decide
/// whether absence means "scrape now" or "serve empty".
pub async fn load_batch(path: &Path) -> Result<Vec<PlayerProfile>, Box<dyn Error>> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}
