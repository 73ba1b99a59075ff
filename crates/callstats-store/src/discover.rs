//! Snapshot discovery in an inbox directory.
//!
//! The acquisition side drops one export per day named with a
//! `DD-MM-YYYY.csv` stamp (e.g. `calls_01-05-2024.csv`). The newest stamp
//! wins; modification times are ignored because re-uploads touch old files.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use crate::StoreError;

static SNAPSHOT_STAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2}-\d{2}-\d{4})\.csv").expect("static regex"));

/// Date stamp of a snapshot file name, if it carries a valid one.
pub fn snapshot_date(file_name: &str) -> Option<NaiveDate> {
    let caps = SNAPSHOT_STAMP.captures(file_name)?;
    NaiveDate::parse_from_str(caps.get(1)?.as_str(), "%d-%m-%Y").ok()
}

/// Path of the most recent snapshot in `dir`.
///
/// Ties on date go to the lexicographically greatest file name.
pub fn latest_snapshot(dir: &Path) -> Result<PathBuf, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::InputNotFound(dir.to_path_buf()));
    }
    let unreadable = |source| StoreError::InputUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut best: Option<(NaiveDate, String, PathBuf)> = None;
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.path().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(date) = snapshot_date(&name) else {
            debug!(file = %name, "skipping file without a snapshot date stamp");
            continue;
        };
        let candidate = (date, name, entry.path());
        if best.as_ref().is_none_or(|b| (&candidate.0, &candidate.1) > (&b.0, &b.1)) {
            best = Some(candidate);
        }
    }

    let (date, name, path) = best.ok_or_else(|| StoreError::NoSnapshot(dir.to_path_buf()))?;
    info!(file = %name, %date, "selected latest CDR snapshot");
    Ok(path)
}
