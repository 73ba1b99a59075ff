//! Per-run report for operators and schedulers.

use std::path::PathBuf;

use callstats_core::{NormalizeStats, Summaries};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub generated_at: NaiveDateTime,
    pub stats: NormalizeStats,
    pub busy_hours: Vec<u32>,
    pub artifacts: Vec<PathBuf>,
}

impl RunReport {
    pub fn new(source: PathBuf, summaries: &Summaries, artifacts: Vec<PathBuf>) -> Self {
        Self {
            source,
            generated_at: summaries.period.generated_at,
            stats: summaries.stats,
            busy_hours: summaries.hourly.busy_hours(),
            artifacts,
        }
    }

    pub fn log(&self) {
        info!(
            source = %self.source.display(),
            generated_at = %self.generated_at,
            rows = self.stats.rows_read,
            malformed = self.stats.malformed,
            unresolved = self.stats.unresolved,
            busy_hours = ?self.busy_hours,
            artifacts = self.artifacts.len(),
            "run complete"
        );
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
