//! Summary artifact writer.
//!
//! Each artifact is written to a temporary file in the output directory and
//! renamed into place, so a failed run never leaves a half-written summary
//! over the previous one.

use std::io::Write;
use std::path::{Path, PathBuf};

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use callstats_core::{Granularity, Summaries, artifact};
use chrono::NaiveDate;
use tempfile::NamedTempFile;
use tracing::info;

use crate::StoreError;

/// File name of a daily/weekly/monthly artifact; `None` for hourly.
pub fn period_file_name(granularity: Granularity) -> Option<&'static str> {
    match granularity {
        Granularity::Hourly => None,
        Granularity::Daily => Some("daily_summary.csv"),
        Granularity::Weekly => Some("weekly_summary.csv"),
        Granularity::Monthly => Some("monthly_summary.csv"),
    }
}

/// File name of the hourly artifact for `date`.
pub fn hourly_file_name(date: NaiveDate) -> String {
    format!("hourly_summary_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes summary tables as CSV into one output directory.
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write all four artifacts; returns their paths in write order.
    ///
    /// Stops at the first failure. Artifacts already renamed into place stay.
    pub fn write_all(&self, summaries: &Summaries) -> Result<Vec<PathBuf>, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let mut written = Vec::with_capacity(4);
        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            if let Some(name) = period_file_name(granularity) {
                let batch = artifact::period_summary_batch(summaries.table(granularity))?;
                written.push(self.write_batch(name, &batch)?);
            }
        }
        let batch = artifact::hourly_summary_batch(&summaries.hourly)?;
        let name = hourly_file_name(summaries.period.today());
        written.push(self.write_batch(&name, &batch)?);

        Ok(written)
    }

    /// Atomically replace `<dir>/<file_name>` with `batch` as headed CSV.
    pub fn write_batch(&self, file_name: &str, batch: &RecordBatch) -> Result<PathBuf, StoreError> {
        let path = self.dir.join(file_name);
        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        {
            let mut writer = WriterBuilder::new().with_header(true).build(tmp.as_file_mut());
            writer
                .write(batch)
                .map_err(|e| write_err(std::io::Error::other(e)))?;
        }
        tmp.as_file_mut().flush().map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        info!(path = %path.display(), rows = batch.num_rows(), "wrote summary artifact");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use callstats_core::{CallRecord, SummaryConfig, summarize};
    use chrono::NaiveDateTime;
    use std::collections::BTreeMap;

    fn config() -> SummaryConfig {
        SummaryConfig {
            roster: vec!["A".into(), "B".into(), "Mike".into()],
            hide_if_zero: vec!["Mike".into()],
            extensions: BTreeMap::from([
                ("*201".to_string(), "A".to_string()),
                ("*202".to_string(), "B".to_string()),
                ("*212".to_string(), "Mike".to_string()),
            ]),
            ..SummaryConfig::default()
        }
    }

    fn summaries() -> Summaries {
        let records = vec![
            CallRecord::new(1, "01/05/2024 09:10", "0123*201"),
            CallRecord::new(2, "01/05/2024 09:20", "0123*201"),
            CallRecord::new(3, "01/05/2024 10:05", "0123*202"),
        ];
        let now = NaiveDateTime::parse_from_str("2024-05-01 10:30", "%Y-%m-%d %H:%M").unwrap();
        summarize(&records, &config(), now).unwrap()
    }

    #[test]
    fn writes_four_artifacts() {
        let tmp = tempfile::TempDir::new().unwrap();
        let writer = ArtifactWriter::new(tmp.path().join("out"));
        let written = writer.write_all(&summaries()).unwrap();

        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "daily_summary.csv",
                "weekly_summary.csv",
                "monthly_summary.csv",
                "hourly_summary_2024-05-01.csv",
            ]
        );

        let daily = std::fs::read_to_string(&written[0]).unwrap();
        let mut lines = daily.lines();
        assert_eq!(lines.next(), Some("Name,Calls,Average Calls,Total Calls"));
        assert!(lines.next().unwrap().starts_with("A,2,1.5,3"));
        assert!(lines.next().unwrap().starts_with("B,1,1.5,3"));
        assert_eq!(lines.next(), None, "idle Mike is hidden");

        let hourly = std::fs::read_to_string(&written[3]).unwrap();
        let lines: Vec<&str> = hourly.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Hour,Name,Calls,Total Calls",
                "9,A,2,2",
                "9,B,0,2",
                "10,B,1,1",
                "10,A,0,1",
            ]
        );
    }

    #[test]
    fn rewrite_is_byte_identical() {
        let tmp = tempfile::TempDir::new().unwrap();
        let first = ArtifactWriter::new(tmp.path().join("a"))
            .write_all(&summaries())
            .unwrap();
        let second = ArtifactWriter::new(tmp.path().join("b"))
            .write_all(&summaries())
            .unwrap();
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(std::fs::read(a).unwrap(), std::fs::read(b).unwrap());
        }
    }

    #[test]
    fn replaces_previous_artifact() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("daily_summary.csv"), "stale\n").unwrap();
        ArtifactWriter::new(tmp.path())
            .write_all(&summaries())
            .unwrap();
        let daily = std::fs::read_to_string(tmp.path().join("daily_summary.csv")).unwrap();
        assert!(daily.starts_with("Name,"));

        // No temporary files left behind.
        let count = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(count, 4);
    }

    #[test]
    fn unwritable_directory_is_a_write_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let err = ArtifactWriter::new(blocker.join("out"))
            .write_all(&summaries())
            .unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn file_names() {
        assert_eq!(period_file_name(Granularity::Hourly), None);
        assert_eq!(
            hourly_file_name(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
            "hourly_summary_2024-05-01.csv"
        );
    }
}
