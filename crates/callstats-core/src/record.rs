//! Raw CDR rows and their normalised form.
//!
//! Normalisation is row-local and never fails the run: an unparseable
//! timestamp drops the row, an unrecognised destination marks it unresolved.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::partition::TemporalKeys;
use crate::resolver::{ExtensionResolver, StaffIdentity};

/// Timestamp layout of the `Date & Time` column.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Trailing `*<digits>` token, anchored at the end of the destination.
static EXTENSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(\d+)$").expect("static regex"));

/// One input row, exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    /// 1-based data line in the source file, for diagnostics.
    pub line: usize,
    pub timestamp: String,
    pub destination: String,
}

impl CallRecord {
    pub fn new(line: usize, timestamp: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            line,
            timestamp: timestamp.into(),
            destination: destination.into(),
        }
    }
}

/// A parsed, resolved, partitioned call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    pub timestamp: NaiveDateTime,
    /// Bare digits of the trailing extension token, if any.
    pub extension: Option<String>,
    pub staff: StaffIdentity,
    pub keys: TemporalKeys,
}

/// Raw counts for one normalisation pass.
///
/// `resolved + unresolved` is the raw total of kept records; `malformed`
/// rows are gone from every summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows_read: usize,
    pub malformed: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl NormalizeStats {
    pub fn kept(&self) -> usize {
        self.resolved + self.unresolved
    }
}

/// Extract the trailing extension token from a destination field.
///
/// `"0123456789*202"` → `Some("202")`. Trailing whitespace is ignored; a
/// `*digits` run anywhere but the end does not count.
pub fn extract_extension(destination: &str) -> Option<&str> {
    EXTENSION_TOKEN
        .captures(destination.trim_end())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parse a `DD/MM/YYYY HH:MM` timestamp.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Normalise one row; `None` means the row is dropped.
pub fn normalize_record(record: &CallRecord, resolver: &ExtensionResolver) -> Option<NormalizedRecord> {
    let timestamp = parse_timestamp(&record.timestamp)?;
    let extension = extract_extension(&record.destination).map(str::to_string);
    let staff = extension
        .as_deref()
        .map(|ext| resolver.resolve(ext))
        .unwrap_or(StaffIdentity::Unresolved);
    Some(NormalizedRecord {
        timestamp,
        extension,
        staff,
        keys: TemporalKeys::from_timestamp(timestamp),
    })
}

/// Normalise a whole snapshot.
pub fn normalize_all(
    records: &[CallRecord],
    resolver: &ExtensionResolver,
) -> (Vec<NormalizedRecord>, NormalizeStats) {
    let mut stats = NormalizeStats {
        rows_read: records.len(),
        ..NormalizeStats::default()
    };
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let Some(normalized) = normalize_record(record, resolver) else {
            debug!(
                line = record.line,
                timestamp = %record.timestamp,
                "dropping record with malformed timestamp"
            );
            stats.malformed += 1;
            continue;
        };
        if normalized.staff.is_resolved() {
            stats.resolved += 1;
        } else {
            debug!(
                line = record.line,
                destination = %record.destination,
                "record has no known extension"
            );
            stats.unresolved += 1;
        }
        out.push(normalized);
    }

    info!(
        rows = stats.rows_read,
        malformed = stats.malformed,
        resolved = stats.resolved,
        unresolved = stats.unresolved,
        "normalised call records"
    );
    (out, stats)
}
