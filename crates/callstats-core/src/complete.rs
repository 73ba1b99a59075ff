//! Zero-fill and display policy.
//!
//! [`complete`] turns sparse counts into the full roster × domain grid, so a
//! staff member with no calls in a window shows up with `calls == 0` instead
//! of being absent. The exclusion and hourly-display filters run afterwards
//! and are the only place rows are removed.

use tracing::debug;

use crate::aggregate::SparseCounts;
use crate::config::{HourRange, SENTINEL_STAFF, SummaryConfig};
use crate::partition::WindowKey;

/// One cell of the roster × domain grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRow {
    pub staff: String,
    pub window: WindowKey,
    pub calls: u64,
}

/// Cross join `roster` × `domain` and left-merge `counts`, filling gaps with 0.
///
/// Rows come out window-major, roster order within a window. Counts for
/// staff outside the roster are ignored.
pub fn complete(counts: &SparseCounts, roster: &[String], domain: &[WindowKey]) -> Vec<CompletedRow> {
    let mut rows = Vec::with_capacity(roster.len() * domain.len());
    for window in domain {
        for staff in roster {
            let calls = counts
                .get(&(staff.clone(), *window))
                .copied()
                .unwrap_or(0);
            rows.push(CompletedRow {
                staff: staff.clone(),
                window: *window,
                calls,
            });
        }
    }
    rows
}

/// Drop the `"0"` sentinel everywhere, and hide-if-zero staff from windows
/// where they took no calls.
pub fn apply_exclusions(rows: Vec<CompletedRow>, config: &SummaryConfig) -> Vec<CompletedRow> {
    let before = rows.len();
    let kept: Vec<CompletedRow> = rows
        .into_iter()
        .filter(|row| row.staff != SENTINEL_STAFF)
        .filter(|row| row.calls > 0 || !config.hides_when_idle(&row.staff))
        .collect();
    debug!(removed = before - kept.len(), "applied exclusion policy");
    kept
}

/// Keep hourly rows inside business hours and not after `current_hour`.
pub fn restrict_hours(rows: Vec<CompletedRow>, hours: HourRange, current_hour: u32) -> Vec<CompletedRow> {
    rows.into_iter()
        .filter(|row| match row.window.hour() {
            Some(h) => hours.contains(h) && h <= current_hour,
            None => true,
        })
        .collect()
}
