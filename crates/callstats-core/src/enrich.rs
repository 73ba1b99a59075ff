//! Per-window totals, averages, performance tags and busy flags.

use std::cmp::Reverse;

use serde::Serialize;

use crate::complete::CompletedRow;
use crate::config::SummaryConfig;
use crate::partition::{Granularity, WindowKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTag {
    None,
    AboveAverage,
    Exceptional,
}

impl PerformanceTag {
    /// Tag `calls` against the window average.
    ///
    /// An all-zero window (average 0) tags everyone `None` rather than
    /// `AboveAverage`.
    pub fn classify(calls: u64, average: f64, multiplier: f64) -> Self {
        if average <= 0.0 {
            return PerformanceTag::None;
        }
        let calls = calls as f64;
        if calls > multiplier * average {
            PerformanceTag::Exceptional
        } else if calls >= average {
            PerformanceTag::AboveAverage
        } else {
            PerformanceTag::None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceTag::None => "none",
            PerformanceTag::AboveAverage => "above_average",
            PerformanceTag::Exceptional => "exceptional",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub staff: String,
    pub window: WindowKey,
    pub calls: u64,
    pub window_total: u64,
    pub window_average: f64,
    pub performance: PerformanceTag,
    /// Set for hourly rows only.
    pub busy: Option<bool>,
}

/// Enriched rows for one granularity, windows ascending, calls descending
/// within a window.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub granularity: Granularity,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct windows in table order.
    pub fn windows(&self) -> Vec<WindowKey> {
        let mut out: Vec<WindowKey> = Vec::new();
        for row in &self.rows {
            if out.last() != Some(&row.window) {
                out.push(row.window);
            }
        }
        out
    }

    pub fn rows_for(&self, window: WindowKey) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(move |r| r.window == window)
    }

    /// `(window, total)` for each window in table order.
    pub fn window_totals(&self) -> Vec<(WindowKey, u64)> {
        self.windows()
            .into_iter()
            .map(|w| {
                let total = self.rows_for(w).next().map_or(0, |r| r.window_total);
                (w, total)
            })
            .collect()
    }

    /// Hours flagged busy, ascending. Empty for period tables.
    pub fn busy_hours(&self) -> Vec<u32> {
        let mut hours: Vec<u32> = self
            .rows
            .iter()
            .filter(|r| r.busy == Some(true))
            .filter_map(|r| r.window.hour())
            .collect();
        hours.dedup();
        hours
    }

    pub fn calls_for(&self, staff: &str) -> u64 {
        self.rows
            .iter()
            .filter(|r| r.staff == staff)
            .map(|r| r.calls)
            .sum()
    }
}

/// Enrich filtered rows into a [`SummaryTable`].
///
/// `rows` must be grouped by window (as [`complete`](crate::complete::complete)
/// produces them) and in roster order within each window; the sort is stable,
/// so that order breaks ties.
pub fn enrich(rows: Vec<CompletedRow>, granularity: Granularity, config: &SummaryConfig) -> SummaryTable {
    let mut out = Vec::with_capacity(rows.len());
    let mut iter = rows.into_iter().peekable();

    while let Some(first) = iter.next() {
        let window = first.window;
        let mut group = vec![first];
        while let Some(next) = iter.next_if(|r| r.window == window) {
            group.push(next);
        }

        let total: u64 = group.iter().map(|r| r.calls).sum();
        let average = total as f64 / group.len() as f64;
        let busy = (granularity == Granularity::Hourly).then_some(total > config.busy_threshold);

        group.sort_by_key(|r| Reverse(r.calls));
        out.extend(group.into_iter().map(|r| SummaryRow {
            performance: PerformanceTag::classify(r.calls, average, config.performance_multiplier),
            staff: r.staff,
            window: r.window,
            calls: r.calls,
            window_total: total,
            window_average: average,
            busy,
        }));
    }

    SummaryTable {
        granularity,
        rows: out,
    }
}
