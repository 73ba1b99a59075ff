//! Terminal rendering of summary tables.
//!
//! Mirrors what the dashboard shows: hourly totals with busy hours called
//! out, a staff table per hour, and daily/weekly/monthly leaderboards with a
//! recognition marker per performance tag.

use callstats_core::{Granularity, NormalizeStats, PerformanceTag, Summaries, SummaryTable};

const NAME_WIDTH: usize = 14;
const MAX_BAR: u64 = 40;

// ── Public API ──

/// Print all four tables plus run statistics to stdout.
pub fn print_summaries(summaries: &Summaries) {
    print!("{}", render_summaries(summaries));
}

pub fn render_summaries(summaries: &Summaries) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== Calls for {} (generated {}) ===\n",
        summaries.period.today(),
        summaries.period.generated_at.format("%Y-%m-%d %H:%M")
    ));
    out.push_str(&render_stats(&summaries.stats));
    out.push('\n');
    out.push_str(&render_hourly(&summaries.hourly));
    for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
        out.push('\n');
        out.push_str(&render_period(summaries.table(granularity)));
    }
    out
}

// ── Sections ──

fn render_stats(stats: &NormalizeStats) -> String {
    format!(
        "rows read {}, dropped (bad timestamp) {}, staff calls {}, unresolved {}\n",
        stats.rows_read, stats.malformed, stats.resolved, stats.unresolved
    )
}

pub fn render_hourly(table: &SummaryTable) -> String {
    let mut out = String::new();
    out.push_str("Total calls by hour\n");

    let totals = table.window_totals();
    if totals.is_empty() {
        out.push_str("  (no business hours elapsed yet)\n");
        return out;
    }

    for (window, total) in &totals {
        let bar = "#".repeat((*total).min(MAX_BAR) as usize);
        let busy = table
            .rows_for(*window)
            .next()
            .is_some_and(|r| r.busy == Some(true));
        out.push_str(&format!(
            "  {window}  {bar:<width$} {total:>3}{}\n",
            if busy { "  busy" } else { "" },
            width = MAX_BAR as usize
        ));
    }

    let busy = table.busy_hours();
    if !busy.is_empty() {
        let hours: Vec<String> = busy.iter().map(|h| h.to_string()).collect();
        out.push_str(&format!("Busy hours: {}. Remember phones!\n", hours.join(", ")));
    }

    out.push('\n');
    out.push_str("Hourly call details\n");
    for (window, _) in &totals {
        out.push_str(&format!("  {window}\n"));
        for row in table.rows_for(*window) {
            out.push_str(&format!("    {:<NAME_WIDTH$} {:>4}\n", row.staff, row.calls));
        }
    }
    out
}

pub fn render_period(table: &SummaryTable) -> String {
    let mut out = String::new();
    let title = match table.granularity {
        Granularity::Daily => "Daily calls",
        Granularity::Weekly => "Weekly calls",
        Granularity::Monthly => "Monthly calls",
        Granularity::Hourly => "Hourly calls",
    };
    let window = table
        .windows()
        .first()
        .map(|w| format!(" ({w})"))
        .unwrap_or_default();
    out.push_str(&format!("{title}{window}\n"));

    let Some(first) = table.rows.first() else {
        out.push_str("  (nobody to show)\n");
        return out;
    };

    for row in &table.rows {
        out.push_str(&format!(
            "  {:<NAME_WIDTH$} {:>5}  {}\n",
            row.staff,
            row.calls,
            marker(row.performance)
        ));
    }
    out.push_str(&format!(
        "  {:<NAME_WIDTH$} {:>5}  (average {:.1})\n",
        "total", first.window_total, first.window_average
    ));
    out
}

// ── Helpers ──

fn marker(tag: PerformanceTag) -> &'static str {
    match tag {
        PerformanceTag::Exceptional => "** exceptional",
        PerformanceTag::AboveAverage => "*  above average",
        PerformanceTag::None => "",
    }
}
