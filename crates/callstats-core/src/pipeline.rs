//! Orchestration of one summary run.
//!
//! ```text
//! CallRecord ─normalize─▶ NormalizedRecord ─aggregate─▶ SparseCounts
//!     ─complete─▶ grid ─restrict/exclude─▶ visible rows ─enrich─▶ SummaryTable
//! ```
//!
//! Every stage is a plain function over owned or borrowed data; the same
//! records, configuration and generation instant always give the same tables.

use chrono::NaiveDateTime;
use tracing::info;

use crate::ConfigError;
use crate::aggregate::aggregate;
use crate::complete::{apply_exclusions, complete, restrict_hours};
use crate::config::SummaryConfig;
use crate::enrich::{SummaryTable, enrich};
use crate::partition::{Granularity, Period};
use crate::record::{CallRecord, NormalizeStats, NormalizedRecord, normalize_all};
use crate::resolver::ExtensionResolver;

/// The four rollups of one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Summaries {
    pub period: Period,
    pub stats: NormalizeStats,
    pub hourly: SummaryTable,
    pub daily: SummaryTable,
    pub weekly: SummaryTable,
    pub monthly: SummaryTable,
}

impl Summaries {
    pub fn table(&self, granularity: Granularity) -> &SummaryTable {
        match granularity {
            Granularity::Hourly => &self.hourly,
            Granularity::Daily => &self.daily,
            Granularity::Weekly => &self.weekly,
            Granularity::Monthly => &self.monthly,
        }
    }
}

/// Run the whole pipeline over one CDR snapshot.
///
/// Fails only on invalid configuration; bad rows are dropped or left
/// unresolved and show up in [`Summaries::stats`].
pub fn summarize(
    records: &[CallRecord],
    config: &SummaryConfig,
    generated_at: NaiveDateTime,
) -> Result<Summaries, ConfigError> {
    config.validate()?;
    let resolver = ExtensionResolver::from_config(config);
    let period = Period::at(generated_at);

    let (normalized, stats) = normalize_all(records, &resolver);
    let build = |g| summarize_granularity(&normalized, g, &period, config);

    Ok(Summaries {
        period,
        stats,
        hourly: build(Granularity::Hourly),
        daily: build(Granularity::Daily),
        weekly: build(Granularity::Weekly),
        monthly: build(Granularity::Monthly),
    })
}

/// Aggregate, complete, filter and enrich one granularity.
pub fn summarize_granularity(
    records: &[NormalizedRecord],
    granularity: Granularity,
    period: &Period,
    config: &SummaryConfig,
) -> SummaryTable {
    let counts = aggregate(records, granularity, period);
    let mut rows = complete(&counts, &config.roster, &granularity.domain(period));
    if granularity == Granularity::Hourly {
        rows = restrict_hours(rows, config.business_hours, period.current_hour());
    }
    let rows = apply_exclusions(rows, config);
    let table = enrich(rows, granularity, config);

    info!(
        granularity = %granularity,
        rows = table.rows.len(),
        windows = table.windows().len(),
        "built summary table"
    );
    table
}
