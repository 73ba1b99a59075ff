//! Sparse call counts per (staff, window).

use std::collections::BTreeMap;

use tracing::debug;

use crate::partition::{Granularity, Period, WindowKey};
use crate::record::NormalizedRecord;

/// Calls per `(staff, window)`; only combinations with at least one call.
pub type SparseCounts = BTreeMap<(String, WindowKey), u64>;

/// Count resolved records of the current period for one granularity.
pub fn aggregate(
    records: &[NormalizedRecord],
    granularity: Granularity,
    period: &Period,
) -> SparseCounts {
    let mut counts = SparseCounts::new();
    for record in records {
        let Some(staff) = record.staff.name() else {
            continue;
        };
        let Some(window) = granularity.window_of(&record.keys, period) else {
            continue;
        };
        *counts.entry((staff.to_string(), window)).or_default() += 1;
    }
    debug!(
        granularity = %granularity,
        groups = counts.len(),
        calls = counts.values().sum::<u64>(),
        "aggregated"
    );
    counts
}
