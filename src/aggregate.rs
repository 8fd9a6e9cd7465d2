//! Group-by-region summation.

use std::collections::BTreeMap;

use tracing::info;

use crate::records::{ReferendumArea, RegionResult};

/// Sums the five count columns per region. Output is ordered by region code;
/// the region name is taken from the first row of each group.
///
/// Aggregation is lossy on purpose: department- and town-level detail is not
/// recoverable from the result.
pub fn compute_results_by_region(rows: &[ReferendumArea]) -> Vec<RegionResult> {
    let mut groups: BTreeMap<&str, RegionResult> = BTreeMap::new();

    for row in rows {
        let entry = groups
            .entry(row.region_code.as_str())
            .or_insert_with(|| RegionResult {
                region_code: row.region_code.clone(),
                region_name: row.region_name.clone(),
                counts: Default::default(),
            });
        entry.counts.accumulate(&row.counts);
    }

    let results: Vec<RegionResult> = groups.into_values().collect();
    info!(regions = results.len(), "aggregated results by region");
    results
}
