use rayon::prelude::*;
use tracing::debug;

use super::aggregator::BucketAggregator;
use super::derived::derive;
use super::fallback::FallbackProvider;
use super::plan::{RecordOrder, RollupPlan};
use super::view::{FinishedGroup, RollupResult, RollupViewBuilder};
use crate::engine::core::event::RawEventRecord;
use crate::engine::core::normalize::{NormalizedRecord, normalize};
use crate::shared::config::{ROLLUP_SETTINGS, RollupSettings};

/// Runs one rollup pass over a full snapshot using the configured settings,
/// or the built-in defaults when the configuration cannot be loaded.
pub fn aggregate(records: &[RawEventRecord], plan: &RollupPlan) -> RollupResult {
    aggregate_with(records, plan, &ROLLUP_SETTINGS)
}

/// Runs one rollup pass: select, normalize, order, group, fold, derive, rank,
/// and substitute the fallback dataset if no bucket came out.
///
/// Pure: every call rebuilds its buckets from `records` and never fails.
pub fn aggregate_with(
    records: &[RawEventRecord],
    plan: &RollupPlan,
    settings: &RollupSettings,
) -> RollupResult {
    let top_n = plan.resolve_top_n(settings.top_n);
    let order = plan.order.unwrap_or(settings.record_order);

    let mut normalized: Vec<NormalizedRecord> = records
        .iter()
        .filter(|r| plan.selects(r))
        .map(|r| normalize(r, plan.schema_for(r)))
        .filter(|r| plan.required.iter().all(|f| r.fields.contains(f)))
        .map(|mut r| {
            plan.prepare(&mut r.fields);
            r
        })
        .collect();

    if order == RecordOrder::Timestamp {
        normalized.sort_by_key(|r| r.timestamp);
    }

    let mut aggregator = BucketAggregator::from_plan(plan);
    for record in &normalized {
        aggregator.fold_record(record);
    }

    debug!(
        target: "rollup::aggregate",
        rollup = %plan.name,
        input = records.len(),
        selected = normalized.len(),
        groups = aggregator.len(),
        "rollup pass folded"
    );

    let groups: Vec<FinishedGroup> = aggregator
        .finish()
        .into_iter()
        .map(|bucket| FinishedGroup {
            metrics: derive(&bucket, &plan.bucket_fills, &plan.derived),
            key: bucket.key().clone(),
            dimensions: bucket.dimensions().to_vec(),
        })
        .collect();

    let result = RollupViewBuilder::new(plan, top_n).build(groups, false);
    FallbackProvider::new(plan, top_n).substitute_if_empty(result)
}

/// Runs independent plans over the same snapshot in parallel.
pub fn aggregate_all(records: &[RawEventRecord], plans: &[RollupPlan]) -> Vec<RollupResult> {
    let settings: &RollupSettings = &ROLLUP_SETTINGS;
    plans
        .par_iter()
        .map(|plan| aggregate_with(records, plan, settings))
        .collect()
}
