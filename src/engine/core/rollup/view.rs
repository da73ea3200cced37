use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::Serialize;

use super::derived::{
    DerivedMetricSet, finite_or_zero, guarded_quotient, guarded_ratio, percentage_share,
};
use super::group_key::GroupKey;
use super::plan::{RollupPlan, ShareBasis, SummaryStat};

/// One presented row of a rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedBucket {
    pub key: GroupKey,
    pub dimensions: IndexMap<String, String>,
    pub metrics: DerivedMetricSet,
    /// Floored percentage of the grand total, when the plan asks for shares
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<u32>,
}

impl RankedBucket {
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions.get(name).map(String::as_str)
    }
}

/// Final, display-ready output of one rollup pass. `buckets` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollupResult {
    pub rollup: String,
    pub buckets: Vec<RankedBucket>,
    /// Number of groups before top-N truncation
    pub total_groups: usize,
    pub summary: IndexMap<String, f64>,
    pub is_fallback: bool,
}

impl RollupResult {
    /// Finds a row by its dimension values.
    pub fn bucket<S: AsRef<str>>(&self, parts: &[S]) -> Option<&RankedBucket> {
        let key = GroupKey::from_parts(parts);
        self.buckets.iter().find(|b| b.key == key)
    }

    pub fn summary_value(&self, name: &str) -> Option<f64> {
        self.summary.get(name).copied()
    }
}

/// A finished group awaiting ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedGroup {
    pub key: GroupKey,
    pub dimensions: Vec<String>,
    pub metrics: DerivedMetricSet,
}

/// Grand totals over every group of a pass.
pub fn summarize(stats: &[SummaryStat], sets: &[&DerivedMetricSet]) -> IndexMap<String, f64> {
    let sum_of = |field: &str| sets.iter().map(|s| s.value(field)).sum::<f64>();

    let mut out = IndexMap::with_capacity(stats.len());
    for stat in stats {
        let value = match stat {
            SummaryStat::BucketCount { .. } => sets.len() as f64,
            SummaryStat::RecordCount { .. } => sets.iter().map(|s| s.count() as f64).sum(),
            SummaryStat::Sum { field, .. } => sum_of(field),
            SummaryStat::Max { field, .. } => sets
                .iter()
                .map(|s| s.value(field))
                .fold(0.0_f64, f64::max),
            SummaryStat::Mean { field, .. } => guarded_quotient(sum_of(field), sets.len() as f64),
            SummaryStat::Ratio {
                numerator,
                denominator,
                ..
            } => guarded_ratio(sum_of(numerator), sum_of(denominator)),
            SummaryStat::Quotient {
                numerator,
                denominator,
                ..
            } => guarded_quotient(sum_of(numerator), sum_of(denominator)),
            SummaryStat::CountWhere { field, .. } => {
                sets.iter().filter(|s| s.value(field) > 0.0).count() as f64
            }
        };
        out.insert(stat.name().to_string(), finite_or_zero(value));
    }
    out
}

/// Ranks, truncates and summarizes the finished groups of a plan.
pub struct RollupViewBuilder<'a> {
    plan: &'a RollupPlan,
    top_n: Option<usize>,
}

impl<'a> RollupViewBuilder<'a> {
    pub fn new(plan: &'a RollupPlan, top_n: Option<usize>) -> Self {
        Self { plan, top_n }
    }

    pub fn build(&self, groups: Vec<FinishedGroup>, is_fallback: bool) -> RollupResult {
        let total_groups = groups.len();
        let sets: Vec<&DerivedMetricSet> = groups.iter().map(|g| &g.metrics).collect();
        let summary = summarize(&self.plan.summary, &sets);

        let share_total = self.plan.share.as_ref().map(|basis| {
            sets.iter()
                .map(|s| Self::share_part(basis, s))
                .sum::<f64>()
        });

        let names: Vec<&str> = self.plan.dimensions.iter().map(|d| d.name.as_str()).collect();
        let mut buckets: Vec<RankedBucket> = groups
            .into_iter()
            .map(|group| {
                let share = match (&self.plan.share, share_total) {
                    (Some(basis), Some(total)) => Some(percentage_share(
                        Self::share_part(basis, &group.metrics),
                        total,
                    )),
                    _ => None,
                };
                RankedBucket {
                    dimensions: names
                        .iter()
                        .zip(group.dimensions)
                        .map(|(n, v)| (n.to_string(), v))
                        .collect(),
                    key: group.key,
                    metrics: group.metrics,
                    share,
                }
            })
            .collect();

        // Stable: equal metrics keep first-seen group order.
        if let Some(metric) = &self.plan.sort_by {
            buckets.sort_by(|a, b| {
                b.metrics
                    .value(metric)
                    .partial_cmp(&a.metrics.value(metric))
                    .unwrap_or(Ordering::Equal)
            });
        }
        if let Some(n) = self.top_n {
            buckets.truncate(n.max(1));
        }

        RollupResult {
            rollup: self.plan.name.clone(),
            buckets,
            total_groups,
            summary,
            is_fallback,
        }
    }

    fn share_part(basis: &ShareBasis, set: &DerivedMetricSet) -> f64 {
        match basis {
            ShareBasis::Records => set.count() as f64,
            ShareBasis::Field(field) => set.value(field),
        }
    }
}
