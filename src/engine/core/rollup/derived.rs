use indexmap::IndexMap;
use serde::Serialize;

use super::bucket::AggregateBucket;
use super::plan::{DerivedMetric, FieldFill};

/// Name under which every set exposes its bucket's record count.
pub const COUNT_FIELD: &str = "count";

/// `0` for NaN and infinities, which JSON cannot carry.
#[inline]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// `numerator / denominator * 100`, or `0` when the denominator is not positive.
#[inline]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero((numerator / denominator) * 100.0)
    } else {
        0.0
    }
}

/// `numerator / denominator`, or `0` when the denominator is not positive.
#[inline]
pub fn guarded_quotient(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        finite_or_zero(numerator / denominator)
    } else {
        0.0
    }
}

/// Arithmetic midpoint of a range; `0` unless both bounds are positive.
#[inline]
pub fn midpoint(min: f64, max: f64) -> f64 {
    if min > 0.0 && max > 0.0 {
        finite_or_zero((min + max) / 2.0)
    } else {
        0.0
    }
}

/// Whole-percent share of `part` in `total`, floored.
#[inline]
pub fn percentage_share(part: f64, total: f64) -> u32 {
    if total > 0.0 && part > 0.0 {
        (part / total * 100.0).floor() as u32
    } else {
        0
    }
}

/// Immutable read view of a finished bucket plus its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetricSet {
    count: u64,
    fields: IndexMap<String, f64>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    labels: IndexMap<String, String>,
    metrics: IndexMap<String, f64>,
}

impl DerivedMetricSet {
    /// Looks a name up across the record count, derived metrics and bucket fields.
    pub fn get(&self, name: &str) -> Option<f64> {
        if name == COUNT_FIELD {
            return Some(self.count as f64);
        }
        self.metrics
            .get(name)
            .or_else(|| self.fields.get(name))
            .copied()
    }

    /// Like [`get`](Self::get) but reads unknown names as `0`.
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn fields(&self) -> &IndexMap<String, f64> {
        &self.fields
    }

    pub fn metrics(&self) -> &IndexMap<String, f64> {
        &self.metrics
    }

    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }
}

/// Computes the configured derived metrics of a finished bucket.
///
/// Range fields are exposed as `<name>.min` / `<name>.max`. `fills` run first,
/// in order. Metrics are evaluated in declaration order and may read earlier ones.
pub fn derive(
    bucket: &AggregateBucket,
    fills: &[FieldFill],
    metrics: &[DerivedMetric],
) -> DerivedMetricSet {
    let mut fields = bucket.values().clone();
    for (name, range) in bucket.ranges() {
        fields.insert(format!("{name}.min"), range.min);
        fields.insert(format!("{name}.max"), range.max);
    }
    backfill(&mut fields, fills);
    from_parts(bucket.count(), fields, bucket.labels().clone(), metrics)
}

/// Replaces every filled field that is missing or not positive.
pub fn backfill(fields: &mut IndexMap<String, f64>, fills: &[FieldFill]) {
    for fill in fills {
        if fields.get(&fill.field).is_some_and(|v| *v > 0.0) {
            continue;
        }
        if let Some(value) = fill.value.resolve(|name| fields.get(name).copied()) {
            fields.insert(fill.field.clone(), value);
        }
    }
}

/// Builds a set from already-final field values. Canned fallback rows go
/// through here so their ratios agree with their fields.
pub fn from_parts(
    count: u64,
    fields: IndexMap<String, f64>,
    labels: IndexMap<String, String>,
    metrics: &[DerivedMetric],
) -> DerivedMetricSet {
    let mut set = DerivedMetricSet {
        count,
        fields,
        labels,
        metrics: IndexMap::with_capacity(metrics.len()),
    };
    for metric in metrics {
        let value = match metric {
            DerivedMetric::Ratio {
                numerator,
                denominator,
                ..
            } => guarded_ratio(set.value(numerator), set.value(denominator)),
            DerivedMetric::Quotient {
                numerator,
                denominator,
                ..
            } => guarded_quotient(set.value(numerator), set.value(denominator)),
            DerivedMetric::Midpoint { range, .. } => midpoint(
                set.value(&format!("{range}.min")),
                set.value(&format!("{range}.max")),
            ),
            DerivedMetric::Product { left, right, .. } => set.value(left) * set.value(right),
        };
        set.metrics
            .insert(metric.name().to_string(), finite_or_zero(value));
    }
    set
}
