use serde::Deserialize;

use super::fallback::FallbackDataset;
use super::reducer::Reducer;
use crate::engine::core::event::{EventType, RawEventRecord};
use crate::engine::core::normalize::{NormalizedFields, RecordSchema};
use crate::engine::types::FieldValue;

/// Where a grouping dimension reads its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSource {
    /// A text field of the normalized payload
    Field(String),
    /// The record's `entityType`
    EntityType,
    /// The record's `EventType` name
    EventType,
    /// The record id, one row per record
    RecordId,
}

/// One component of the group key, with the value substituted when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub source: DimensionSource,
    pub default: String,
}

impl Dimension {
    pub fn field(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            source: DimensionSource::Field(name.to_string()),
            default: default.to_string(),
        }
    }

    pub fn entity_type(default: &str) -> Self {
        Self {
            name: "entityType".to_string(),
            source: DimensionSource::EntityType,
            default: default.to_string(),
        }
    }

    pub fn event_type() -> Self {
        Self {
            name: "type".to_string(),
            source: DimensionSource::EventType,
            default: EventType::Other.as_str().to_string(),
        }
    }

    pub fn record_id(default: &str) -> Self {
        Self {
            name: "id".to_string(),
            source: DimensionSource::RecordId,
            default: default.to_string(),
        }
    }
}

/// Declares how one payload field is folded into a bucket field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub source: String,
    pub target: String,
    pub reducer: Reducer,
    /// Value a fresh bucket starts from
    pub initial: f64,
}

impl FieldRule {
    pub fn new(source: &str, reducer: Reducer) -> Self {
        Self {
            source: source.to_string(),
            target: source.to_string(),
            reducer,
            initial: 0.0,
        }
    }

    pub fn into_target(mut self, target: &str) -> Self {
        self.target = target.to_string();
        self
    }

    pub fn starting_at(mut self, initial: f64) -> Self {
        self.initial = initial;
        self
    }
}

/// Number substituted for a missing or empty field.
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    Constant(f64),
    /// Value of another field; no fill when it is absent
    Field(String),
    /// `floor(from * factor)`; no fill when `from` is absent
    Scaled { from: String, factor: f64 },
}

impl FillValue {
    pub fn scaled(from: &str, factor: f64) -> Self {
        FillValue::Scaled {
            from: from.to_string(),
            factor,
        }
    }

    pub fn resolve(&self, lookup: impl Fn(&str) -> Option<f64>) -> Option<f64> {
        match self {
            FillValue::Constant(value) => Some(*value),
            FillValue::Field(from) => lookup(from),
            FillValue::Scaled { from, factor } => lookup(from).map(|v| (v * factor).floor()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFill {
    pub field: String,
    pub value: FillValue,
}

impl FieldFill {
    pub fn new(field: &str, value: FillValue) -> Self {
        Self {
            field: field.to_string(),
            value,
        }
    }
}

/// Closed vocabulary of a text field. Other or missing values read as `default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelDomain {
    pub field: String,
    pub allowed: Vec<String>,
    pub default: String,
}

impl LabelDomain {
    pub fn new(field: &str, allowed: &[&str], default: &str) -> Self {
        Self {
            field: field.to_string(),
            allowed: allowed.iter().map(|a| a.to_string()).collect(),
            default: default.to_string(),
        }
    }

    pub fn resolve<'a>(&'a self, value: Option<&'a str>) -> &'a str {
        value
            .filter(|v| self.allowed.iter().any(|a| a == v))
            .unwrap_or(&self.default)
    }
}

/// Which raw records a plan consumes. A plan matches a record if any selector does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordSelector {
    All,
    Type(EventType),
    Entity(String),
}

impl RecordSelector {
    pub fn matches(&self, record: &RawEventRecord) -> bool {
        match self {
            RecordSelector::All => true,
            RecordSelector::Type(t) => record.event_type == *t,
            RecordSelector::Entity(e) => record.has_entity_type(e),
        }
    }
}

/// Canonical per-key processing order, relevant to `OverwriteLast`-style reducers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrder {
    /// Input order as delivered by the caller
    #[default]
    Arrival,
    /// Ascending timestamp, ties kept in input order
    Timestamp,
}

/// Formula evaluated once per finished bucket.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedMetric {
    /// `numerator / denominator * 100`, `0` when the denominator is not positive
    Ratio {
        name: String,
        numerator: String,
        denominator: String,
    },
    /// `numerator / denominator`, `0` when the denominator is not positive
    Quotient {
        name: String,
        numerator: String,
        denominator: String,
    },
    /// Arithmetic midpoint of a `Range` field. Not a statistical median.
    Midpoint { name: String, range: String },
    /// `left * right`
    Product {
        name: String,
        left: String,
        right: String,
    },
}

impl DerivedMetric {
    pub fn ratio(name: &str, numerator: &str, denominator: &str) -> Self {
        DerivedMetric::Ratio {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn quotient(name: &str, numerator: &str, denominator: &str) -> Self {
        DerivedMetric::Quotient {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn midpoint(name: &str, range: &str) -> Self {
        DerivedMetric::Midpoint {
            name: name.to_string(),
            range: range.to_string(),
        }
    }

    pub fn product(name: &str, left: &str, right: &str) -> Self {
        DerivedMetric::Product {
            name: name.to_string(),
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DerivedMetric::Ratio { name, .. }
            | DerivedMetric::Quotient { name, .. }
            | DerivedMetric::Midpoint { name, .. }
            | DerivedMetric::Product { name, .. } => name,
        }
    }
}

/// Grand-total scalar computed across every bucket of a pass, before truncation.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryStat {
    /// Number of distinct groups
    BucketCount { name: String },
    /// Number of records folded into any bucket
    RecordCount { name: String },
    Sum { name: String, field: String },
    Max { name: String, field: String },
    /// Average of a per-bucket value (average-of-averages)
    Mean { name: String, field: String },
    /// `sum(numerator) / sum(denominator) * 100`, zero-guarded
    Ratio {
        name: String,
        numerator: String,
        denominator: String,
    },
    /// `sum(numerator) / sum(denominator)`, zero-guarded
    Quotient {
        name: String,
        numerator: String,
        denominator: String,
    },
    /// Number of buckets whose `field` is positive
    CountWhere { name: String, field: String },
}

impl SummaryStat {
    pub fn bucket_count(name: &str) -> Self {
        SummaryStat::BucketCount {
            name: name.to_string(),
        }
    }

    pub fn record_count(name: &str) -> Self {
        SummaryStat::RecordCount {
            name: name.to_string(),
        }
    }

    pub fn sum(name: &str, field: &str) -> Self {
        SummaryStat::Sum {
            name: name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn max(name: &str, field: &str) -> Self {
        SummaryStat::Max {
            name: name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn mean(name: &str, field: &str) -> Self {
        SummaryStat::Mean {
            name: name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn ratio(name: &str, numerator: &str, denominator: &str) -> Self {
        SummaryStat::Ratio {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn quotient(name: &str, numerator: &str, denominator: &str) -> Self {
        SummaryStat::Quotient {
            name: name.to_string(),
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn count_where(name: &str, field: &str) -> Self {
        SummaryStat::CountWhere {
            name: name.to_string(),
            field: field.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SummaryStat::BucketCount { name }
            | SummaryStat::RecordCount { name }
            | SummaryStat::Sum { name, .. }
            | SummaryStat::Max { name, .. }
            | SummaryStat::Mean { name, .. }
            | SummaryStat::Ratio { name, .. }
            | SummaryStat::Quotient { name, .. }
            | SummaryStat::CountWhere { name, .. } => name,
        }
    }
}

/// Basis for the per-row percentage-of-total share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareBasis {
    Records,
    Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopN {
    /// Use `rollup.top_n` from settings
    #[default]
    Configured,
    Limit(usize),
    Unlimited,
}

/// Full description of one rollup: which records, how to group and fold them,
/// what to derive, and how to present the result.
#[derive(Debug, Clone)]
pub struct RollupPlan {
    pub name: String,
    pub selectors: Vec<RecordSelector>,
    pub schema: Option<&'static RecordSchema>,
    pub required: Vec<String>,
    pub label_domains: Vec<LabelDomain>,
    /// Applied per record to fields the record lacks
    pub record_fills: Vec<FieldFill>,
    /// Applied per finished bucket to fields that are not positive
    pub bucket_fills: Vec<FieldFill>,
    pub dimensions: Vec<Dimension>,
    pub rules: Vec<FieldRule>,
    pub derived: Vec<DerivedMetric>,
    pub sort_by: Option<String>,
    pub top_n: TopN,
    pub share: Option<ShareBasis>,
    pub summary: Vec<SummaryStat>,
    pub order: Option<RecordOrder>,
    pub fallback: Option<FallbackDataset>,
}

impl RollupPlan {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            selectors: Vec::new(),
            schema: None,
            required: Vec::new(),
            label_domains: Vec::new(),
            record_fills: Vec::new(),
            bucket_fills: Vec::new(),
            dimensions: Vec::new(),
            rules: Vec::new(),
            derived: Vec::new(),
            sort_by: None,
            top_n: TopN::Configured,
            share: None,
            summary: Vec::new(),
            order: None,
            fallback: None,
        }
    }

    pub fn select(mut self, selector: RecordSelector) -> Self {
        self.selectors.push(selector);
        self
    }

    pub fn with_schema(mut self, schema: &'static RecordSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn require(mut self, field: &str) -> Self {
        self.required.push(field.to_string());
        self
    }

    pub fn restrict_label(mut self, field: &str, allowed: &[&str], default: &str) -> Self {
        self.label_domains.push(LabelDomain::new(field, allowed, default));
        self
    }

    /// Gives records without `field` the resolved `value`.
    pub fn fill_missing(mut self, field: &str, value: FillValue) -> Self {
        self.record_fills.push(FieldFill::new(field, value));
        self
    }

    /// Replaces a finished bucket's non-positive `field` with the resolved `value`.
    pub fn fill_empty(mut self, field: &str, value: FillValue) -> Self {
        self.bucket_fills.push(FieldFill::new(field, value));
        self
    }

    pub fn group_by(mut self, dimension: Dimension) -> Self {
        self.dimensions.push(dimension);
        self
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn fold(self, field: &str, reducer: Reducer) -> Self {
        self.rule(FieldRule::new(field, reducer))
    }

    pub fn derive(mut self, metric: DerivedMetric) -> Self {
        self.derived.push(metric);
        self
    }

    pub fn sort_by(mut self, metric: &str) -> Self {
        self.sort_by = Some(metric.to_string());
        self
    }

    pub fn top_n(mut self, top_n: TopN) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn share(mut self, basis: ShareBasis) -> Self {
        self.share = Some(basis);
        self
    }

    pub fn summarize(mut self, stat: SummaryStat) -> Self {
        self.summary.push(stat);
        self
    }

    pub fn order(mut self, order: RecordOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn fallback(mut self, dataset: FallbackDataset) -> Self {
        self.fallback = Some(dataset);
        self
    }

    /// A plan without selectors consumes nothing.
    pub fn selects(&self, record: &RawEventRecord) -> bool {
        self.selectors.iter().any(|s| s.matches(record))
    }

    pub fn schema_for(&self, record: &RawEventRecord) -> &'static RecordSchema {
        self.schema
            .unwrap_or_else(|| RecordSchema::for_event_type(record.event_type))
    }

    /// Maps restricted labels into their vocabulary, then fills missing numbers.
    pub fn prepare(&self, fields: &mut NormalizedFields) {
        for domain in &self.label_domains {
            let label = domain.resolve(fields.text(&domain.field)).to_string();
            fields.insert(domain.field.as_str(), FieldValue::Text(label));
        }
        for fill in &self.record_fills {
            if fields.contains(&fill.field) {
                continue;
            }
            if let Some(value) = fill.value.resolve(|name| fields.number(name)) {
                fields.insert(fill.field.as_str(), FieldValue::Number(value));
            }
        }
    }

    pub fn resolve_top_n(&self, configured: usize) -> Option<usize> {
        match self.top_n {
            TopN::Configured => Some(configured),
            TopN::Limit(n) => Some(n),
            TopN::Unlimited => None,
        }
    }
}
