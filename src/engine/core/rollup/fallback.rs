use indexmap::IndexMap;
use tracing::info;

use super::derived;
use super::group_key::GroupKey;
use super::plan::RollupPlan;
use super::reducer::Reducer;
use super::view::{FinishedGroup, RollupResult, RollupViewBuilder};

/// Deterministic synthetic identifier for the `index`-th generated fallback row.
pub fn fallback_id(prefix: &str, index: usize) -> String {
    format!("{}-{}", prefix, index + 1)
}

/// One canned row. Rows without explicit dimension values get a [`fallback_id`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FallbackRow {
    pub dimensions: Option<Vec<String>>,
    pub count: u64,
    pub fields: Vec<(String, f64)>,
    pub labels: Vec<(String, String)>,
}

impl FallbackRow {
    pub fn keyed(dimensions: &[&str]) -> Self {
        Self {
            dimensions: Some(dimensions.iter().map(|d| d.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn generated() -> Self {
        Self::default()
    }

    pub fn count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn field(mut self, name: &str, value: f64) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }

    pub fn label(mut self, name: &str, value: &str) -> Self {
        self.labels.push((name.to_string(), value.to_string()));
        self
    }
}

/// Static substitute shown when a pass produces no buckets.
///
/// `summary` entries override the totals computed from `rows`, so a panel can
/// show e.g. 24 agents while listing only its top five.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FallbackDataset {
    pub rows: Vec<FallbackRow>,
    pub summary: Vec<(String, f64)>,
    /// Prefix for generated row ids; the plan name when unset
    pub id_prefix: Option<String>,
}

impl FallbackDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: FallbackRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn id_prefix(mut self, prefix: &str) -> Self {
        self.id_prefix = Some(prefix.to_string());
        self
    }

    pub fn total(mut self, name: &str, value: f64) -> Self {
        self.summary.push((name.to_string(), value));
        self
    }
}

/// Produces the fallback result of a plan.
pub struct FallbackProvider<'a> {
    plan: &'a RollupPlan,
    top_n: Option<usize>,
}

impl<'a> FallbackProvider<'a> {
    pub fn new(plan: &'a RollupPlan, top_n: Option<usize>) -> Self {
        Self { plan, top_n }
    }

    /// Builds the canned result. Plans without a dataset get one zeroed row keyed
    /// by the dimension defaults.
    pub fn provide(&self) -> RollupResult {
        let synthesized;
        let dataset = match &self.plan.fallback {
            Some(d) if !d.rows.is_empty() => d,
            _ => {
                synthesized = self.zeroed_dataset();
                &synthesized
            }
        };

        info!(
            target: "rollup::fallback",
            rollup = %self.plan.name,
            rows = dataset.rows.len(),
            "substituting fallback dataset"
        );

        let groups = dataset
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let prefix = dataset.id_prefix.as_deref().unwrap_or(&self.plan.name);
                self.finish_row(prefix, i, row)
            })
            .collect();
        let mut result = RollupViewBuilder::new(self.plan, self.top_n).build(groups, true);
        for (name, value) in &dataset.summary {
            result.summary.insert(name.clone(), *value);
        }
        result
    }

    /// Returns `result` untouched unless it has no buckets.
    pub fn substitute_if_empty(&self, result: RollupResult) -> RollupResult {
        if result.buckets.is_empty() {
            self.provide()
        } else {
            result
        }
    }

    fn zeroed_dataset(&self) -> FallbackDataset {
        let defaults: Vec<&str> = self
            .plan
            .dimensions
            .iter()
            .map(|d| d.default.as_str())
            .collect();
        FallbackDataset::new().row(FallbackRow::keyed(&defaults))
    }

    fn finish_row(&self, prefix: &str, index: usize, row: &FallbackRow) -> FinishedGroup {
        let dimensions = match &row.dimensions {
            Some(d) => d.clone(),
            None => {
                let id = fallback_id(prefix, index);
                self.plan.dimensions.iter().map(|_| id.clone()).collect()
            }
        };

        let mut fields: IndexMap<String, f64> = IndexMap::new();
        for rule in &self.plan.rules {
            match rule.reducer {
                Reducer::Label | Reducer::LabelLast => {}
                Reducer::Range => {
                    fields.insert(format!("{}.min", rule.target), 0.0);
                    fields.insert(format!("{}.max", rule.target), 0.0);
                }
                _ => {
                    fields.insert(rule.target.clone(), rule.initial);
                }
            }
        }
        for (name, value) in &row.fields {
            fields.insert(name.clone(), *value);
        }
        let labels = row.labels.iter().cloned().collect();

        FinishedGroup {
            key: GroupKey::from_parts(&dimensions),
            dimensions,
            metrics: derived::from_parts(row.count, fields, labels, &self.plan.derived),
        }
    }
}
