use indexmap::IndexMap;

use super::group_key::GroupKey;
use super::plan::FieldRule;
use super::reducer::Reducer;
use crate::engine::core::normalize::NormalizedFields;
use crate::engine::types::FieldValue;

/// Observed min/max of a `Range` field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
    seeded: bool,
}

impl ValueRange {
    #[inline]
    pub fn observe(&mut self, value: f64) {
        if !self.seeded {
            self.min = value;
            self.max = value;
            self.seeded = true;
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct MeanState {
    sum: f64,
    count: u64,
}

/// Accumulator for one group key, owned by the aggregator for a single pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBucket {
    key: GroupKey,
    dimensions: Vec<String>,
    count: u64,
    values: IndexMap<String, f64>,
    ranges: IndexMap<String, ValueRange>,
    means: IndexMap<String, MeanState>,
    labels: IndexMap<String, String>,
}

impl AggregateBucket {
    /// Fresh bucket with every rule target at its initial value.
    pub fn new(key: GroupKey, dimensions: Vec<String>, rules: &[FieldRule]) -> Self {
        let mut bucket = Self {
            key,
            dimensions,
            count: 0,
            values: IndexMap::new(),
            ranges: IndexMap::new(),
            means: IndexMap::new(),
            labels: IndexMap::new(),
        };
        for rule in rules {
            match rule.reducer {
                Reducer::Label | Reducer::LabelLast => {}
                Reducer::Range => {
                    bucket
                        .ranges
                        .insert(rule.target.clone(), ValueRange::default());
                }
                Reducer::Mean => {
                    bucket.means.insert(rule.target.clone(), MeanState::default());
                    bucket.values.insert(rule.target.clone(), rule.initial);
                }
                _ => {
                    bucket.values.insert(rule.target.clone(), rule.initial);
                }
            }
        }
        bucket
    }

    /// Applies every rule whose source field is present in `fields`.
    /// The record is counted even if no rule applies.
    pub fn fold(&mut self, fields: &NormalizedFields, rules: &[FieldRule]) {
        self.count += 1;
        for rule in rules {
            let Some(value) = fields.get(&rule.source) else {
                continue;
            };
            self.apply(rule, value);
        }
    }

    fn apply(&mut self, rule: &FieldRule, value: &FieldValue) {
        match (rule.reducer, value) {
            (Reducer::Label, FieldValue::Text(text)) => {
                self.labels
                    .entry(rule.target.clone())
                    .or_insert_with(|| text.clone());
            }
            (Reducer::LabelLast, FieldValue::Text(text)) => {
                self.labels.insert(rule.target.clone(), text.clone());
            }
            (Reducer::Count, _) => {
                *self.values.entry(rule.target.clone()).or_insert(rule.initial) += 1.0;
            }
            (Reducer::Range, FieldValue::Number(n)) => {
                self.ranges.entry(rule.target.clone()).or_default().observe(*n);
            }
            (Reducer::Mean, FieldValue::Number(n)) => {
                let state = self.means.entry(rule.target.clone()).or_default();
                state.sum += *n;
                state.count += 1;
                let mean = state.sum / state.count as f64;
                self.values.insert(rule.target.clone(), mean);
            }
            (reducer, FieldValue::Number(n)) if !reducer.is_text() => {
                let slot = self.values.entry(rule.target.clone()).or_insert(rule.initial);
                if let Some(next) = reducer.fold_number(*slot, *n) {
                    *slot = next;
                }
            }
            // text into a numeric rule, or a number into a label rule
            _ => {}
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn range(&self, name: &str) -> Option<&ValueRange> {
        self.ranges.get(name)
    }

    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &IndexMap<String, f64> {
        &self.values
    }

    pub fn ranges(&self) -> &IndexMap<String, ValueRange> {
        &self.ranges
    }

    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }
}
