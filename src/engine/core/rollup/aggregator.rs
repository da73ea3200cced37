use ahash::RandomState as AHashRandomState;
use indexmap::IndexMap;
use tracing::debug;

use super::bucket::AggregateBucket;
use super::group_key::GroupKey;
use super::group_key_builder::GroupKeyBuilder;
use super::plan::{Dimension, FieldRule, RollupPlan};
use crate::engine::core::normalize::{NormalizedFields, NormalizedRecord};

/// Sole writer of the buckets of one pass. Buckets are kept in first-seen order.
pub struct BucketAggregator<'a> {
    builder: GroupKeyBuilder,
    rules: &'a [FieldRule],
    buckets: IndexMap<GroupKey, AggregateBucket, AHashRandomState>,
}

impl<'a> BucketAggregator<'a> {
    pub fn new(dimensions: Vec<Dimension>, rules: &'a [FieldRule]) -> Self {
        Self {
            builder: GroupKeyBuilder::new(dimensions),
            rules,
            buckets: IndexMap::with_hasher(AHashRandomState::new()),
        }
    }

    pub fn from_plan(plan: &'a RollupPlan) -> Self {
        Self::new(plan.dimensions.clone(), &plan.rules)
    }

    /// Keys the record with the configured dimensions and folds it.
    pub fn fold_record(&mut self, record: &NormalizedRecord) {
        let (key, values) = self.builder.build(record);
        self.fold_keyed(key, values, &record.fields);
    }

    /// Folds already-keyed fields, creating the bucket on first sight of `key`.
    pub fn fold_keyed(&mut self, key: GroupKey, dimensions: Vec<String>, fields: &NormalizedFields) {
        let rules = self.rules;
        let bucket = self.buckets.entry(key).or_insert_with_key(|key| {
            debug!(target: "rollup::aggregate", group = %key, "opening bucket");
            AggregateBucket::new(key.clone(), dimensions, rules)
        });
        bucket.fold(fields, rules);
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&AggregateBucket> {
        self.buckets.get(key)
    }

    pub fn dimensions(&self) -> &[Dimension] {
        self.builder.dimensions()
    }

    /// Ends the pass; buckets are returned in first-seen order.
    pub fn finish(self) -> Vec<AggregateBucket> {
        self.buckets.into_values().collect()
    }
}
