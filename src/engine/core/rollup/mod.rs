pub mod aggregator;
pub mod bucket;
pub mod derived;
pub mod engine;
pub mod fallback;
pub mod group_key;
pub mod group_key_builder;
pub mod plan;
pub mod reducer;
pub mod view;

pub use derived::DerivedMetricSet;
pub use engine::{aggregate, aggregate_all, aggregate_with};
pub use group_key::GroupKey;
pub use plan::{
    DerivedMetric, Dimension, FieldFill, FieldRule, FillValue, LabelDomain, RecordOrder,
    RecordSelector, RollupPlan, ShareBasis, SummaryStat, TopN,
};
pub use reducer::Reducer;
pub use view::{RankedBucket, RollupResult};

#[cfg(test)]
mod engine_test;
#[cfg(test)]
mod fallback_test;
