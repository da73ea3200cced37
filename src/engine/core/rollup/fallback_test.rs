use crate::engine::core::rollup::fallback::{
    FallbackDataset, FallbackProvider, FallbackRow, fallback_id,
};
use crate::engine::core::rollup::plan::{
    DerivedMetric, Dimension, FieldRule, RollupPlan, SummaryStat, TopN,
};
use crate::engine::core::rollup::reducer::Reducer;

fn agents_plan() -> RollupPlan {
    RollupPlan::new("agents")
        .group_by(Dimension::field("agentId", "Unknown Agent"))
        .fold("propertiesListed", Reducer::Sum)
        .fold("propertiesSold", Reducer::Sum)
        .fold("agentName", Reducer::Label)
        .derive(DerivedMetric::ratio(
            "conversionRate",
            "propertiesSold",
            "propertiesListed",
        ))
        .sort_by("propertiesSold")
        .summarize(SummaryStat::bucket_count("totalAgents"))
}

#[test]
fn fallback_ids_are_deterministic() {
    assert_eq!(fallback_id("agent", 0), "agent-1");
    assert_eq!(fallback_id("agent", 4), "agent-5");
}

#[test]
fn provides_canned_rows_with_derived_metrics_and_overrides() {
    let plan = agents_plan().fallback(
        FallbackDataset::new()
            .id_prefix("agent")
            .row(
                FallbackRow::generated()
                    .count(1)
                    .label("agentName", "Sarah Johnson")
                    .field("propertiesListed", 45.0)
                    .field("propertiesSold", 12.0),
            )
            .row(
                FallbackRow::generated()
                    .count(1)
                    .label("agentName", "Michael Chen")
                    .field("propertiesListed", 40.0)
                    .field("propertiesSold", 10.0),
            )
            .total("totalAgents", 24.0),
    );

    let first = FallbackProvider::new(&plan, Some(5)).provide();
    let second = FallbackProvider::new(&plan, Some(5)).provide();

    assert!(first.is_fallback);
    assert_eq!(first, second);
    assert_eq!(first.summary_value("totalAgents"), Some(24.0));

    let sarah = first.bucket(&["agent-1"]).unwrap();
    assert_eq!(sarah.metrics.label("agentName"), Some("Sarah Johnson"));
    assert!((sarah.metrics.value("conversionRate") - 26.666).abs() < 0.01);
    assert_eq!(first.buckets[1].dimension("agentId"), Some("agent-2"));
}

#[test]
fn plan_without_dataset_gets_one_zeroed_default_row() {
    let plan = RollupPlan::new("uptime")
        .group_by(Dimension::field("component", "Unknown"))
        .rule(FieldRule::new("uptime", Reducer::OverwriteLast).starting_at(99.8))
        .rule(FieldRule::new("latency", Reducer::Range))
        .top_n(TopN::Unlimited);

    let result = FallbackProvider::new(&plan, None).provide();

    assert_eq!(result.buckets.len(), 1);
    let row = &result.buckets[0];
    assert_eq!(row.dimension("component"), Some("Unknown"));
    assert_eq!(row.metrics.count(), 0);
    assert_eq!(row.metrics.value("uptime"), 99.8);
    assert_eq!(row.metrics.get("latency.min"), Some(0.0));
}

#[test]
fn substitutes_only_when_result_is_empty() {
    let plan = agents_plan();
    let provider = FallbackProvider::new(&plan, Some(5));
    let canned = provider.provide();

    let kept = provider.substitute_if_empty(canned.clone());
    assert_eq!(kept, canned);

    let mut empty = canned;
    empty.buckets.clear();
    empty.is_fallback = false;
    let replaced = provider.substitute_if_empty(empty);
    assert!(replaced.is_fallback);
    assert!(!replaced.buckets.is_empty());
}
