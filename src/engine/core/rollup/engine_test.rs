use crate::engine::core::event::{EventType, RawEventRecord};
use crate::engine::core::rollup::engine::aggregate_with;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::plan::{
    DerivedMetric, Dimension, FieldRule, FillValue, RecordOrder, RecordSelector, RollupPlan,
    SummaryStat, TopN,
};
use crate::engine::core::rollup::reducer::Reducer;
use crate::shared::config::RollupSettings;
use crate::test_helpers::factory::Factory;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::json;

fn settings() -> RollupSettings {
    RollupSettings::default()
}

fn listing_plan() -> RollupPlan {
    RollupPlan::new("listings")
        .select(RecordSelector::Entity("Property".into()))
        .group_by(Dimension::field("propertyType", "Residential"))
        .fold("views", Reducer::Sum)
        .fold("inquiries", Reducer::Sum)
        .rule(FieldRule::new("views", Reducer::Max).into_target("peakViews"))
        .rule(FieldRule::new("price", Reducer::PairwiseAverage).into_target("averagePrice"))
        .rule(FieldRule::new("price", Reducer::Range).into_target("priceRange"))
        .derive(DerivedMetric::ratio("conversionRate", "inquiries", "views"))
        .derive(DerivedMetric::midpoint("priceRange.median", "priceRange"))
        .sort_by("views")
        .top_n(TopN::Unlimited)
}

fn listing(property_type: &str, views: i64, inquiries: i64, price: i64) -> RawEventRecord {
    Factory::record()
        .with_type(EventType::ListingView)
        .with_entity_type("Property")
        .with_payload(json!({
            "propertyType": property_type,
            "views": views,
            "inquiries": inquiries,
            "price": price,
        }))
        .create()
}

#[test]
fn midpoint_is_arithmetic_not_statistical_median() {
    crate::logging::init_for_tests();
    let records = vec![
        listing("Residential", 10, 1, 100_000),
        listing("Residential", 10, 1, 120_000),
        listing("Residential", 10, 1, 300_000),
    ];

    let result = aggregate_with(&records, &listing_plan(), &settings());
    let row = result.bucket(&["Residential"]).unwrap();

    assert_eq!(row.metrics.value("priceRange.min"), 100_000.0);
    assert_eq!(row.metrics.value("priceRange.max"), 300_000.0);
    assert_eq!(row.metrics.value("priceRange.median"), 200_000.0);
    assert_ne!(row.metrics.value("priceRange.median"), 120_000.0);
}

#[test]
fn zero_views_give_zero_conversion_rate() {
    let records = vec![
        listing("Commercial", 0, 4, 500_000),
        listing("Commercial", 0, 2, 500_000),
    ];
    let result = aggregate_with(&records, &listing_plan(), &settings());
    let row = result.bucket(&["Commercial"]).unwrap();

    assert_eq!(row.metrics.value("conversionRate"), 0.0);
    assert!(!row.metrics.value("conversionRate").is_nan());
}

#[test]
fn records_outside_selector_are_ignored() {
    let mut records = vec![listing("Vacation", 5, 1, 90_000)];
    records.push(
        Factory::record()
            .with_type(EventType::Revenue)
            .with_entity_type("Payment")
            .with_payload(json!({ "views": 1_000 }))
            .create(),
    );

    let result = aggregate_with(&records, &listing_plan(), &settings());
    assert_eq!(result.total_groups, 1);
    assert_eq!(result.buckets[0].metrics.value("views"), 5.0);
}

#[test]
fn mistyped_fields_are_treated_as_absent() {
    let records = vec![
        listing("Residential", 10, 2, 100_000),
        Factory::record()
            .with_entity_type("Property")
            .with_payload(json!({ "propertyType": "Residential", "views": "many", "inquiries": 3 }))
            .create(),
    ];

    let result = aggregate_with(&records, &listing_plan(), &settings());
    let row = result.bucket(&["Residential"]).unwrap();
    assert_eq!(row.metrics.count(), 2);
    assert_eq!(row.metrics.value("views"), 10.0);
    assert_eq!(row.metrics.value("inquiries"), 5.0);
}

#[test]
fn empty_input_yields_non_empty_fallback() {
    let result = aggregate_with(&[], &listing_plan(), &settings());

    assert!(result.is_fallback);
    assert!(!result.buckets.is_empty());
    assert_eq!(result.buckets[0].dimension("propertyType"), Some("Residential"));
}

#[test]
fn permutations_preserving_per_key_order_give_identical_buckets() {
    let mut records = Vec::new();
    for i in 0..30 {
        let kind = ["Residential", "Commercial", "Vacation"][i % 3];
        records.push(listing(kind, (i * 7 % 11) as i64, (i % 4) as i64, 100_000 + i as i64 * 1_000));
    }
    let plan = listing_plan().top_n(TopN::Unlimited);
    let baseline = aggregate_with(&records, &plan, &settings());

    // Shuffle the interleaving of keys while keeping each key's own order.
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut lanes: Vec<Vec<RawEventRecord>> = ["Residential", "Commercial", "Vacation"]
            .iter()
            .map(|k| {
                records
                    .iter()
                    .filter(|r| r.payload_field("propertyType") == Some(&json!(k)))
                    .rev()
                    .cloned()
                    .collect()
            })
            .collect();
        let mut picks: Vec<usize> = lanes
            .iter()
            .enumerate()
            .flat_map(|(lane, recs)| std::iter::repeat_n(lane, recs.len()))
            .collect();
        picks.shuffle(&mut rng);
        let shuffled: Vec<RawEventRecord> = picks
            .into_iter()
            .filter_map(|lane| lanes[lane].pop())
            .collect();

        let result = aggregate_with(&shuffled, &plan, &settings());
        for row in &baseline.buckets {
            let other = result.buckets.iter().find(|b| b.key == row.key).unwrap();
            assert_eq!(other.metrics, row.metrics);
        }
    }
}

#[test]
fn overwrite_last_equals_last_record_in_processing_order() {
    let plan = RollupPlan::new("health")
        .select(RecordSelector::Type(EventType::SystemHealth))
        .group_by(Dimension::field("component", "Unknown"))
        .fold("value", Reducer::OverwriteLast);

    let values = [95.0, 40.0, 70.0, 12.0];
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..5 {
        let mut order = values.to_vec();
        order.shuffle(&mut rng);
        let records: Vec<RawEventRecord> = order
            .iter()
            .map(|v| {
                Factory::record()
                    .with_type(EventType::SystemHealth)
                    .with_payload(json!({ "component": "Cache", "value": v }))
                    .create()
            })
            .collect();

        let result = aggregate_with(&records, &plan, &settings());
        let last = *order.last().unwrap();
        assert_eq!(result.bucket(&["Cache"]).unwrap().metrics.value("value"), last);
    }
}

#[test]
fn timestamp_order_makes_latest_sample_win() {
    let plan = RollupPlan::new("perf")
        .select(RecordSelector::Type(EventType::Performance))
        .fold("cpuUsage", Reducer::OverwriteLast)
        .order(RecordOrder::Timestamp);
    let newer = Factory::record()
        .with_type(EventType::Performance)
        .with_payload(json!({ "cpuUsage": 80 }))
        .at(60)
        .create();
    let older = Factory::record()
        .with_type(EventType::Performance)
        .with_payload(json!({ "cpuUsage": 20 }))
        .at(0)
        .create();

    let result = aggregate_with(&[newer, older], &plan, &settings());
    assert_eq!(result.buckets[0].metrics.value("cpuUsage"), 80.0);
    assert_eq!(result.buckets[0].key.as_str(), "all");
}

#[test]
fn required_fields_filter_records_before_grouping() {
    let plan = RollupPlan::new("pages")
        .select(RecordSelector::Type(EventType::UserEngagement))
        .require("path")
        .group_by(Dimension::field("path", "/"))
        .fold("views", Reducer::Sum);
    let records = vec![
        Factory::record()
            .with_type(EventType::UserEngagement)
            .with_payload(json!({ "path": "/about", "views": 3 }))
            .create(),
        Factory::record()
            .with_type(EventType::UserEngagement)
            .with_payload(json!({ "views": 100 }))
            .create(),
    ];

    let result = aggregate_with(&records, &plan, &settings());
    assert_eq!(result.total_groups, 1);
    assert!(result.bucket(&["/"]).is_none());
}

#[test]
fn running_twice_is_bit_identical() {
    let records = vec![
        listing("Residential", 13, 3, 101_000),
        listing("Commercial", 7, 1, 333_333),
        listing("Residential", 29, 5, 250_500),
    ];
    let plan = listing_plan().summarize(SummaryStat::ratio("conv", "inquiries", "views"));

    let a = aggregate_with(&records, &plan, &settings());
    let b = aggregate_with(&records, &plan, &settings());
    assert_eq!(a, b);
    for (x, y) in a.buckets.iter().zip(&b.buckets) {
        assert_eq!(
            x.metrics.value("averagePrice").to_bits(),
            y.metrics.value("averagePrice").to_bits()
        );
    }
}

#[test]
fn ranks_groups_by_summed_views() {
    let records = vec![
        listing("Vacation", 5, 0, 1),
        listing("Commercial", 9, 0, 1),
        listing("Vacation", 6, 0, 1),
    ];
    let result = aggregate_with(&records, &Factory::plan().create(), &settings());

    assert_eq!(result.buckets[0].dimension("propertyType"), Some("Vacation"));
    assert_eq!(result.buckets[0].metrics.value("views"), 11.0);
    assert_eq!(result.summary_value("records"), Some(3.0));
}

#[test]
fn empty_input_uses_plan_dataset_when_present() {
    let plan = Factory::plan()
        .with_fallback(
            FallbackDataset::new().row(FallbackRow::keyed(&["Demo"]).count(2).field("views", 10.0)),
        )
        .create();

    let result = aggregate_with(&[], &plan, &settings());
    let demo = result.bucket(&["Demo"]).unwrap();
    assert!(result.is_fallback);
    assert_eq!(demo.metrics.value("views"), 10.0);
    assert_eq!(result.summary_value("records"), Some(2.0));
}

#[test]
fn records_lacking_a_field_get_its_fill_before_folding() {
    let plan = RollupPlan::new("pages")
        .select(RecordSelector::Type(EventType::UserEngagement))
        .require("views")
        .fill_missing("uniqueVisitors", FillValue::scaled("views", 0.7))
        .fill_missing("avgTimeOnPage", FillValue::Constant(2.5))
        .group_by(Dimension::field("path", "/"))
        .fold("views", Reducer::Sum)
        .fold("uniqueVisitors", Reducer::Sum)
        .fold("avgTimeOnPage", Reducer::OverwriteLast)
        .top_n(TopN::Unlimited);
    let page = |payload: serde_json::Value| {
        Factory::record()
            .with_type(EventType::UserEngagement)
            .with_payload(payload)
            .create()
    };
    let records = vec![
        page(json!({"path": "/a", "views": 15, "uniqueVisitors": 4, "avgTimeOnPage": 7.0})),
        page(json!({"path": "/a", "views": 15})),
        page(json!({"path": "/b", "uniqueVisitors": 9})),
    ];

    let result = aggregate_with(&records, &plan, &settings());
    let row = result.bucket(&["/a"]).unwrap();

    assert_eq!(result.total_groups, 1);
    assert_eq!(row.metrics.value("uniqueVisitors"), 4.0 + 10.0);
    assert_eq!(row.metrics.value("avgTimeOnPage"), 2.5);
}

#[test]
fn restricted_labels_map_unknown_and_missing_values_to_default() {
    let plan = RollupPlan::new("errors")
        .select(RecordSelector::Type(EventType::SystemHealth))
        .restrict_label("severity", &["high", "medium", "low"], "low")
        .group_by(Dimension::record_id("unknown"))
        .fold("severity", Reducer::Label)
        .top_n(TopN::Unlimited);
    let error = |id: &str, payload: serde_json::Value| {
        Factory::record()
            .with_id(id)
            .with_type(EventType::SystemHealth)
            .with_payload(payload)
            .create()
    };
    let records = vec![
        error("e1", json!({"severity": "high"})),
        error("e2", json!({"severity": "catastrophic"})),
        error("e3", json!({})),
    ];

    let result = aggregate_with(&records, &plan, &settings());

    assert_eq!(result.total_groups, 3);
    assert_eq!(result.bucket(&["e1"]).unwrap().metrics.label("severity"), Some("high"));
    assert_eq!(result.bucket(&["e2"]).unwrap().metrics.label("severity"), Some("low"));
    assert_eq!(result.bucket(&["e3"]).unwrap().metrics.label("severity"), Some("low"));
}

#[test]
fn empty_bucket_fields_are_filled_before_deriving() {
    let plan = RollupPlan::new("users")
        .select(RecordSelector::Type(EventType::UserEngagement))
        .fold("totalUsers", Reducer::Max)
        .fold("activeUsers", Reducer::Max)
        .fill_empty("activeUsers", FillValue::scaled("totalUsers", 0.7))
        .derive(DerivedMetric::ratio("activeShare", "activeUsers", "totalUsers"));
    let records = vec![
        Factory::record()
            .with_type(EventType::UserEngagement)
            .with_payload(json!({"totalUsers": 200}))
            .create(),
    ];

    let result = aggregate_with(&records, &plan, &settings());
    let row = &result.buckets[0];

    assert_eq!(row.metrics.value("activeUsers"), 140.0);
    assert_eq!(row.metrics.value("activeShare"), 70.0);
}
