use crate::engine::core::normalize::schema::LISTING_SCHEMA;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    DerivedMetric, Dimension, FieldRule, RecordSelector, Reducer, RollupPlan, ShareBasis,
    SummaryStat, TopN,
};

const PROPERTY_ENTITY: &str = "Property";

fn listing_plan(name: &str) -> RollupPlan {
    RollupPlan::new(name)
        .select(RecordSelector::Entity(PROPERTY_ENTITY.to_string()))
        .with_schema(&LISTING_SCHEMA)
}

/// Property listings grouped by type and status.
///
/// `averagePrice` keeps the pairwise-average fold and `meanPrice` is the true mean.
/// The midpoint of `priceRange` is reported as `priceRange.median`.
pub fn property_analytics() -> RollupPlan {
    listing_plan("property-analytics")
        .group_by(Dimension::field("propertyType", "Residential"))
        .group_by(Dimension::field("status", "Available"))
        .fold("views", Reducer::Sum)
        .fold("inquiries", Reducer::Sum)
        .rule(FieldRule::new("price", Reducer::PairwiseAverage).into_target("averagePrice"))
        .rule(FieldRule::new("price", Reducer::Mean).into_target("meanPrice"))
        .rule(FieldRule::new("price", Reducer::Range).into_target("priceRange"))
        .rule(
            FieldRule::new("daysOnMarket", Reducer::PairwiseAverage)
                .into_target("averageDaysOnMarket"),
        )
        .derive(DerivedMetric::ratio("conversionRate", "inquiries", "views"))
        .derive(DerivedMetric::midpoint("priceRange.median", "priceRange"))
        .sort_by("views")
        .top_n(TopN::Unlimited)
        .share(ShareBasis::Records)
        .summarize(SummaryStat::record_count("totalProperties"))
        .summarize(SummaryStat::sum("totalViews", "views"))
        .summarize(SummaryStat::sum("totalInquiries", "inquiries"))
        .summarize(SummaryStat::ratio("averageConversionRate", "inquiries", "views"))
        .fallback(
            FallbackDataset::new()
                .row(listing_row(&["Residential", "Available"], 98, 8_500.0, 650.0, 425_000.0))
                .row(listing_row(&["Commercial", "Available"], 35, 2_800.0, 180.0, 780_000.0))
                .row(listing_row(&["Vacation", "Available"], 23, 1_150.0, 62.0, 310_000.0))
                .total("activeListings", 89.0)
                .total("averagePrice", 425_000.0),
        )
}

fn listing_row(dimensions: &[&str], count: u64, views: f64, inquiries: f64, price: f64) -> FallbackRow {
    FallbackRow::keyed(dimensions)
        .count(count)
        .field("views", views)
        .field("inquiries", inquiries)
        .field("averagePrice", price)
        .field("meanPrice", price)
        .field("priceRange.min", price)
        .field("priceRange.max", price)
}

/// Listing counts per property type, with estimated revenue per type.
pub fn property_types() -> RollupPlan {
    listing_plan("property-types")
        .group_by(Dimension::field("propertyType", "Residential"))
        .fold("views", Reducer::Sum)
        .fold("inquiries", Reducer::Sum)
        .rule(FieldRule::new("price", Reducer::PairwiseAverage).into_target("averagePrice"))
        .derive(DerivedMetric::ratio("conversionRate", "inquiries", "views"))
        .derive(DerivedMetric::product("revenue", "averagePrice", "count"))
        .sort_by("count")
        .top_n(TopN::Configured)
        .share(ShareBasis::Records)
        .summarize(SummaryStat::record_count("totalProperties"))
        .fallback(
            FallbackDataset::new()
                .row(listing_row(&["Residential"], 98, 8_500.0, 650.0, 425_000.0))
                .row(listing_row(&["Commercial"], 35, 2_800.0, 180.0, 780_000.0))
                .row(listing_row(&["Vacation"], 23, 1_150.0, 62.0, 310_000.0)),
        )
}

/// Listing counts per status.
pub fn property_statuses() -> RollupPlan {
    listing_plan("property-statuses")
        .group_by(Dimension::field("status", "Available"))
        .fold("views", Reducer::Sum)
        .sort_by("count")
        .top_n(TopN::Unlimited)
        .share(ShareBasis::Records)
        .summarize(SummaryStat::record_count("totalProperties"))
        .fallback(
            FallbackDataset::new()
                .row(FallbackRow::keyed(&["Active"]).count(89))
                .row(FallbackRow::keyed(&["Pending"]).count(34))
                .row(FallbackRow::keyed(&["Sold"]).count(33)),
        )
}
