use crate::engine::core::event::EventType;
use crate::engine::core::normalize::schema::ENGAGEMENT_SCHEMA;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    DerivedMetric, Dimension, FieldRule, FillValue, RecordSelector, Reducer, RollupPlan,
    SummaryStat, TopN,
};

const USER_ENTITY: &str = "User";

/// User-entity records are read with the engagement field set whatever their type.
fn engagement_plan(name: &str) -> RollupPlan {
    RollupPlan::new(name)
        .select(RecordSelector::Entity(USER_ENTITY.to_string()))
        .select(RecordSelector::Type(EventType::UserEngagement))
        .with_schema(&ENGAGEMENT_SCHEMA)
}

/// Site-wide engagement totals. Empty active users, page views and bounce rate
/// are estimated from the user count.
pub fn user_engagement() -> RollupPlan {
    engagement_plan("user-engagement")
        .fold("totalUsers", Reducer::Max)
        .fold("activeUsers", Reducer::Max)
        .fold("bounceRate", Reducer::Max)
        .fold("newUsers", Reducer::Sum)
        .fold("pageViews", Reducer::Sum)
        .rule(
            FieldRule::new("sessionDuration", Reducer::Mean)
                .into_target("averageSessionDuration"),
        )
        .fill_empty("activeUsers", FillValue::scaled("totalUsers", 0.7))
        .fill_empty("pageViews", FillValue::scaled("totalUsers", 5.0))
        .fill_empty("bounceRate", FillValue::Constant(35.0))
        .derive(DerivedMetric::ratio("activeShare", "activeUsers", "totalUsers"))
        .derive(DerivedMetric::quotient("pagesPerUser", "pageViews", "totalUsers"))
        .fallback(
            FallbackDataset::new().row(
                FallbackRow::keyed(&[])
                    .count(1)
                    .field("totalUsers", 2_847.0)
                    .field("activeUsers", 2_156.0)
                    .field("newUsers", 234.0)
                    .field("averageSessionDuration", 8.5)
                    .field("pageViews", 45_678.0)
                    .field("bounceRate", 32.4),
            ),
        )
}

/// Most viewed pages. Records without both a path and a view count are skipped;
/// a record without unique visitors counts 70% of its views.
pub fn top_pages() -> RollupPlan {
    engagement_plan("top-pages")
        .require("path")
        .require("views")
        .fill_missing("uniqueVisitors", FillValue::scaled("views", 0.7))
        .fill_missing("avgTimeOnPage", FillValue::Constant(2.5))
        .group_by(Dimension::field("path", "/"))
        .fold("views", Reducer::Sum)
        .fold("uniqueVisitors", Reducer::Sum)
        .fold("avgTimeOnPage", Reducer::OverwriteLast)
        .derive(DerivedMetric::ratio("uniqueShare", "uniqueVisitors", "views"))
        .sort_by("views")
        .top_n(TopN::Configured)
        .summarize(SummaryStat::sum("totalPageViews", "views"))
        .fallback(
            FallbackDataset::new()
                .row(page_row("/", 12_500.0, 8_900.0, 3.2))
                .row(page_row("/properties", 8_900.0, 7_200.0, 5.8))
                .row(page_row("/property/details", 7_200.0, 6_500.0, 4.5))
                .row(page_row("/contact", 5_400.0, 4_800.0, 2.1))
                .row(page_row("/about", 3_200.0, 2_900.0, 1.8)),
        )
}

fn page_row(path: &str, views: f64, unique: f64, time_on_page: f64) -> FallbackRow {
    FallbackRow::keyed(&[path])
        .count(1)
        .field("views", views)
        .field("uniqueVisitors", unique)
        .field("avgTimeOnPage", time_on_page)
}
