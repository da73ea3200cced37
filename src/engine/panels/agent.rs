use crate::engine::core::event::EventType;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    DerivedMetric, Dimension, RecordSelector, Reducer, RollupPlan, SummaryStat, TopN,
};

/// Per-agent totals ranked by revenue.
pub fn agent_performance() -> RollupPlan {
    RollupPlan::new("agent-performance")
        .select(RecordSelector::Type(EventType::AgentPerformance))
        .group_by(Dimension::field("agentId", "Unknown Agent"))
        .fold("agentName", Reducer::Label)
        .fold("propertiesListed", Reducer::Sum)
        .fold("propertiesSold", Reducer::Sum)
        .fold("totalRevenue", Reducer::Sum)
        .fold("responseTime", Reducer::OverwriteLast)
        .fold("rating", Reducer::OverwriteLast)
        .fold("activeListings", Reducer::OverwriteLast)
        .fold("completedDeals", Reducer::OverwriteLast)
        .fold("clientSatisfaction", Reducer::OverwriteLast)
        .derive(DerivedMetric::ratio(
            "conversionRate",
            "propertiesSold",
            "propertiesListed",
        ))
        .derive(DerivedMetric::quotient(
            "averagePropertyValue",
            "totalRevenue",
            "propertiesSold",
        ))
        .sort_by("totalRevenue")
        .top_n(TopN::Configured)
        .summarize(SummaryStat::bucket_count("totalAgents"))
        .summarize(SummaryStat::count_where("activeAgents", "activeListings"))
        .summarize(SummaryStat::sum("totalRevenue", "totalRevenue"))
        .summarize(SummaryStat::mean("averageResponseTime", "responseTime"))
        .summarize(SummaryStat::mean("averageConversionRate", "conversionRate"))
        .fallback(agent_fallback())
}

/// name, listed, sold, revenue, response time, rating, active listings, satisfaction
const SAMPLE_AGENTS: [(&str, f64, f64, f64, f64, f64, f64, f64); 5] = [
    ("Sarah Johnson", 45.0, 12.0, 2_850_000.0, 2.3, 4.8, 33.0, 95.0),
    ("Michael Chen", 38.0, 10.0, 2_200_000.0, 3.1, 4.6, 28.0, 92.0),
    ("Emily Rodriguez", 42.0, 9.0, 1_950_000.0, 2.8, 4.7, 33.0, 89.0),
    ("David Thompson", 35.0, 8.0, 1_800_000.0, 3.5, 4.5, 27.0, 87.0),
    ("Lisa Wang", 31.0, 7.0, 1_650_000.0, 2.9, 4.4, 24.0, 85.0),
];

fn agent_fallback() -> FallbackDataset {
    let dataset = SAMPLE_AGENTS.iter().fold(
        FallbackDataset::new().id_prefix("agent"),
        |dataset, &(name, listed, sold, revenue, response, rating, active, satisfaction)| {
            dataset.row(
                FallbackRow::generated()
                    .count(1)
                    .label("agentName", name)
                    .field("propertiesListed", listed)
                    .field("propertiesSold", sold)
                    .field("totalRevenue", revenue)
                    .field("responseTime", response)
                    .field("rating", rating)
                    .field("activeListings", active)
                    .field("completedDeals", sold)
                    .field("clientSatisfaction", satisfaction),
            )
        },
    );
    dataset
        .total("totalAgents", 24.0)
        .total("activeAgents", 18.0)
        .total("averageResponseTime", 2.9)
        .total("averageConversionRate", 23.2)
}

/// Regional agency totals ranked by revenue.
pub fn agency_regions() -> RollupPlan {
    RollupPlan::new("agency-regions")
        .select(RecordSelector::Type(EventType::AgencyPerformance))
        .group_by(Dimension::field("region", "Unknown Region"))
        .fold("agents", Reducer::Sum)
        .fold("revenue", Reducer::Sum)
        .fold("deals", Reducer::Sum)
        .fold("views", Reducer::Sum)
        .derive(DerivedMetric::ratio("conversionRate", "deals", "views"))
        .sort_by("revenue")
        .top_n(TopN::Unlimited)
        .summarize(SummaryStat::bucket_count("regions"))
        .summarize(SummaryStat::sum("totalAgents", "agents"))
        .summarize(SummaryStat::sum("totalRevenue", "revenue"))
        .summarize(SummaryStat::ratio("conversionRate", "deals", "views"))
        .fallback(
            FallbackDataset::new()
                .row(region_row("North", 8.0, 4_200_000.0, 258.0))
                .row(region_row("South", 6.0, 2_800_000.0, 224.0))
                .row(region_row("East", 5.0, 2_200_000.0, 211.0))
                .row(region_row("West", 5.0, 1_250_000.0, 198.0)),
        )
}

fn region_row(region: &str, agents: f64, revenue: f64, deals: f64) -> FallbackRow {
    FallbackRow::keyed(&[region])
        .count(1)
        .field("agents", agents)
        .field("revenue", revenue)
        .field("deals", deals)
        .field("views", 1_000.0)
}
