use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    Dimension, RecordSelector, RollupPlan, ShareBasis, SummaryStat, TopN,
};

const OVERVIEW_ROWS: usize = 8;

/// event type, events; shares come out at 35/25/20/15/5
const SAMPLE_EVENT_TYPES: [(&str, u64); 5] = [
    ("LISTING_VIEW", 3_500),
    ("BOOKING_CONVERSION", 2_500),
    ("USER_ENGAGEMENT", 2_000),
    ("REVENUE", 1_500),
    ("AGENT_PERFORMANCE", 500),
];

/// entity type, events
const SAMPLE_ENTITY_TYPES: [(&str, u64); 5] = [
    ("Property", 4_000),
    ("User", 3_000),
    ("Agent", 1_500),
    ("Booking", 1_000),
    ("Unknown", 500),
];

fn sample_counts(rows: &[(&str, u64)]) -> FallbackDataset {
    rows.iter().fold(FallbackDataset::new(), |dataset, &(name, count)| {
        dataset.row(FallbackRow::keyed(&[name]).count(count))
    })
}

/// Event volume per event type.
pub fn event_types() -> RollupPlan {
    RollupPlan::new("event-types")
        .select(RecordSelector::All)
        .group_by(Dimension::event_type())
        .sort_by("count")
        .top_n(TopN::Limit(OVERVIEW_ROWS))
        .share(ShareBasis::Records)
        .summarize(SummaryStat::record_count("totalEvents"))
        .summarize(SummaryStat::bucket_count("eventTypes"))
        .fallback(sample_counts(&SAMPLE_EVENT_TYPES))
}

/// Event volume per entity type.
pub fn entity_types() -> RollupPlan {
    RollupPlan::new("entity-types")
        .select(RecordSelector::All)
        .group_by(Dimension::entity_type("Unknown"))
        .sort_by("count")
        .top_n(TopN::Limit(OVERVIEW_ROWS))
        .share(ShareBasis::Records)
        .summarize(SummaryStat::record_count("totalEvents"))
        .summarize(SummaryStat::bucket_count("entityTypes"))
        .fallback(sample_counts(&SAMPLE_ENTITY_TYPES))
}
