use crate::engine::core::event::EventType;
use crate::engine::core::rollup::fallback::FallbackDataset;
use crate::engine::core::rollup::{
    Dimension, RecordSelector, Reducer, RollupPlan, SummaryStat, TopN,
};

/// Small listing-view plan: grouped by `propertyType`, summing `views`.
pub struct PlanFactory {
    plan: RollupPlan,
}

impl PlanFactory {
    pub fn new() -> Self {
        Self {
            plan: RollupPlan::new("test-plan")
                .select(RecordSelector::Type(EventType::ListingView))
                .group_by(Dimension::field("propertyType", "Residential"))
                .fold("views", Reducer::Sum)
                .sort_by("views")
                .top_n(TopN::Unlimited)
                .summarize(SummaryStat::record_count("records")),
        }
    }

    pub fn with(mut self, f: impl FnOnce(RollupPlan) -> RollupPlan) -> Self {
        self.plan = f(self.plan);
        self
    }

    pub fn with_top_n(self, top_n: TopN) -> Self {
        self.with(|p| p.top_n(top_n))
    }

    pub fn with_fallback(self, dataset: FallbackDataset) -> Self {
        self.with(|p| p.fallback(dataset))
    }

    pub fn create(self) -> RollupPlan {
        self.plan
    }
}
