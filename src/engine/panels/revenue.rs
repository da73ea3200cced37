use crate::engine::core::event::EventType;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    DerivedMetric, Dimension, FieldRule, FillValue, RecordSelector, Reducer, RollupPlan,
    ShareBasis, SummaryStat, TopN,
};

fn revenue_plan(name: &str) -> RollupPlan {
    RollupPlan::new(name).select(RecordSelector::Type(EventType::Revenue))
}

/// Revenue split by source, with each source's share of the total amount.
/// Only records carrying both a source and an amount count.
pub fn revenue_sources() -> RollupPlan {
    revenue_plan("revenue-sources")
        .require("source")
        .require("amount")
        .group_by(Dimension::field("source", "Other"))
        .fold("amount", Reducer::Sum)
        .rule(FieldRule::new("amount", Reducer::Count).into_target("transactions"))
        .derive(DerivedMetric::quotient(
            "averageTransactionValue",
            "amount",
            "transactions",
        ))
        .sort_by("amount")
        .top_n(TopN::Configured)
        .share(ShareBasis::Field("amount".to_string()))
        .summarize(SummaryStat::sum("totalRevenue", "amount"))
        .summarize(SummaryStat::sum("transactions", "transactions"))
        .fallback(
            FallbackDataset::new()
                .row(source_row("Property Rentals", 75_000.0, 30.0))
                .row(source_row("Booking Fees", 25_000.0, 10.0))
                .row(source_row("Service Charges", 15_000.0, 6.0))
                .row(source_row("Insurance", 7_500.0, 3.0))
                .row(source_row("Other", 2_500.0, 1.0)),
        )
}

/// Headline revenue figures over every revenue record.
///
/// Cumulative `totalRevenue` / `monthlyRevenue` reports are kept as maxima,
/// never summed. An empty monthly figure shows the summed amounts instead.
pub fn revenue_summary() -> RollupPlan {
    revenue_plan("revenue-summary")
        .fold("amount", Reducer::Sum)
        .rule(FieldRule::new("amount", Reducer::Count).into_target("transactions"))
        .rule(FieldRule::new("totalRevenue", Reducer::Max).into_target("reportedTotalRevenue"))
        .fold("monthlyRevenue", Reducer::Max)
        .fill_empty("monthlyRevenue", FillValue::Field("amount".to_string()))
        .derive(DerivedMetric::quotient(
            "averageTransactionValue",
            "amount",
            "transactions",
        ))
        .summarize(SummaryStat::sum("totalRevenue", "amount"))
        .summarize(SummaryStat::max("reportedTotalRevenue", "reportedTotalRevenue"))
        .summarize(SummaryStat::max("monthlyRevenue", "monthlyRevenue"))
        .summarize(SummaryStat::sum("transactions", "transactions"))
        .summarize(SummaryStat::quotient(
            "averageTransactionValue",
            "amount",
            "transactions",
        ))
        .fallback(
            FallbackDataset::new().row(
                FallbackRow::keyed(&[])
                    .count(50)
                    .field("amount", 125_000.0)
                    .field("transactions", 50.0)
                    .field("reportedTotalRevenue", 125_000.0)
                    .field("monthlyRevenue", 45_000.0),
            ),
        )
}

fn source_row(source: &str, amount: f64, transactions: f64) -> FallbackRow {
    FallbackRow::keyed(&[source])
        .count(transactions as u64)
        .field("amount", amount)
        .field("transactions", transactions)
}

/// Revenue per property type. Only records carrying both a type and an amount count.
pub fn revenue_by_type() -> RollupPlan {
    revenue_plan("revenue-by-type")
        .require("type")
        .require("amount")
        .group_by(Dimension::field("type", "Unknown"))
        .fold("amount", Reducer::Sum)
        .derive(DerivedMetric::quotient("averageAmount", "amount", "count"))
        .sort_by("amount")
        .top_n(TopN::Unlimited)
        .share(ShareBasis::Field("amount".to_string()))
        .summarize(SummaryStat::sum("totalRevenue", "amount"))
        .summarize(SummaryStat::record_count("transactions"))
        .fallback(
            FallbackDataset::new()
                .row(FallbackRow::keyed(&["Residential"]).count(32).field("amount", 80_000.0))
                .row(FallbackRow::keyed(&["Commercial"]).count(12).field("amount", 30_000.0))
                .row(FallbackRow::keyed(&["Vacation"]).count(8).field("amount", 15_000.0)),
        )
}

/// Booking conversion across all properties.
pub fn booking_conversion() -> RollupPlan {
    RollupPlan::new("booking-conversion")
        .select(RecordSelector::Type(EventType::BookingConversion))
        .fold("conversions", Reducer::Sum)
        .fold("views", Reducer::Sum)
        .rule(FieldRule::new("price", Reducer::Sum).into_target("totalPropertyValue"))
        .rule(FieldRule::new("price", Reducer::Count).into_target("pricedBookings"))
        .derive(DerivedMetric::ratio("conversionRate", "conversions", "views"))
        .derive(DerivedMetric::quotient(
            "averagePropertyValue",
            "totalPropertyValue",
            "pricedBookings",
        ))
        .summarize(SummaryStat::ratio("conversionRate", "conversions", "views"))
        .summarize(SummaryStat::quotient(
            "averagePropertyValue",
            "totalPropertyValue",
            "pricedBookings",
        ))
        .fallback(
            FallbackDataset::new().row(
                FallbackRow::keyed(&[])
                    .count(10)
                    .field("conversions", 85.0)
                    .field("views", 1_000.0)
                    .field("totalPropertyValue", 3_500_000.0)
                    .field("pricedBookings", 10.0),
            ),
        )
}
