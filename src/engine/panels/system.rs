use crate::engine::core::event::EventType;
use crate::engine::core::rollup::fallback::{FallbackDataset, FallbackRow};
use crate::engine::core::rollup::{
    DerivedMetric, Dimension, FieldRule, RecordOrder, RecordSelector, Reducer, RollupPlan,
    SummaryStat, TopN,
};

/// metric, baseline shown until a sample reports it
const PERFORMANCE_BASELINE: [(&str, f64); 7] = [
    ("responseTime", 245.0),
    ("uptime", 99.8),
    ("errorRate", 0.2),
    ("cpuUsage", 45.0),
    ("memoryUsage", 62.0),
    ("activeConnections", 1_250.0),
    ("requestsPerMinute", 890.0),
];

/// Latest platform performance sample, one global row.
pub fn system_performance() -> RollupPlan {
    let plan = RollupPlan::new("system-performance")
        .select(RecordSelector::Type(EventType::Performance))
        .order(RecordOrder::Timestamp);
    PERFORMANCE_BASELINE
        .iter()
        .fold(plan, |plan, &(metric, baseline)| {
            plan.rule(FieldRule::new(metric, Reducer::OverwriteLast).starting_at(baseline))
        })
}

const HEALTH_STATUSES: [&str; 3] = ["healthy", "warning", "critical"];
const ERROR_SEVERITIES: [&str; 3] = ["high", "medium", "low"];

/// Latest reading per component. Only complete readings count; an unknown
/// status reads as `healthy`.
pub fn system_health() -> RollupPlan {
    RollupPlan::new("system-health")
        .select(RecordSelector::Type(EventType::SystemHealth))
        .require("component")
        .require("status")
        .require("value")
        .require("threshold")
        .restrict_label("status", &HEALTH_STATUSES, "healthy")
        .order(RecordOrder::Timestamp)
        .group_by(Dimension::field("component", "Unknown"))
        .fold("value", Reducer::OverwriteLast)
        .fold("threshold", Reducer::OverwriteLast)
        .fold("status", Reducer::LabelLast)
        .derive(DerivedMetric::ratio("thresholdUsage", "value", "threshold"))
        .top_n(TopN::Unlimited)
        .summarize(SummaryStat::bucket_count("components"))
        .summarize(SummaryStat::mean("averageValue", "value"))
        .fallback(
            FallbackDataset::new()
                .row(component_row("Web Server", "healthy", 95.0, 90.0))
                .row(component_row("Database", "healthy", 88.0, 85.0))
                .row(component_row("Cache", "warning", 82.0, 80.0))
                .row(component_row("API Gateway", "healthy", 92.0, 90.0))
                .row(component_row("File Storage", "healthy", 96.0, 90.0))
                .row(component_row("Load Balancer", "critical", 75.0, 80.0)),
        )
}

fn component_row(component: &str, status: &str, value: f64, threshold: f64) -> FallbackRow {
    FallbackRow::keyed(&[component])
        .count(1)
        .label("status", status)
        .field("value", value)
        .field("threshold", threshold)
}

/// Reported errors in chronological order, one row per record. An unknown
/// severity reads as `low`.
pub fn recent_errors() -> RollupPlan {
    RollupPlan::new("recent-errors")
        .select(RecordSelector::Type(EventType::SystemHealth))
        .require("timestamp")
        .require("message")
        .require("severity")
        .require("component")
        .restrict_label("severity", &ERROR_SEVERITIES, "low")
        .order(RecordOrder::Timestamp)
        .group_by(Dimension::record_id("unknown"))
        .fold("timestamp", Reducer::Label)
        .fold("component", Reducer::Label)
        .fold("message", Reducer::Label)
        .fold("severity", Reducer::Label)
        .top_n(TopN::Unlimited)
        .summarize(SummaryStat::bucket_count("errors"))
        .fallback(
            FallbackDataset::new()
                .id_prefix("error")
                .row(error_row("Database", "Database connection timeout", "low"))
                .row(error_row("API Gateway", "API rate limit exceeded", "medium"))
                .row(error_row("Application Server", "Memory allocation failed", "high"))
                .row(error_row("Redis Cache", "Cache miss rate increased", "low")),
        )
}

fn error_row(component: &str, message: &str, severity: &str) -> FallbackRow {
    FallbackRow::generated()
        .count(1)
        .label("component", component)
        .label("message", message)
        .label("severity", severity)
}
