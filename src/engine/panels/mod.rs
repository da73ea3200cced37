//! Dashboard panels: each one is a named [`RollupPlan`] plus the canned data
//! it shows when no live event matches.

pub mod agent;
pub mod engagement;
pub mod overview;
pub mod property;
pub mod revenue;
pub mod system;

use std::fmt;
use std::str::FromStr;

use crate::engine::core::rollup::RollupPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    AgentPerformance,
    AgencyRegions,
    PropertyAnalytics,
    PropertyTypes,
    PropertyStatuses,
    RevenueSources,
    RevenueSummary,
    RevenueByType,
    BookingConversion,
    UserEngagement,
    TopPages,
    SystemPerformance,
    SystemHealth,
    RecentErrors,
    EventTypes,
    EntityTypes,
}

impl Panel {
    pub const ALL: [Panel; 16] = [
        Panel::AgentPerformance,
        Panel::AgencyRegions,
        Panel::PropertyAnalytics,
        Panel::PropertyTypes,
        Panel::PropertyStatuses,
        Panel::RevenueSources,
        Panel::RevenueSummary,
        Panel::RevenueByType,
        Panel::BookingConversion,
        Panel::UserEngagement,
        Panel::TopPages,
        Panel::SystemPerformance,
        Panel::SystemHealth,
        Panel::RecentErrors,
        Panel::EventTypes,
        Panel::EntityTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::AgentPerformance => "agent-performance",
            Panel::AgencyRegions => "agency-regions",
            Panel::PropertyAnalytics => "property-analytics",
            Panel::PropertyTypes => "property-types",
            Panel::PropertyStatuses => "property-statuses",
            Panel::RevenueSources => "revenue-sources",
            Panel::RevenueSummary => "revenue-summary",
            Panel::RevenueByType => "revenue-by-type",
            Panel::BookingConversion => "booking-conversion",
            Panel::UserEngagement => "user-engagement",
            Panel::TopPages => "top-pages",
            Panel::SystemPerformance => "system-performance",
            Panel::SystemHealth => "system-health",
            Panel::RecentErrors => "recent-errors",
            Panel::EventTypes => "event-types",
            Panel::EntityTypes => "entity-types",
        }
    }

    /// Builds the panel's plan. The plan's name equals [`Panel::as_str`].
    pub fn plan(&self) -> RollupPlan {
        match self {
            Panel::AgentPerformance => agent::agent_performance(),
            Panel::AgencyRegions => agent::agency_regions(),
            Panel::PropertyAnalytics => property::property_analytics(),
            Panel::PropertyTypes => property::property_types(),
            Panel::PropertyStatuses => property::property_statuses(),
            Panel::RevenueSources => revenue::revenue_sources(),
            Panel::RevenueSummary => revenue::revenue_summary(),
            Panel::RevenueByType => revenue::revenue_by_type(),
            Panel::BookingConversion => revenue::booking_conversion(),
            Panel::UserEngagement => engagement::user_engagement(),
            Panel::TopPages => engagement::top_pages(),
            Panel::SystemPerformance => system::system_performance(),
            Panel::SystemHealth => system::system_health(),
            Panel::RecentErrors => system::recent_errors(),
            Panel::EventTypes => overview::event_types(),
            Panel::EntityTypes => overview::entity_types(),
        }
    }

    pub fn all_plans() -> Vec<RollupPlan> {
        Self::ALL.iter().map(Panel::plan).collect()
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown panel: {s}"))
    }
}
