use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of analytics event kinds emitted by the event store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ListingView,
    BookingConversion,
    UserEngagement,
    Revenue,
    Performance,
    AgentPerformance,
    AgencyPerformance,
    SystemHealth,
    MlPropertyScore,
    /// Any type string this build does not know about.
    #[serde(other)]
    Other,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::ListingView,
        EventType::BookingConversion,
        EventType::UserEngagement,
        EventType::Revenue,
        EventType::Performance,
        EventType::AgentPerformance,
        EventType::AgencyPerformance,
        EventType::SystemHealth,
        EventType::MlPropertyScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::ListingView => "LISTING_VIEW",
            EventType::BookingConversion => "BOOKING_CONVERSION",
            EventType::UserEngagement => "USER_ENGAGEMENT",
            EventType::Revenue => "REVENUE",
            EventType::Performance => "PERFORMANCE",
            EventType::AgentPerformance => "AGENT_PERFORMANCE",
            EventType::AgencyPerformance => "AGENCY_PERFORMANCE",
            EventType::SystemHealth => "SYSTEM_HEALTH",
            EventType::MlPropertyScore => "ML_PROPERTY_SCORE",
            EventType::Other => "OTHER",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or(())
    }
}
