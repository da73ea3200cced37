use crate::engine::core::event::EventType;
use crate::engine::types::FieldKind;

/// One expected payload field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn num(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Number,
    }
}

const fn text(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Text,
    }
}

/// Strict field set for one record shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn for_event_type(event_type: EventType) -> &'static RecordSchema {
        match event_type {
            EventType::ListingView => &LISTING_SCHEMA,
            EventType::BookingConversion => &BOOKING_SCHEMA,
            EventType::UserEngagement => &ENGAGEMENT_SCHEMA,
            EventType::Revenue => &REVENUE_SCHEMA,
            EventType::Performance => &PERFORMANCE_SCHEMA,
            EventType::AgentPerformance => &AGENT_SCHEMA,
            EventType::AgencyPerformance => &AGENCY_SCHEMA,
            EventType::SystemHealth => &SYSTEM_HEALTH_SCHEMA,
            EventType::MlPropertyScore => &PROPERTY_SCORE_SCHEMA,
            EventType::Other => &EMPTY_SCHEMA,
        }
    }
}

pub static LISTING_SCHEMA: RecordSchema = RecordSchema {
    name: "listing",
    fields: &[
        text("propertyType"),
        text("status"),
        num("views"),
        num("inquiries"),
        num("price"),
        num("daysOnMarket"),
    ],
};

pub static BOOKING_SCHEMA: RecordSchema = RecordSchema {
    name: "booking",
    fields: &[
        text("propertyId"),
        num("conversions"),
        num("views"),
        num("price"),
    ],
};

pub static ENGAGEMENT_SCHEMA: RecordSchema = RecordSchema {
    name: "engagement",
    fields: &[
        num("totalUsers"),
        num("activeUsers"),
        num("newUsers"),
        num("sessionDuration"),
        num("pageViews"),
        num("bounceRate"),
        text("path"),
        num("views"),
        num("uniqueVisitors"),
        num("avgTimeOnPage"),
    ],
};

pub static REVENUE_SCHEMA: RecordSchema = RecordSchema {
    name: "revenue",
    fields: &[
        num("totalRevenue"),
        num("monthlyRevenue"),
        num("amount"),
        text("source"),
        text("type"),
    ],
};

pub static PERFORMANCE_SCHEMA: RecordSchema = RecordSchema {
    name: "performance",
    fields: &[
        num("responseTime"),
        num("uptime"),
        num("errorRate"),
        num("cpuUsage"),
        num("memoryUsage"),
        num("activeConnections"),
        num("requestsPerMinute"),
    ],
};

pub static AGENT_SCHEMA: RecordSchema = RecordSchema {
    name: "agent",
    fields: &[
        text("agentId"),
        text("agentName"),
        num("propertiesListed"),
        num("propertiesSold"),
        num("totalRevenue"),
        num("responseTime"),
        num("rating"),
        num("activeListings"),
        num("completedDeals"),
        num("clientSatisfaction"),
    ],
};

pub static AGENCY_SCHEMA: RecordSchema = RecordSchema {
    name: "agency",
    fields: &[
        text("region"),
        num("agents"),
        num("revenue"),
        num("deals"),
        num("views"),
    ],
};

pub static SYSTEM_HEALTH_SCHEMA: RecordSchema = RecordSchema {
    name: "system_health",
    fields: &[
        text("component"),
        text("status"),
        text("message"),
        text("severity"),
        text("timestamp"),
        num("value"),
        num("threshold"),
    ],
};

pub static PROPERTY_SCORE_SCHEMA: RecordSchema = RecordSchema {
    name: "property_score",
    fields: &[text("propertyId"), num("score"), num("confidence")],
};

pub static EMPTY_SCHEMA: RecordSchema = RecordSchema {
    name: "empty",
    fields: &[],
};
