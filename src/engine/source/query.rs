use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::core::event::{EventType, RawEventRecord};
use crate::engine::core::rollup::RecordSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    Timestamp,
    Id,
}

/// Inclusive time bounds of a fetch. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// The last `days` days up to `now`; `days <= 0` means unbounded.
    pub fn trailing_days(now: DateTime<Utc>, days: i64) -> Self {
        if days <= 0 {
            return Self::unbounded();
        }
        Self {
            from: Some(now - Duration::days(days)),
            to: Some(now),
        }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }
}

/// One page request against the event store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_to: Option<DateTime<Utc>>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl EventQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            event_type: None,
            entity_type: None,
            timestamp_from: None,
            timestamp_to: None,
            sort_by: SortField::Timestamp,
            sort_order: SortOrder::Asc,
            page: 1,
            page_size,
        }
    }

    /// Query fetching the records a plan selector consumes.
    pub fn for_selector(selector: &RecordSelector, window: TimeWindow, page_size: usize) -> Self {
        let query = Self::new(page_size).within(window);
        match selector {
            RecordSelector::All => query,
            RecordSelector::Type(t) => query.with_type(*t),
            RecordSelector::Entity(e) => query.with_entity_type(e),
        }
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn with_entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    pub fn within(mut self, window: TimeWindow) -> Self {
        self.timestamp_from = window.from;
        self.timestamp_to = window.to;
        self
    }

    pub fn sorted(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow {
            from: self.timestamp_from,
            to: self.timestamp_to,
        }
    }

    /// Filter part of the query: type, entity type and time bounds.
    pub fn matches(&self, record: &RawEventRecord) -> bool {
        self.event_type.is_none_or(|t| record.event_type == t)
            && self
                .entity_type
                .as_deref()
                .is_none_or(|e| record.has_entity_type(e))
            && self.window().contains(record.timestamp)
    }
}

/// One page of matching records plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub data: Vec<RawEventRecord>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl EventPage {
    pub fn has_more(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }
}
