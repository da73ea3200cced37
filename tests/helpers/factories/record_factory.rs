use crate::engine::core::event::{EventType, RawEventRecord};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// 2026-01-01T00:00:00Z
pub const BASE_SECONDS: i64 = 1_767_225_600;

pub struct RecordFactory {
    id: Option<String>,
    event_type: EventType,
    entity_type: Option<String>,
    entity_id: Option<String>,
    payload: Value,
    timestamp: DateTime<Utc>,
}

impl RecordFactory {
    pub fn new() -> Self {
        Self {
            id: None,
            event_type: EventType::ListingView,
            entity_type: None,
            entity_id: None,
            payload: json!({}),
            timestamp: DateTime::from_timestamp(BASE_SECONDS, 0).unwrap(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn with_entity_type(mut self, entity_type: &str) -> Self {
        self.entity_type = Some(entity_type.to_string());
        self
    }

    pub fn with_entity_id(mut self, entity_id: &str) -> Self {
        self.entity_id = Some(entity_id.to_string());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Seconds after [`BASE_SECONDS`].
    pub fn at(self, offset_secs: i64) -> Self {
        let ts = DateTime::from_timestamp(BASE_SECONDS + offset_secs, 0).unwrap();
        self.with_timestamp(ts)
    }

    pub fn create(self) -> RawEventRecord {
        let id = self
            .id
            .unwrap_or_else(|| format!("rec-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)));
        RawEventRecord {
            id,
            event_type: self.event_type,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            payload: self.payload,
            timestamp: self.timestamp,
        }
    }

    /// One record per payload, one second apart.
    pub fn create_list(self, payloads: Vec<Value>) -> Vec<RawEventRecord> {
        let start = self.timestamp;
        payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| RecordFactory {
                id: None,
                event_type: self.event_type,
                entity_type: self.entity_type.clone(),
                entity_id: self.entity_id.clone(),
                payload,
                timestamp: start + Duration::seconds(i as i64),
            }
            .create())
            .collect()
    }
}
