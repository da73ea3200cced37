use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::event_type::EventType;

/// One analytics row as returned by the event store. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default, alias = "data")]
    pub payload: Value,
    #[serde(default = "unix_epoch")]
    pub timestamp: DateTime<Utc>,
}

fn unix_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl RawEventRecord {
    /// Raw payload entry, if the payload is an object and carries `name`.
    #[inline]
    pub fn payload_field(&self, name: &str) -> Option<&Value> {
        self.payload.as_object().and_then(|obj| obj.get(name))
    }

    pub fn has_entity_type(&self, entity_type: &str) -> bool {
        self.entity_type.as_deref() == Some(entity_type)
    }
}
