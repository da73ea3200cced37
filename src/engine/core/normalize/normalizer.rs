use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::trace;

use super::schema::RecordSchema;
use crate::engine::core::event::{EventType, RawEventRecord};
use crate::engine::types::FieldValue;

/// Sparse map of the payload fields that matched their declared kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFields {
    values: IndexMap<String, FieldValue>,
}

impl NormalizedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    #[inline]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(FieldValue::as_f64)
    }

    #[inline]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(FieldValue::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A record after schema validation, carrying only what the aggregator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: String,
    pub event_type: EventType,
    pub entity_type: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub fields: NormalizedFields,
}

/// Reads every field the schema declares out of the record payload.
///
/// Missing or mistyped values are left out of the result; unknown payload keys
/// are ignored. Never fails.
pub fn normalize(record: &RawEventRecord, schema: &RecordSchema) -> NormalizedRecord {
    let mut fields = NormalizedFields::new();
    for spec in schema.fields {
        let Some(raw) = record.payload_field(spec.name) else {
            continue;
        };
        match FieldValue::coerce(raw, spec.kind) {
            Some(value) => fields.insert(spec.name, value),
            None => trace!(
                target: "rollup::normalize",
                record = %record.id,
                field = spec.name,
                expected = %spec.kind,
                "dropping mistyped field"
            ),
        }
    }

    NormalizedRecord {
        id: record.id.clone(),
        event_type: record.event_type,
        entity_type: record.entity_type.clone(),
        timestamp: record.timestamp,
        fields,
    }
}

/// Normalizes with the schema owned by the record's own event type.
pub fn normalize_by_type(record: &RawEventRecord) -> NormalizedRecord {
    normalize(record, RecordSchema::for_event_type(record.event_type))
}
