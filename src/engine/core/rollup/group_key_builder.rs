use super::group_key::GroupKey;
use super::plan::{Dimension, DimensionSource};
use crate::engine::core::normalize::NormalizedRecord;
use crate::engine::types::KEY_SEPARATOR;

/// Derives the group key of a normalized record from the configured dimensions.
#[derive(Debug, Clone)]
pub struct GroupKeyBuilder {
    dimensions: Vec<Dimension>,
}

impl GroupKeyBuilder {
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Dimension values in declaration order, defaults substituted for missing ones.
    pub fn values(&self, record: &NormalizedRecord) -> Vec<String> {
        self.dimensions
            .iter()
            .map(|d| {
                let found = match &d.source {
                    DimensionSource::Field(field) => record.fields.text(field),
                    DimensionSource::EntityType => record.entity_type.as_deref(),
                    DimensionSource::EventType => Some(record.event_type.as_str()),
                    DimensionSource::RecordId => Some(record.id.as_str()),
                };
                found
                    .filter(|v| !v.is_empty() && !v.contains(KEY_SEPARATOR))
                    .unwrap_or(d.default.as_str())
                    .to_string()
            })
            .collect()
    }

    #[inline]
    pub fn build(&self, record: &NormalizedRecord) -> (GroupKey, Vec<String>) {
        let values = self.values(record);
        (GroupKey::from_parts(&values), values)
    }
}
