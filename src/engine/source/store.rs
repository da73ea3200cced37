use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::query::{EventPage, EventQuery, SortField, SortOrder};
use crate::engine::core::event::RawEventRecord;
use crate::engine::errors::{FetchError, SnapshotError};

/// Paged read access to stored analytics events.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn fetch(&self, query: &EventQuery) -> Result<EventPage, FetchError>;
}

/// Event store over a fixed record set, used by the CLI and in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    records: Vec<RawEventRecord>,
}

impl InMemoryEventStore {
    pub fn new(records: Vec<RawEventRecord>) -> Self {
        Self { records }
    }

    /// Loads a JSON array of raw records.
    pub fn from_json_file(path: &Path) -> Result<Self, SnapshotError> {
        let text = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<RawEventRecord> = serde_json::from_str(&text)?;
        debug!(
            target: "rollup::source",
            path = %path.display(),
            records = records.len(),
            "loaded snapshot"
        );
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn compare(query: &EventQuery, a: &RawEventRecord, b: &RawEventRecord) -> Ordering {
        let ord = match query.sort_by {
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::Id => a.id.cmp(&b.id),
        };
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn fetch(&self, query: &EventQuery) -> Result<EventPage, FetchError> {
        if query.page == 0 {
            return Err(FetchError::InvalidPage(query.page));
        }
        if query.page_size == 0 {
            return Err(FetchError::InvalidPageSize);
        }

        let mut matched: Vec<&RawEventRecord> =
            self.records.iter().filter(|r| query.matches(r)).collect();
        matched.sort_by(|a, b| Self::compare(query, a, b));

        let total = matched.len();
        let data = matched
            .into_iter()
            .skip((query.page - 1).saturating_mul(query.page_size))
            .take(query.page_size)
            .cloned()
            .collect();

        Ok(EventPage {
            data,
            total,
            page: query.page,
            page_size: query.page_size,
        })
    }
}
