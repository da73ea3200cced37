use crate::engine::core::event::EventType;
use crate::engine::errors::{FetchError, SnapshotError};
use crate::engine::source::query::{EventQuery, SortField, SortOrder};
use crate::engine::source::store::{EventStore, InMemoryEventStore};
use crate::test_helpers::factory::Factory;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn store() -> InMemoryEventStore {
    let mut records = Vec::new();
    for i in 0..5 {
        records.push(
            Factory::record()
                .with_id(&format!("rev-{i}"))
                .with_type(EventType::Revenue)
                .at(i * 10)
                .create(),
        );
    }
    records.push(
        Factory::record()
            .with_id("view-0")
            .with_type(EventType::ListingView)
            .with_entity_type("Property")
            .create(),
    );
    InMemoryEventStore::new(records)
}

#[tokio::test]
async fn filters_and_pages_results() {
    let store = store();
    let query = EventQuery::new(2).with_type(EventType::Revenue);

    let first = store.fetch(&query).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.data[0].id, "rev-0");
    assert!(first.has_more());

    let last = store.fetch(&query.clone().page(3)).await.unwrap();
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].id, "rev-4");
    assert!(!last.has_more());
}

#[tokio::test]
async fn sorts_descending_when_asked() {
    let store = store();
    let query = EventQuery::new(10)
        .with_type(EventType::Revenue)
        .sorted(SortField::Timestamp, SortOrder::Desc);

    let page = store.fetch(&query).await.unwrap();
    assert_eq!(page.data.first().unwrap().id, "rev-4");
    assert_eq!(page.data.last().unwrap().id, "rev-0");
}

#[tokio::test]
async fn rejects_invalid_paging() {
    let store = store();
    assert!(matches!(
        store.fetch(&EventQuery::new(10).page(0)).await,
        Err(FetchError::InvalidPage(0))
    ));
    assert!(matches!(
        store.fetch(&EventQuery::new(0)).await,
        Err(FetchError::InvalidPageSize)
    ));
}

#[test]
fn loads_snapshot_with_source_field_names() {
    let mut file = NamedTempFile::new().unwrap();
    let snapshot = json!([
        {"id": "1", "type": "REVENUE", "data": {"amount": 10}, "timestamp": "2026-09-01T00:00:00Z"},
        {"id": "2", "type": "NEW_KIND", "entityType": "Property", "payload": {}}
    ]);
    write!(file, "{snapshot}").unwrap();

    let store = InMemoryEventStore::from_json_file(file.path()).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn snapshot_errors_are_typed() {
    let missing = InMemoryEventStore::from_json_file(std::path::Path::new("/no/such/snapshot.json"));
    assert!(matches!(missing, Err(SnapshotError::Io { .. })));

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let broken = InMemoryEventStore::from_json_file(file.path());
    assert!(matches!(broken, Err(SnapshotError::Json(_))));
}
