use crate::engine::core::event::EventType;
use crate::test_helpers::factory::Factory;
use serde_json::json;

#[test]
fn test_record_factory() {
    let record = Factory::record()
        .with_id("r-42")
        .with_type(EventType::Revenue)
        .with_entity_type("Payment")
        .with_payload(json!({ "amount": 100 }))
        .create();

    assert_eq!(record.id, "r-42");
    assert_eq!(record.event_type, EventType::Revenue);
    assert!(record.has_entity_type("Payment"));
    assert_eq!(record.payload_field("amount"), Some(&json!(100)));
}

#[test]
fn test_record_factory_list_spaces_timestamps() {
    let records = Factory::record()
        .at(10)
        .create_list(vec![json!({"a": 1}), json!({"a": 2}), json!({"a": 3})]);

    assert_eq!(records.len(), 3);
    assert_eq!(
        (records[2].timestamp - records[0].timestamp).num_seconds(),
        2
    );
    assert_ne!(records[0].id, records[1].id);
}
