use docshare_ot::{CausalCounters, Operation, OperationKind, UpdateMessage};
use serde_json::json;

#[test]
fn test_wire_fields() {
    let msg = UpdateMessage::new(Operation::new(3, 2, "hé"), CausalCounters::new(7, 4));
    let value = serde_json::to_value(&msg).unwrap();
    assert_eq!(
        value,
        json!({
            "offset": 3,
            "length": 2,
            "text": "hé",
            "local_operations_count": 7,
            "remote_operations_count": 4,
        })
    );
}

#[test]
fn test_kind_is_derived_on_receipt() {
    let value = json!({
        "offset": 0,
        "length": 4,
        "text": "",
        "local_operations_count": 1,
        "remote_operations_count": 0,
    });
    let msg: UpdateMessage = serde_json::from_value(value).unwrap();
    assert_eq!(msg.kind(), OperationKind::Deletion);
    assert_eq!(msg.counters(), CausalCounters::new(1, 0));
}

#[test]
fn test_empty_edit_survives_round_trip_as_insertion() {
    let msg = UpdateMessage::new(Operation::new(9, 0, ""), CausalCounters::new(0, 3));
    let encoded = serde_json::to_string(&msg).unwrap();
    let decoded: UpdateMessage = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, msg);
    assert_eq!(decoded.kind(), OperationKind::Insertion);
}

#[test]
fn test_missing_counter_is_rejected() {
    let value = json!({ "offset": 0, "length": 0, "text": "x", "local_operations_count": 0 });
    assert!(serde_json::from_value::<UpdateMessage>(value).is_err());
}
