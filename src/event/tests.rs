use super::Event;

#[derive(Debug, Clone, PartialEq)]
struct OrderPlaced {
    order_id: u64,
    lines: Vec<String>,
}

#[test]
fn test_event_new_is_unaddressed() {
    let event = Event::new(OrderPlaced {
        order_id: 7,
        lines: vec!["widget".to_string()],
    });

    assert!(event.recipient().is_none());
    assert!(event.topic_channel().is_none());
    assert_eq!(event.timestamp_ms(), 0);
    assert!(!event.event_id().is_empty());
}

#[test]
fn test_event_payload_downcast() {
    let event = Event::new(OrderPlaced {
        order_id: 42,
        lines: vec![],
    });

    let payload = event.payload_as::<OrderPlaced>().unwrap();
    assert_eq!(payload.order_id, 42);
    assert!(event.payload_as::<String>().is_none());
}

#[test]
fn test_duplicate_is_value_independent() {
    let original = Event::new(OrderPlaced {
        order_id: 1,
        lines: vec!["a".to_string()],
    });

    let mut copy = original.duplicate();
    copy.payload_as_mut::<OrderPlaced>()
        .unwrap()
        .lines
        .push("b".to_string());

    assert_eq!(original.payload_as::<OrderPlaced>().unwrap().lines.len(), 1);
    assert_eq!(copy.payload_as::<OrderPlaced>().unwrap().lines.len(), 2);
}

#[test]
fn test_duplicate_gets_fresh_event_id() {
    let original = Event::new(OrderPlaced {
        order_id: 1,
        lines: vec![],
    });
    let copy = original.duplicate();

    assert_ne!(original.event_id(), copy.event_id());
    assert_eq!(
        original.payload_as::<OrderPlaced>(),
        copy.payload_as::<OrderPlaced>()
    );
}
