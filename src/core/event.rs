// Event envelope and the typed event sum.
//
// Purpose
// - `EventEnvelope` is the wire and storage format: `{"type": ..., "payload": {...}}`.
// - `OrderEvent` is what the rest of the crate dispatches on. Unrecognized types
//   decode to `Unknown` so that new event kinds never break an old consumer.
//
// Boundaries
// - Payloads must satisfy the same validation rules as the write side; an
//   envelope whose payload fails them is a decode error, not a panic.

use crate::core::order::{Order, OrderValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ORDER_CREATED: &str = "ORDER_CREATED";

#[derive(Debug, Error)]
pub enum EventDecodeError {
    #[error("payload does not deserialize into an order: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("payload failed order validation: {0}")]
    Invalid(#[from] OrderValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    pub fn order_created(order: &Order) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: ORDER_CREATED.to_string(),
            payload: serde_json::to_value(order)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderEvent {
    OrderCreated(Order),
    Unknown { event_type: String },
}

impl TryFrom<EventEnvelope> for OrderEvent {
    type Error = EventDecodeError;

    fn try_from(envelope: EventEnvelope) -> Result<Self, Self::Error> {
        match envelope.event_type.as_str() {
            ORDER_CREATED => {
                let order: Order = serde_json::from_value(envelope.payload)?;
                order.validate()?;
                Ok(OrderEvent::OrderCreated(order))
            }
            _ => Ok(OrderEvent::Unknown {
                event_type: envelope.event_type,
            }),
        }
    }
}

#[cfg(test)]
mod order_event_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_build_an_envelope_whose_payload_mirrors_the_order() {
        let order = Order::new("o1", "alice", vec!["pizza".to_string()]);
        let envelope = EventEnvelope::order_created(&order).unwrap();
        assert_eq!(envelope.event_type, ORDER_CREATED);
        assert_eq!(envelope.payload["id"], "o1");
        assert_eq!(envelope.payload["customer"], "alice");
        assert_eq!(envelope.payload["status"], "CREATED");
    }

    #[rstest]
    fn it_should_decode_an_order_created_envelope() {
        let order = Order::new("o1", "alice", vec!["pizza".to_string()]);
        let envelope = EventEnvelope::order_created(&order).unwrap();
        let event = OrderEvent::try_from(envelope).unwrap();
        assert_eq!(event, OrderEvent::OrderCreated(order));
    }

    #[rstest]
    fn it_should_decode_an_unrecognized_type_to_unknown() {
        let envelope = EventEnvelope {
            event_type: "ORDER_SHIPPED".to_string(),
            payload: serde_json::json!({}),
        };
        let event = OrderEvent::try_from(envelope).unwrap();
        assert_eq!(
            event,
            OrderEvent::Unknown {
                event_type: "ORDER_SHIPPED".to_string()
            }
        );
    }

    #[rstest]
    fn it_should_fail_to_decode_a_payload_missing_required_fields() {
        let envelope = EventEnvelope {
            event_type: ORDER_CREATED.to_string(),
            payload: serde_json::json!({"customer": "alice"}),
        };
        let result = OrderEvent::try_from(envelope);
        assert!(matches!(result, Err(EventDecodeError::Payload(_))));
    }

    #[rstest]
    fn it_should_fail_to_decode_a_payload_that_fails_validation() {
        let envelope = EventEnvelope {
            event_type: ORDER_CREATED.to_string(),
            payload: serde_json::json!({"id": "", "customer": "alice", "items": []}),
        };
        let result = OrderEvent::try_from(envelope);
        assert!(matches!(
            result,
            Err(EventDecodeError::Invalid(OrderValidationError::EmptyId))
        ));
    }

    #[rstest]
    fn it_should_round_trip_the_wire_format() {
        let json = r#"{"type":"ORDER_CREATED","payload":{"id":"o1","customer":"alice","items":["pizza"],"status":"CREATED"}}"#;
        let envelope: EventEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.event_type, ORDER_CREATED);
        let back = serde_json::to_value(&envelope).unwrap();
        assert_eq!(back["type"], "ORDER_CREATED");
    }
}
