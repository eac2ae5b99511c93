//! Fulfillment callback events and the in-memory event bus.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use common::OrderId;
use domain::Address;
use serde::{Deserialize, Serialize};

/// Callback events raised by the external fulfillment services.
///
/// Each carries the order identity and payload explicitly, so handlers never
/// rely on closure capture across asynchronous boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FulfillmentEvent {
    /// Inventory confirmed stock and assigned a pickup address.
    OrderFilled {
        order_id: OrderId,
        pickup_address: Address,
    },

    /// The shipping service confirmed dispatch.
    OrderShipped {
        order_id: OrderId,
        tracking_id: String,
    },

    /// The shipping service confirmed receipt by the customer.
    OrderReceived { order_id: OrderId },

    /// The shipping service confirmed proof of delivery.
    DeliveryVerified {
        order_id: OrderId,
        proof_of_delivery: String,
    },
}

impl FulfillmentEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            FulfillmentEvent::OrderFilled { .. } => "OrderFilled",
            FulfillmentEvent::OrderShipped { .. } => "OrderShipped",
            FulfillmentEvent::OrderReceived { .. } => "OrderReceived",
            FulfillmentEvent::DeliveryVerified { .. } => "DeliveryVerified",
        }
    }

    /// Returns the order this event refers to.
    pub fn order_id(&self) -> OrderId {
        match self {
            FulfillmentEvent::OrderFilled { order_id, .. }
            | FulfillmentEvent::OrderShipped { order_id, .. }
            | FulfillmentEvent::OrderReceived { order_id }
            | FulfillmentEvent::DeliveryVerified { order_id, .. } => *order_id,
        }
    }
}

/// In-memory event bus.
///
/// Service callbacks are queued in arrival order and drained by the
/// orchestrator. Cloning yields a handle to the same queue.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    queue: Arc<Mutex<VecDeque<FulfillmentEvent>>>,
}

impl EventBus {
    /// Creates a new empty event bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event for delivery.
    pub fn notify(&self, event: FulfillmentEvent) {
        tracing::debug!(
            event = event.event_type(),
            order_id = %event.order_id(),
            "event queued"
        );
        self.queue.lock().unwrap().push_back(event);
    }

    /// Removes and returns the oldest queued event, if any.
    pub fn try_next(&self) -> Option<FulfillmentEvent> {
        self.queue.lock().unwrap().pop_front()
    }

    /// Returns the number of queued events.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Returns true if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}
