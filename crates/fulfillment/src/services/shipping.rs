//! Shipping service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::Order;

use crate::error::FulfillmentError;
use crate::events::{EventBus, FulfillmentEvent};

/// Trait for shipping operations.
///
/// `ship_order`, `track_shipment`, and `verify_delivery` are
/// request-plus-later-callback operations: the service acknowledges the
/// request and eventually raises the corresponding fulfillment event.
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Requests shipment of an order. Dispatch raises `OrderShipped`.
    async fn ship_order(&self, order: &Order) -> Result<(), FulfillmentError>;

    /// Requests tracking of a shipment. Customer receipt raises
    /// `OrderReceived`.
    async fn track_shipment(&self, order: &Order) -> Result<(), FulfillmentError>;

    /// Requests delivery verification. Confirmation raises
    /// `DeliveryVerified`.
    async fn verify_delivery(&self, order: &Order) -> Result<(), FulfillmentError>;

    /// Cancels a previously requested shipment.
    async fn cancel_shipment(&self, order: &Order) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryShippingState {
    shipments: HashMap<OrderId, String>,
    next_id: u32,
    fail_on_ship: bool,
    fail_on_track: bool,
    fail_on_verify: bool,
}

/// In-memory shipping service for testing.
///
/// Completes every request immediately by queueing the follow-up event on
/// the bus, standing in for the external carrier's asynchronous callbacks.
#[derive(Debug, Clone)]
pub struct InMemoryShippingService {
    bus: EventBus,
    state: Arc<RwLock<InMemoryShippingState>>,
}

impl InMemoryShippingService {
    /// Creates a new in-memory shipping service emitting events on `bus`.
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            state: Arc::new(RwLock::new(InMemoryShippingState::default())),
        }
    }

    /// Configures the service to fail on the next ship call.
    pub fn set_fail_on_ship(&self, fail: bool) {
        self.state.write().unwrap().fail_on_ship = fail;
    }

    /// Configures the service to fail on the next track call.
    pub fn set_fail_on_track(&self, fail: bool) {
        self.state.write().unwrap().fail_on_track = fail;
    }

    /// Configures the service to fail on the next verify call.
    pub fn set_fail_on_verify(&self, fail: bool) {
        self.state.write().unwrap().fail_on_verify = fail;
    }

    /// Returns the number of active shipments.
    pub fn shipment_count(&self) -> usize {
        self.state.read().unwrap().shipments.len()
    }

    /// Returns true if a shipment exists for the given order.
    pub fn has_shipment(&self, order_id: OrderId) -> bool {
        self.state.read().unwrap().shipments.contains_key(&order_id)
    }
}

#[async_trait]
impl ShippingService for InMemoryShippingService {
    async fn ship_order(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_ship {
            return Err(FulfillmentError::ShippingService(
                "Shipping unavailable".to_string(),
            ));
        }

        state.next_id += 1;
        let tracking_id = format!("TRACK-{:04}", state.next_id);
        state.shipments.insert(order.id(), tracking_id.clone());
        drop(state);

        self.bus.notify(FulfillmentEvent::OrderShipped {
            order_id: order.id(),
            tracking_id,
        });
        Ok(())
    }

    async fn track_shipment(&self, order: &Order) -> Result<(), FulfillmentError> {
        let state = self.state.read().unwrap();

        if state.fail_on_track {
            return Err(FulfillmentError::ShippingService(
                "Tracking unavailable".to_string(),
            ));
        }
        if !state.shipments.contains_key(&order.id()) {
            return Err(FulfillmentError::ShippingService(format!(
                "No shipment for order {}",
                order.id()
            )));
        }
        drop(state);

        self.bus.notify(FulfillmentEvent::OrderReceived {
            order_id: order.id(),
        });
        Ok(())
    }

    async fn verify_delivery(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_verify {
            return Err(FulfillmentError::ShippingService(
                "Verification unavailable".to_string(),
            ));
        }

        state.next_id += 1;
        let proof_of_delivery = format!("POD-{:04}", state.next_id);
        drop(state);

        self.bus.notify(FulfillmentEvent::DeliveryVerified {
            order_id: order.id(),
            proof_of_delivery,
        });
        Ok(())
    }

    async fn cancel_shipment(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        state.shipments.remove(&order.id());
        Ok(())
    }
}
