//! Inventory service trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::{Address, Order};

use crate::error::FulfillmentError;
use crate::events::{EventBus, FulfillmentEvent};

/// Trait for inventory operations.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Requests fulfillment of an order's items. Stock confirmation raises
    /// `OrderFilled` with the assigned pickup address.
    async fn fill_order(&self, order: &Order) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    filled: Vec<OrderId>,
    fail_on_fill: bool,
}

/// In-memory inventory service for testing.
#[derive(Debug, Clone)]
pub struct InMemoryInventoryService {
    bus: EventBus,
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryService {
    /// Creates a new in-memory inventory service emitting events on `bus`.
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            state: Arc::new(RwLock::new(InMemoryInventoryState::default())),
        }
    }

    /// Configures the service to fail on the next fill call.
    pub fn set_fail_on_fill(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fill = fail;
    }

    /// Returns the number of filled orders.
    pub fn fill_count(&self) -> usize {
        self.state.read().unwrap().filled.len()
    }

    /// The pickup address assigned to filled orders.
    pub fn warehouse_address() -> Address {
        Address::new("1 Warehouse Way", "Reno", "NV", "89502")
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn fill_order(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_fill {
            return Err(FulfillmentError::InventoryService(
                "Insufficient stock".to_string(),
            ));
        }

        state.filled.push(order.id());
        drop(state);

        self.bus.notify(FulfillmentEvent::OrderFilled {
            order_id: order.id(),
            pickup_address: Self::warehouse_address(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{CardRef, CustomerId, Money, OrderItem};

    fn test_order() -> Order {
        Order::create(
            CustomerId::new(),
            vec![OrderItem::new("A", Money::from_dollars(10))],
            Address::new("123 Main St", "Springfield", "IL", "62704"),
            Address::new("123 Main St", "Springfield", "IL", "62704"),
            CardRef::new("4111-1111-1111-1111").unwrap(),
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fill_order_queues_filled_event() {
        let bus = EventBus::new();
        let service = InMemoryInventoryService::new(bus.clone());
        let order = test_order();

        service.fill_order(&order).await.unwrap();
        assert_eq!(service.fill_count(), 1);

        match bus.try_next().unwrap() {
            FulfillmentEvent::OrderFilled {
                order_id,
                pickup_address,
            } => {
                assert_eq!(order_id, order.id());
                assert_eq!(
                    pickup_address,
                    InMemoryInventoryService::warehouse_address()
                );
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_on_fill() {
        let bus = EventBus::new();
        let service = InMemoryInventoryService::new(bus.clone());
        service.set_fail_on_fill(true);

        assert!(service.fill_order(&test_order()).await.is_err());
        assert_eq!(service.fill_count(), 0);
        assert!(bus.is_empty());
    }
}
