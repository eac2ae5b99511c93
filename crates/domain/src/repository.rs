//! Order persistence trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use thiserror::Error;

use crate::order::Order;

/// Errors that can occur in an order repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The underlying storage failed.
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Persistence boundary for order snapshots.
///
/// Implementations store detached snapshots; the previous-snapshot
/// reference exists only in memory during an update.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Saves an order snapshot, replacing any prior version.
    async fn save(&self, order: &Order) -> Result<(), RepositoryError>;

    /// Finds the latest persisted snapshot of an order.
    async fn find(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Removes an order. Status checks are the caller's responsibility.
    async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError>;
}

/// In-memory order repository for testing and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    pub fn order_count(&self) -> usize {
        self.orders.read().unwrap().len()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().unwrap();
        orders.insert(order.id(), order.detached());
        Ok(())
    }

    async fn find(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().unwrap();
        Ok(orders.get(&order_id).cloned())
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        let mut orders = self.orders.write().unwrap();
        orders.remove(&order_id);
        Ok(())
    }
}
