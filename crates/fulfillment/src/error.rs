//! Fulfillment error types.

use common::OrderId;
use domain::DomainError;
use thiserror::Error;

/// Errors that can occur during fulfillment operations.
#[derive(Debug, Error)]
pub enum FulfillmentError {
    /// Domain error from the governance pipeline or repository.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// Address service error.
    #[error("Address service error: {0}")]
    AddressService(String),

    /// Payment service error.
    #[error("Payment service error: {0}")]
    PaymentService(String),

    /// Shipping service error.
    #[error("Shipping service error: {0}")]
    ShippingService(String),

    /// Inventory service error.
    #[error("Inventory service error: {0}")]
    InventoryService(String),

    /// A status action failed. Wraps the original cause; the action is not
    /// retried and prior partial effects are not rolled back.
    #[error("Action '{action}' failed for order {order_id}: {source}")]
    ActionFailed {
        action: &'static str,
        order_id: OrderId,
        #[source]
        source: Box<FulfillmentError>,
    },
}

/// Convenience type alias for fulfillment results.
pub type Result<T> = std::result::Result<T, FulfillmentError>;
