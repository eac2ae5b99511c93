//! Order aggregate and related types.

mod aggregate;
mod changes;
pub mod rules;
mod service;
mod status;
mod value_objects;

pub use aggregate::Order;
pub use changes::{ChangeSet, OrderField};
pub use service::OrderService;
pub use status::OrderStatus;
pub use value_objects::{Address, CardRef, CustomerId, Money, OrderItem};

use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The item list is empty or an item is malformed.
    #[error("Invalid order items: {reason}")]
    InvalidItems { reason: String },

    /// The card reference does not match the expected format.
    #[error("Invalid card reference format: {value:?}")]
    InvalidCardFormat { value: String },

    /// A required field is absent on the new snapshot.
    #[error("Missing required field: {0}")]
    MissingRequiredField(OrderField),

    /// The field may no longer change.
    #[error("Field is frozen: {0}")]
    FrozenField(OrderField),

    /// The status transition is forbidden.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A proposed value failed a range or value check.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: OrderField, reason: String },

    /// Only orders in a terminal status may be deleted.
    #[error("Cannot delete order in {status} status")]
    OrderNotDeletable { status: OrderStatus },
}
