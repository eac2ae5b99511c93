//! Shared types for the order governance and fulfillment system.

mod types;

pub use types::OrderId;
