//! External service traits and in-memory implementations.

pub mod address;
pub mod inventory;
pub mod payment;
pub mod shipping;

pub use address::{AddressService, AddressValidation, InMemoryAddressService};
pub use inventory::{InMemoryInventoryService, InventoryService};
pub use payment::{InMemoryPaymentService, PaymentService};
pub use shipping::{InMemoryShippingService, ShippingService};
