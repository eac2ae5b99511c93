//! Order fulfillment saga.
//!
//! Coordinates an order's journey from placement to a terminal status by
//! pairing a status state machine with callbacks from external address,
//! payment, shipping, and inventory services. Progress is always persisted
//! through the governance pipeline in the `domain` crate before the next
//! action runs, so a crash mid-saga leaves a consistent snapshot behind.

pub mod error;
pub mod events;
pub mod machine;
pub mod orchestrator;
pub mod services;

pub use error::FulfillmentError;
pub use events::{EventBus, FulfillmentEvent};
pub use machine::SIGNATURE_REQUIRED_TOTAL;
pub use orchestrator::FulfillmentOrchestrator;
pub use services::{
    AddressService, AddressValidation, InMemoryAddressService, InMemoryInventoryService,
    InMemoryPaymentService, InMemoryShippingService, InventoryService, PaymentService,
    ShippingService,
};
