//! Address validation service trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Address, Order};

use crate::error::FulfillmentError;

/// Result of a successful address validation.
#[derive(Debug, Clone)]
pub struct AddressValidation {
    /// The resolved, normalized delivery address.
    pub address: Address,

    /// Whether the address is a single-family residence.
    pub is_single_family: bool,
}

/// Trait for address validation operations.
#[async_trait]
pub trait AddressService: Send + Sync {
    /// Validates and resolves the order's shipping address.
    async fn validate_address(&self, order: &Order)
    -> Result<AddressValidation, FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryAddressState {
    validation_count: usize,
    single_family: bool,
    fail_on_validate: bool,
}

/// In-memory address service for testing.
#[derive(Debug, Clone)]
pub struct InMemoryAddressService {
    state: Arc<RwLock<InMemoryAddressState>>,
}

impl Default for InMemoryAddressService {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryAddressState {
                validation_count: 0,
                single_family: true,
                fail_on_validate: false,
            })),
        }
    }
}

impl InMemoryAddressService {
    /// Creates a new in-memory address service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether validated addresses report as single-family.
    pub fn set_single_family(&self, single_family: bool) {
        self.state.write().unwrap().single_family = single_family;
    }

    /// Configures the service to fail on the next validate call.
    pub fn set_fail_on_validate(&self, fail: bool) {
        self.state.write().unwrap().fail_on_validate = fail;
    }

    /// Returns the number of validations performed.
    pub fn validation_count(&self) -> usize {
        self.state.read().unwrap().validation_count
    }
}

#[async_trait]
impl AddressService for InMemoryAddressService {
    async fn validate_address(
        &self,
        order: &Order,
    ) -> Result<AddressValidation, FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_validate {
            return Err(FulfillmentError::AddressService(
                "Address not found".to_string(),
            ));
        }

        state.validation_count += 1;

        // Resolution normalizes the street line.
        let raw = order.shipping_address();
        let address = Address::new(
            raw.street.to_uppercase(),
            raw.city.clone(),
            raw.region.clone(),
            raw.postal_code.clone(),
        );

        Ok(AddressValidation {
            address,
            is_single_family: state.single_family,
        })
    }
}
