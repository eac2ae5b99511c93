//! Payment service trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::OrderId;
use domain::{Money, Order};

use crate::error::FulfillmentError;

/// Trait for payment processing operations.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Authorizes payment for an order, returning an authorization token.
    async fn authorize_payment(&self, order: &Order) -> Result<String, FulfillmentError>;

    /// Captures a previously authorized payment.
    async fn complete_payment(&self, order: &Order) -> Result<(), FulfillmentError>;

    /// Refunds a previously authorized payment.
    async fn refund_payment(&self, order: &Order) -> Result<(), FulfillmentError>;
}

#[derive(Debug, Default)]
struct InMemoryPaymentState {
    authorizations: HashMap<String, (OrderId, Money)>,
    capture_count: usize,
    refund_count: usize,
    next_id: u32,
    fail_on_authorize: bool,
    fail_on_complete: bool,
}

/// In-memory payment service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentService {
    state: Arc<RwLock<InMemoryPaymentState>>,
}

impl InMemoryPaymentService {
    /// Creates a new in-memory payment service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail on the next authorize call.
    pub fn set_fail_on_authorize(&self, fail: bool) {
        self.state.write().unwrap().fail_on_authorize = fail;
    }

    /// Configures the service to fail on the next complete call.
    pub fn set_fail_on_complete(&self, fail: bool) {
        self.state.write().unwrap().fail_on_complete = fail;
    }

    /// Returns the number of active authorizations.
    pub fn authorization_count(&self) -> usize {
        self.state.read().unwrap().authorizations.len()
    }

    /// Returns the number of captured payments.
    pub fn capture_count(&self) -> usize {
        self.state.read().unwrap().capture_count
    }

    /// Returns the number of refunds issued.
    pub fn refund_count(&self) -> usize {
        self.state.read().unwrap().refund_count
    }
}

#[async_trait]
impl PaymentService for InMemoryPaymentService {
    async fn authorize_payment(&self, order: &Order) -> Result<String, FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_authorize {
            return Err(FulfillmentError::PaymentService(
                "Payment declined".to_string(),
            ));
        }

        state.next_id += 1;
        let token = format!("AUTH-{:04}", state.next_id);
        state
            .authorizations
            .insert(token.clone(), (order.id(), order.total()));

        Ok(token)
    }

    async fn complete_payment(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_complete {
            return Err(FulfillmentError::PaymentService(
                "Capture failed".to_string(),
            ));
        }

        let token = order.payment_auth().ok_or_else(|| {
            FulfillmentError::PaymentService("No authorization on order".to_string())
        })?;
        if !state.authorizations.contains_key(token) {
            return Err(FulfillmentError::PaymentService(format!(
                "Unknown authorization: {token}"
            )));
        }

        state.capture_count += 1;
        Ok(())
    }

    async fn refund_payment(&self, order: &Order) -> Result<(), FulfillmentError> {
        let mut state = self.state.write().unwrap();
        if let Some(token) = order.payment_auth() {
            state.authorizations.remove(token);
        }
        state.refund_count += 1;
        Ok(())
    }
}
