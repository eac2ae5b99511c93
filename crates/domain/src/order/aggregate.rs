//! Order snapshot and aggregate factory.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use super::{
    Address, CardRef, ChangeSet, CustomerId, Money, OrderError, OrderField, OrderItem, OrderStatus,
};

/// An immutable snapshot of an order at a point in time.
///
/// Orders are created once by [`Order::create`] and mutated only through the
/// governance engine, which merges a validated change set onto the latest
/// persisted snapshot and produces a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    order_number: String,
    customer: CustomerId,
    items: Vec<OrderItem>,
    shipping_address: Address,
    billing_address: Address,
    card_ref: CardRef,
    signature_required: bool,
    total: Money,
    status: OrderStatus,
    payment_auth: Option<String>,
    proof_of_delivery: Option<String>,
    tracking_id: Option<String>,
    cancel_reason: Option<String>,
    pickup_address: Option<Address>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    /// The last persisted snapshot this one was derived from.
    ///
    /// Attached transiently during an update so rules can compare the
    /// would-be state against the previous state. Never persisted.
    #[serde(skip)]
    previous: Option<Box<Order>>,
}

impl Order {
    /// Creates a new order in `Pending` status.
    ///
    /// Validates the item list (non-empty, every item with a non-empty
    /// identifier and a non-negative price) and computes the total as the
    /// sum of item prices.
    pub fn create(
        customer: CustomerId,
        items: Vec<OrderItem>,
        shipping_address: Address,
        billing_address: Address,
        card_ref: CardRef,
        signature_required: bool,
    ) -> Result<Order, OrderError> {
        validate_items(&items)?;
        let total = item_total(&items);
        if total > super::rules::MAX_ORDER_TOTAL {
            return Err(OrderError::InvalidValue {
                field: OrderField::Total,
                reason: format!(
                    "{} exceeds the maximum of {}",
                    total,
                    super::rules::MAX_ORDER_TOTAL
                ),
            });
        }

        let id = OrderId::new();
        let now = Utc::now();
        Ok(Order {
            id,
            order_number: order_number_for(id),
            customer,
            items,
            shipping_address,
            billing_address,
            card_ref,
            signature_required,
            total,
            status: OrderStatus::Pending,
            payment_auth: None,
            proof_of_delivery: None,
            tracking_id: None,
            cancel_reason: None,
            pickup_address: None,
            created_at: now,
            updated_at: now,
            previous: None,
        })
    }

    /// Produces a new snapshot with the change set applied.
    ///
    /// The current snapshot is attached to the result as its
    /// previous-snapshot reference. Validation is the governance engine's
    /// responsibility; this only merges values.
    pub(crate) fn merged(&self, changes: &ChangeSet) -> Order {
        let mut next = self.clone();
        let changes = changes.clone();

        if let Some(customer) = changes.customer {
            next.customer = customer;
        }
        if let Some(items) = changes.items {
            next.items = items;
        }
        if let Some(address) = changes.shipping_address {
            next.shipping_address = address;
        }
        if let Some(address) = changes.billing_address {
            next.billing_address = address;
        }
        if let Some(card_ref) = changes.card_ref {
            next.card_ref = card_ref;
        }
        if let Some(required) = changes.signature_required {
            next.signature_required = required;
        }
        if let Some(total) = changes.total {
            next.total = total;
        }
        if let Some(status) = changes.status {
            next.status = status;
        }
        if let Some(token) = changes.payment_auth {
            next.payment_auth = Some(token);
        }
        if let Some(proof) = changes.proof_of_delivery {
            next.proof_of_delivery = Some(proof);
        }
        if let Some(tracking_id) = changes.tracking_id {
            next.tracking_id = Some(tracking_id);
        }
        if let Some(reason) = changes.cancel_reason {
            next.cancel_reason = Some(reason);
        }
        if let Some(address) = changes.pickup_address {
            next.pickup_address = Some(address);
        }

        next.updated_at = Utc::now();
        next.previous = Some(Box::new(self.detached()));
        next
    }

    /// Returns a copy without the previous-snapshot reference.
    pub fn detached(&self) -> Order {
        let mut copy = self.clone();
        copy.previous = None;
        copy
    }

    /// Returns true if the given field holds a value on this snapshot.
    pub fn has_value(&self, field: OrderField) -> bool {
        match field {
            OrderField::Items => !self.items.is_empty(),
            OrderField::OrderNumber => !self.order_number.is_empty(),
            OrderField::PaymentAuth => self.payment_auth.is_some(),
            OrderField::ProofOfDelivery => self.proof_of_delivery.is_some(),
            OrderField::TrackingId => self.tracking_id.is_some(),
            OrderField::CancelReason => self.cancel_reason.is_some(),
            OrderField::PickupAddress => self.pickup_address.is_some(),
            // Structurally present on every snapshot.
            OrderField::Customer
            | OrderField::ShippingAddress
            | OrderField::BillingAddress
            | OrderField::CardRef
            | OrderField::SignatureRequired
            | OrderField::Total
            | OrderField::Status => true,
        }
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn customer(&self) -> CustomerId {
        self.customer
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    pub fn billing_address(&self) -> &Address {
        &self.billing_address
    }

    pub fn card_ref(&self) -> &CardRef {
        &self.card_ref
    }

    pub fn signature_required(&self) -> bool {
        self.signature_required
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_auth(&self) -> Option<&str> {
        self.payment_auth.as_deref()
    }

    pub fn proof_of_delivery(&self) -> Option<&str> {
        self.proof_of_delivery.as_deref()
    }

    pub fn tracking_id(&self) -> Option<&str> {
        self.tracking_id.as_deref()
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn pickup_address(&self) -> Option<&Address> {
        self.pickup_address.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the previous snapshot, if this one came out of an update.
    pub fn previous(&self) -> Option<&Order> {
        self.previous.as_deref()
    }

    /// Returns true if the order is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Sums the prices of the given items.
pub(crate) fn item_total(items: &[OrderItem]) -> Money {
    items.iter().map(|item| item.price).sum()
}

fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::InvalidItems {
            reason: "item list is empty".to_string(),
        });
    }
    for item in items {
        if item.item_id.is_empty() {
            return Err(OrderError::InvalidItems {
                reason: "item has an empty identifier".to_string(),
            });
        }
        if item.price.is_negative() {
            return Err(OrderError::InvalidItems {
                reason: format!("item {} has a negative price", item.item_id),
            });
        }
    }
    Ok(())
}

fn order_number_for(id: OrderId) -> String {
    let simple = id.as_uuid().simple().to_string();
    format!("ORD-{}", simple[..8].to_uppercase())
}
