//! Proposed field changes for an order update.

use super::{Address, CardRef, CustomerId, Money, OrderItem, OrderStatus};

/// Names of the order fields that rules can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    OrderNumber,
    Customer,
    Items,
    ShippingAddress,
    BillingAddress,
    CardRef,
    SignatureRequired,
    Total,
    Status,
    PaymentAuth,
    ProofOfDelivery,
    TrackingId,
    CancelReason,
    PickupAddress,
}

impl OrderField {
    /// Returns the field name as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderField::OrderNumber => "order_number",
            OrderField::Customer => "customer",
            OrderField::Items => "items",
            OrderField::ShippingAddress => "shipping_address",
            OrderField::BillingAddress => "billing_address",
            OrderField::CardRef => "card_ref",
            OrderField::SignatureRequired => "signature_required",
            OrderField::Total => "total",
            OrderField::Status => "status",
            OrderField::PaymentAuth => "payment_auth",
            OrderField::ProofOfDelivery => "proof_of_delivery",
            OrderField::TrackingId => "tracking_id",
            OrderField::CancelReason => "cancel_reason",
            OrderField::PickupAddress => "pickup_address",
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A partial set of proposed field changes.
///
/// Built by a caller, possibly enlarged by derived rules, and applied onto
/// the previous snapshot by the governance engine.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub(crate) items: Option<Vec<OrderItem>>,
    pub(crate) shipping_address: Option<Address>,
    pub(crate) billing_address: Option<Address>,
    pub(crate) card_ref: Option<CardRef>,
    pub(crate) signature_required: Option<bool>,
    pub(crate) total: Option<Money>,
    pub(crate) status: Option<OrderStatus>,
    pub(crate) payment_auth: Option<String>,
    pub(crate) proof_of_delivery: Option<String>,
    pub(crate) tracking_id: Option<String>,
    pub(crate) cancel_reason: Option<String>,
    pub(crate) pickup_address: Option<Address>,
    pub(crate) customer: Option<CustomerId>,
}

impl ChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(mut self, items: Vec<OrderItem>) -> Self {
        self.items = Some(items);
        self
    }

    pub fn with_shipping_address(mut self, address: Address) -> Self {
        self.shipping_address = Some(address);
        self
    }

    pub fn with_billing_address(mut self, address: Address) -> Self {
        self.billing_address = Some(address);
        self
    }

    pub fn with_card_ref(mut self, card_ref: CardRef) -> Self {
        self.card_ref = Some(card_ref);
        self
    }

    pub fn with_signature_required(mut self, required: bool) -> Self {
        self.signature_required = Some(required);
        self
    }

    pub fn with_total(mut self, total: Money) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_payment_auth(mut self, token: impl Into<String>) -> Self {
        self.payment_auth = Some(token.into());
        self
    }

    pub fn with_proof_of_delivery(mut self, proof: impl Into<String>) -> Self {
        self.proof_of_delivery = Some(proof.into());
        self
    }

    pub fn with_tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
        self.tracking_id = Some(tracking_id.into());
        self
    }

    pub fn with_cancel_reason(mut self, reason: impl Into<String>) -> Self {
        self.cancel_reason = Some(reason.into());
        self
    }

    pub fn with_pickup_address(mut self, address: Address) -> Self {
        self.pickup_address = Some(address);
        self
    }

    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }

    /// Returns the fields present in this change set.
    pub fn fields(&self) -> Vec<OrderField> {
        let mut fields = Vec::new();
        if self.customer.is_some() {
            fields.push(OrderField::Customer);
        }
        if self.items.is_some() {
            fields.push(OrderField::Items);
        }
        if self.shipping_address.is_some() {
            fields.push(OrderField::ShippingAddress);
        }
        if self.billing_address.is_some() {
            fields.push(OrderField::BillingAddress);
        }
        if self.card_ref.is_some() {
            fields.push(OrderField::CardRef);
        }
        if self.signature_required.is_some() {
            fields.push(OrderField::SignatureRequired);
        }
        if self.total.is_some() {
            fields.push(OrderField::Total);
        }
        if self.status.is_some() {
            fields.push(OrderField::Status);
        }
        if self.payment_auth.is_some() {
            fields.push(OrderField::PaymentAuth);
        }
        if self.proof_of_delivery.is_some() {
            fields.push(OrderField::ProofOfDelivery);
        }
        if self.tracking_id.is_some() {
            fields.push(OrderField::TrackingId);
        }
        if self.cancel_reason.is_some() {
            fields.push(OrderField::CancelReason);
        }
        if self.pickup_address.is_some() {
            fields.push(OrderField::PickupAddress);
        }
        fields
    }

    /// Returns true if the given field is present.
    pub fn contains(&self, field: OrderField) -> bool {
        self.fields().contains(&field)
    }

    /// Returns true if no fields are present.
    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Merges another change set into this one.
    ///
    /// Fields present in `other` overwrite fields present here.
    pub fn merge(&mut self, other: ChangeSet) {
        macro_rules! take {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }
        take!(customer);
        take!(items);
        take!(shipping_address);
        take!(billing_address);
        take!(card_ref);
        take!(signature_required);
        take!(total);
        take!(status);
        take!(payment_auth);
        take!(proof_of_delivery);
        take!(tracking_id);
        take!(cancel_reason);
        take!(pickup_address);
    }

    /// Returns the proposed items, if present.
    pub fn items(&self) -> Option<&[OrderItem]> {
        self.items.as_deref()
    }

    /// Returns the proposed status, if present.
    pub fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    /// Returns the proposed monetary value of a field, if it carries one.
    pub fn amount_of(&self, field: OrderField) -> Option<Money> {
        match field {
            OrderField::Total => self.total,
            _ => None,
        }
    }
}
