//! Rule configuration for the order aggregate.

use crate::rules::{Check, DerivedRule, FrozenRule, RequiredRule, RuleSet, ValidatedRule};

use super::aggregate::item_total;
use super::{ChangeSet, Money, Order, OrderError, OrderField, OrderStatus};

/// The maximum permitted order total: $99,999.99.
pub const MAX_ORDER_TOTAL: Money = Money::from_cents(9_999_999);

/// Builds the rule set governing every order update.
pub fn rule_set() -> RuleSet {
    RuleSet::new()
        // Fields every snapshot must carry.
        .require(RequiredRule::always(OrderField::OrderNumber))
        .require(RequiredRule::always(OrderField::Customer))
        .require(RequiredRule::always(OrderField::Items))
        .require(RequiredRule::always(OrderField::ShippingAddress))
        .require(RequiredRule::always(OrderField::BillingAddress))
        .require(RequiredRule::always(OrderField::CardRef))
        .require(RequiredRule::always(OrderField::Total))
        .require(RequiredRule::always(OrderField::Status))
        .require(RequiredRule::when(proof_required_when_complete))
        // Fields locked once the order has left Pending.
        .freeze(FrozenRule::when(items_frozen_after_pending))
        .freeze(FrozenRule::when(card_frozen_after_pending))
        .freeze(FrozenRule::when(shipping_address_frozen_after_pending))
        .freeze(FrozenRule::when(billing_address_frozen_after_pending))
        // Status locked once terminal.
        .freeze(FrozenRule::when(status_frozen_when_terminal))
        // Item changes recompute the total.
        .derive(DerivedRule::new(OrderField::Items, recompute_total))
        // Value checks.
        .validate(ValidatedRule::new(
            OrderField::Total,
            vec![Check::AtMost(MAX_ORDER_TOTAL)],
        ))
        .validate(ValidatedRule::new(
            OrderField::Status,
            vec![Check::Predicate(status_transition_permitted)],
        ))
}

fn proof_required_when_complete(order: &Order) -> Option<OrderField> {
    (order.status() == OrderStatus::Complete).then_some(OrderField::ProofOfDelivery)
}

fn items_frozen_after_pending(previous: &Order) -> Option<OrderField> {
    (previous.status() != OrderStatus::Pending).then_some(OrderField::Items)
}

fn card_frozen_after_pending(previous: &Order) -> Option<OrderField> {
    (previous.status() != OrderStatus::Pending).then_some(OrderField::CardRef)
}

fn shipping_address_frozen_after_pending(previous: &Order) -> Option<OrderField> {
    (previous.status() != OrderStatus::Pending).then_some(OrderField::ShippingAddress)
}

fn billing_address_frozen_after_pending(previous: &Order) -> Option<OrderField> {
    (previous.status() != OrderStatus::Pending).then_some(OrderField::BillingAddress)
}

fn status_frozen_when_terminal(previous: &Order) -> Option<OrderField> {
    previous.status().is_terminal().then_some(OrderField::Status)
}

fn recompute_total(_previous: &Order, changes: &ChangeSet) -> ChangeSet {
    match changes.items() {
        Some(items) => ChangeSet::new().with_total(item_total(items)),
        None => ChangeSet::new(),
    }
}

fn status_transition_permitted(previous: &Order, changes: &ChangeSet) -> Result<(), OrderError> {
    if let Some(next) = changes.status() {
        if !previous.status().can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: previous.status(),
                to: next,
            });
        }
    }
    Ok(())
}
