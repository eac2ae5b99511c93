//! Change governance engine.

use crate::order::{ChangeSet, Order, OrderError};
use crate::rules::RuleSet;

/// Applies proposed change sets to order snapshots under a rule set.
///
/// The pipeline runs in a fixed order: frozen checks, derivation,
/// validation, apply, required checks. Any failing step aborts the whole
/// operation with no partial application.
#[derive(Debug, Clone)]
pub struct GovernanceEngine {
    rules: RuleSet,
}

impl GovernanceEngine {
    /// Creates an engine over the given rule set.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Creates an engine configured with the order rule set.
    pub fn for_orders() -> Self {
        Self::new(crate::order::rules::rule_set())
    }

    /// Returns the rule set this engine evaluates.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Applies a change set to the previous snapshot.
    ///
    /// Returns the new snapshot with the previous one attached as its
    /// previous-snapshot reference, or the first rule violation.
    pub fn apply(&self, previous: &Order, changes: ChangeSet) -> Result<Order, OrderError> {
        let mut changes = changes;

        // 1. Frozen check: every proposed field, against the previous
        //    snapshot.
        for field in changes.fields() {
            for rule in self.rules.frozen() {
                if rule.frozen_field(previous) == Some(field) {
                    return Err(OrderError::FrozenField(field));
                }
            }
        }

        // 2. Derivation: computed values merge into the same change set and
        //    win over caller-supplied ones. They are validated below but not
        //    re-frozen-checked; they are trusted system-computed values.
        let mut derived = ChangeSet::new();
        for rule in self.rules.derived() {
            if changes.contains(rule.trigger()) {
                derived.merge(rule.derive(previous, &changes));
            }
        }
        changes.merge(derived);

        // 3. Validation over the (possibly enlarged) change set.
        for field in changes.fields() {
            for rule in self.rules.validated() {
                if rule.field() == field {
                    rule.validate(previous, &changes)?;
                }
            }
        }

        // 4. Apply.
        let next = previous.merged(&changes);

        // 5. Required check against the new snapshot.
        for rule in self.rules.required() {
            if let Some(field) = rule.required_field(&next) {
                if !next.has_value(field) {
                    return Err(OrderError::MissingRequiredField(field));
                }
            }
        }

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{
        Address, CardRef, CustomerId, Money, OrderField, OrderItem, OrderStatus,
    };

    fn test_address() -> Address {
        Address::new("123 Main St", "Springfield", "IL", "62704")
    }

    fn pending_order() -> Order {
        Order::create(
            CustomerId::new(),
            vec![
                OrderItem::new("A", Money::from_dollars(10)),
                OrderItem::new("B", Money::from_dollars(5)),
            ],
            test_address(),
            test_address(),
            CardRef::new("4111-1111-1111-1111").unwrap(),
            false,
        )
        .unwrap()
    }

    fn engine() -> GovernanceEngine {
        GovernanceEngine::for_orders()
    }

    #[test]
    fn test_items_change_recomputes_total() {
        let order = pending_order();
        let next = engine()
            .apply(
                &order,
                ChangeSet::new().with_items(vec![OrderItem::new("A", Money::from_dollars(20))]),
            )
            .unwrap();

        assert_eq!(next.total(), Money::from_dollars(20));
        assert_eq!(next.items().len(), 1);
    }

    #[test]
    fn test_derived_total_wins_over_caller_supplied_total() {
        let order = pending_order();
        let next = engine()
            .apply(
                &order,
                ChangeSet::new()
                    .with_items(vec![OrderItem::new("A", Money::from_dollars(20))])
                    .with_total(Money::from_dollars(1)),
            )
            .unwrap();

        assert_eq!(next.total(), Money::from_dollars(20));
    }

    #[test]
    fn test_total_over_ceiling_is_rejected() {
        let order = pending_order();
        let result = engine().apply(
            &order,
            ChangeSet::new().with_total(Money::from_cents(10_000_000)),
        );
        assert!(matches!(result, Err(OrderError::InvalidValue { .. })));
    }

    #[test]
    fn test_items_recompute_over_ceiling_is_rejected() {
        let order = pending_order();
        let result = engine().apply(
            &order,
            ChangeSet::new().with_items(vec![
                OrderItem::new("A", Money::from_cents(9_999_999)),
                OrderItem::new("B", Money::from_cents(1)),
            ]),
        );
        assert!(matches!(result, Err(OrderError::InvalidValue { .. })));
    }

    #[test]
    fn test_forbidden_status_transition_is_rejected() {
        let order = pending_order();
        let result = engine().apply(
            &order,
            ChangeSet::new().with_status(OrderStatus::Shipping),
        );
        assert!(matches!(
            result,
            Err(OrderError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipping,
            })
        ));
    }

    #[test]
    fn test_permitted_status_transition() {
        let order = pending_order();
        let next = engine()
            .apply(&order, ChangeSet::new().with_status(OrderStatus::Approved))
            .unwrap();
        assert_eq!(next.status(), OrderStatus::Approved);
        assert_eq!(next.previous().unwrap().status(), OrderStatus::Pending);
    }

    #[test]
    fn test_items_frozen_after_pending() {
        let order = pending_order();
        let approved = engine()
            .apply(&order, ChangeSet::new().with_status(OrderStatus::Approved))
            .unwrap();

        let result = engine().apply(
            &approved,
            ChangeSet::new().with_items(vec![OrderItem::new("C", Money::from_dollars(1))]),
        );
        assert!(matches!(
            result,
            Err(OrderError::FrozenField(OrderField::Items))
        ));
    }

    #[test]
    fn test_addresses_and_card_frozen_after_pending() {
        let order = pending_order();
        let approved = engine()
            .apply(&order, ChangeSet::new().with_status(OrderStatus::Approved))
            .unwrap();

        let shipping = engine().apply(
            &approved,
            ChangeSet::new().with_shipping_address(test_address()),
        );
        assert!(matches!(
            shipping,
            Err(OrderError::FrozenField(OrderField::ShippingAddress))
        ));

        let billing = engine().apply(
            &approved,
            ChangeSet::new().with_billing_address(test_address()),
        );
        assert!(matches!(
            billing,
            Err(OrderError::FrozenField(OrderField::BillingAddress))
        ));

        let card = engine().apply(
            &approved,
            ChangeSet::new().with_card_ref(CardRef::new("4111111111111112").unwrap()),
        );
        assert!(matches!(
            card,
            Err(OrderError::FrozenField(OrderField::CardRef))
        ));
    }

    #[test]
    fn test_fields_mutable_while_pending() {
        let order = pending_order();
        let next = engine()
            .apply(
                &order,
                ChangeSet::new()
                    .with_shipping_address(Address::new("9 Elm St", "Aurora", "CO", "80010"))
                    .with_payment_auth("AUTH-0001"),
            )
            .unwrap();
        assert_eq!(next.shipping_address().street, "9 Elm St");
        assert_eq!(next.payment_auth(), Some("AUTH-0001"));
    }

    #[test]
    fn test_status_frozen_once_terminal() {
        let order = pending_order();
        let canceled = engine()
            .apply(
                &order,
                ChangeSet::new()
                    .with_status(OrderStatus::Canceled)
                    .with_cancel_reason("customer request"),
            )
            .unwrap();

        let result = engine().apply(
            &canceled,
            ChangeSet::new().with_status(OrderStatus::Pending),
        );
        assert!(matches!(
            result,
            Err(OrderError::FrozenField(OrderField::Status))
        ));
    }

    #[test]
    fn test_complete_requires_proof_of_delivery() {
        let order = pending_order();
        let approved = engine()
            .apply(&order, ChangeSet::new().with_status(OrderStatus::Approved))
            .unwrap();
        let shipping = engine()
            .apply(
                &approved,
                ChangeSet::new().with_status(OrderStatus::Shipping),
            )
            .unwrap();

        let without_proof = engine().apply(
            &shipping,
            ChangeSet::new().with_status(OrderStatus::Complete),
        );
        assert!(matches!(
            without_proof,
            Err(OrderError::MissingRequiredField(
                OrderField::ProofOfDelivery
            ))
        ));

        let with_proof = engine()
            .apply(
                &shipping,
                ChangeSet::new()
                    .with_status(OrderStatus::Complete)
                    .with_proof_of_delivery("POD-0001"),
            )
            .unwrap();
        assert_eq!(with_proof.status(), OrderStatus::Complete);
    }

    #[test]
    fn test_empty_change_set_produces_new_snapshot() {
        let order = pending_order();
        let next = engine().apply(&order, ChangeSet::new()).unwrap();
        assert_eq!(next.status(), order.status());
        assert!(next.previous().is_some());
    }
}
