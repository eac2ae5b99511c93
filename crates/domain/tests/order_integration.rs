//! Integration tests for the order update pipeline.

use domain::{
    Address, CardRef, ChangeSet, CustomerId, DomainError, InMemoryOrderRepository, Money, Order,
    OrderError, OrderField, OrderItem, OrderService, OrderStatus,
};

fn test_address() -> Address {
    Address::new("123 Main St", "Springfield", "IL", "62704")
}

fn service() -> OrderService<InMemoryOrderRepository> {
    OrderService::new(InMemoryOrderRepository::new())
}

async fn place_order(service: &OrderService<InMemoryOrderRepository>) -> Order {
    service
        .create_order(
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
        .await
        .unwrap()
}

#[tokio::test]
async fn create_order_computes_total_and_starts_pending() {
    let service = service();
    let order = place_order(&service).await;

    assert_eq!(order.total(), Money::from_dollars(15));
    assert_eq!(order.status(), OrderStatus::Pending);
}

#[tokio::test]
async fn replacing_items_recomputes_total() {
    let service = service();
    let order = place_order(&service).await;

    let updated = service
        .update_order(
            order.id(),
            ChangeSet::new().with_items(vec![OrderItem::new("A", Money::from_dollars(20))]),
        )
        .await
        .unwrap();

    assert_eq!(updated.total(), Money::from_dollars(20));
}

#[tokio::test]
async fn direct_pending_to_shipping_is_rejected() {
    let service = service();
    let order = place_order(&service).await;

    let result = service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Shipping),
        )
        .await;

    assert!(matches!(
        result,
        Err(DomainError::Order(OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            to: OrderStatus::Shipping,
        }))
    ));
}

#[tokio::test]
async fn full_status_walk_with_proof_of_delivery() {
    let service = service();
    let order = place_order(&service).await;

    service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Approved),
        )
        .await
        .unwrap();
    service
        .update_order(
            order.id(),
            ChangeSet::new()
                .with_status(OrderStatus::Shipping)
                .with_tracking_id("TRACK-0001"),
        )
        .await
        .unwrap();

    // Completing without proof of delivery fails.
    let missing = service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Complete),
        )
        .await;
    assert!(matches!(
        missing,
        Err(DomainError::Order(OrderError::MissingRequiredField(
            OrderField::ProofOfDelivery
        )))
    ));

    let complete = service
        .update_order(
            order.id(),
            ChangeSet::new()
                .with_status(OrderStatus::Complete)
                .with_proof_of_delivery("POD-0001"),
        )
        .await
        .unwrap();
    assert_eq!(complete.status(), OrderStatus::Complete);
    assert!(complete.is_terminal());
}

#[tokio::test]
async fn terminal_status_cannot_change() {
    let service = service();
    let order = place_order(&service).await;

    service
        .update_order(
            order.id(),
            ChangeSet::new()
                .with_status(OrderStatus::Canceled)
                .with_cancel_reason("out of stock"),
        )
        .await
        .unwrap();

    let result = service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Approved),
        )
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Order(OrderError::FrozenField(
            OrderField::Status
        )))
    ));
}

#[tokio::test]
async fn delete_is_blocked_until_terminal() {
    let service = service();
    let order = place_order(&service).await;

    // Pending
    assert!(matches!(
        service.delete_order(order.id()).await,
        Err(DomainError::Order(OrderError::OrderNotDeletable { .. }))
    ));

    // Approved
    service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Approved),
        )
        .await
        .unwrap();
    assert!(matches!(
        service.delete_order(order.id()).await,
        Err(DomainError::Order(OrderError::OrderNotDeletable { .. }))
    ));

    // Shipping
    service
        .update_order(
            order.id(),
            ChangeSet::new().with_status(OrderStatus::Shipping),
        )
        .await
        .unwrap();
    assert!(matches!(
        service.delete_order(order.id()).await,
        Err(DomainError::Order(OrderError::OrderNotDeletable { .. }))
    ));

    // Complete
    service
        .update_order(
            order.id(),
            ChangeSet::new()
                .with_status(OrderStatus::Complete)
                .with_proof_of_delivery("POD-0001"),
        )
        .await
        .unwrap();
    service.delete_order(order.id()).await.unwrap();
    assert!(service.get_order(order.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_canceled_order_succeeds() {
    let service = service();
    let order = place_order(&service).await;

    service
        .update_order(
            order.id(),
            ChangeSet::new()
                .with_status(OrderStatus::Canceled)
                .with_cancel_reason("customer request"),
        )
        .await
        .unwrap();
    service.delete_order(order.id()).await.unwrap();
}

#[tokio::test]
async fn ceiling_applies_to_item_recompute() {
    let service = service();
    let order = place_order(&service).await;

    let result = service
        .update_order(
            order.id(),
            ChangeSet::new().with_items(vec![
                OrderItem::new("A", Money::from_cents(9_999_999)),
                OrderItem::new("B", Money::from_cents(1)),
            ]),
        )
        .await;
    assert!(matches!(
        result,
        Err(DomainError::Order(OrderError::InvalidValue {
            field: OrderField::Total,
            ..
        }))
    ));

    // The failed update left the persisted snapshot untouched.
    let latest = service.get_order(order.id()).await.unwrap().unwrap();
    assert_eq!(latest.total(), Money::from_dollars(15));
}
