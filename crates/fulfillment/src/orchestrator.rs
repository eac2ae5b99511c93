//! Saga orchestrator for order fulfillment.

use common::OrderId;
use domain::{
    Address, CardRef, ChangeSet, CustomerId, Order, OrderItem, OrderRepository, OrderService,
    OrderStatus,
};

use crate::error::{FulfillmentError, Result};
use crate::events::{EventBus, FulfillmentEvent};
use crate::services::{AddressService, InventoryService, PaymentService, ShippingService};

/// Drives an order from creation to a terminal status.
///
/// Every entry point follows the same shape: load the latest persisted
/// snapshot, push a change set through the governance pipeline, persist the
/// result, then re-enter the status state machine. External services answer
/// asynchronously through [`FulfillmentEvent`]s handled by
/// [`FulfillmentOrchestrator::handle`].
pub struct FulfillmentOrchestrator<R, A, P, S, I>
where
    R: OrderRepository,
    A: AddressService,
    P: PaymentService,
    S: ShippingService,
    I: InventoryService,
{
    pub(crate) orders: OrderService<R>,
    pub(crate) address: A,
    pub(crate) payment: P,
    pub(crate) shipping: S,
    pub(crate) inventory: I,
}

impl<R, A, P, S, I> FulfillmentOrchestrator<R, A, P, S, I>
where
    R: OrderRepository,
    A: AddressService,
    P: PaymentService,
    S: ShippingService,
    I: InventoryService,
{
    /// Creates a new orchestrator over the given collaborators.
    pub fn new(repository: R, address: A, payment: P, shipping: S, inventory: I) -> Self {
        Self {
            orders: OrderService::new(repository),
            address,
            payment,
            shipping,
            inventory,
        }
    }

    /// Returns the underlying order service.
    pub fn orders(&self) -> &OrderService<R> {
        &self.orders
    }

    /// Places a new order and runs the `Pending` status action.
    #[tracing::instrument(skip_all)]
    pub async fn place_order(
        &self,
        customer: CustomerId,
        items: Vec<OrderItem>,
        shipping_address: Address,
        billing_address: Address,
        card_ref: CardRef,
    ) -> Result<Order> {
        let order = self
            .orders
            .create_order(
                customer,
                items,
                shipping_address,
                billing_address,
                card_ref,
                false,
            )
            .await?;
        metrics::counter!("orders_placed_total").increment(1);

        self.dispatch(&order).await?;
        self.latest(order.id()).await
    }

    /// Approves a pending order and runs the `Approved` status action.
    #[tracing::instrument(skip(self))]
    pub async fn approve(&self, order_id: OrderId) -> Result<Order> {
        let order = self
            .orders
            .update_order(
                order_id,
                ChangeSet::new().with_status(OrderStatus::Approved),
            )
            .await?;
        self.dispatch(&order).await?;
        Ok(order)
    }

    /// Cancels an order and runs the `Canceled` status action (refund).
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, order_id: OrderId, reason: &str) -> Result<Order> {
        let order = self
            .orders
            .update_order(
                order_id,
                ChangeSet::new()
                    .with_status(OrderStatus::Canceled)
                    .with_cancel_reason(reason),
            )
            .await?;
        self.dispatch(&order).await?;
        Ok(order)
    }

    /// Handles a fulfillment event from an external service.
    #[tracing::instrument(skip(self), fields(event = event.event_type(), order_id = %event.order_id()))]
    pub async fn handle(&self, event: FulfillmentEvent) -> Result<()> {
        metrics::counter!("fulfillment_events_total").increment(1);
        match event {
            FulfillmentEvent::OrderFilled {
                order_id,
                pickup_address,
            } => self.order_filled(order_id, pickup_address).await,
            FulfillmentEvent::OrderShipped {
                order_id,
                tracking_id,
            } => self.order_shipped(order_id, tracking_id).await,
            FulfillmentEvent::OrderReceived { order_id } => self.order_received(order_id).await,
            FulfillmentEvent::DeliveryVerified {
                order_id,
                proof_of_delivery,
            } => self.delivery_verified(order_id, proof_of_delivery).await,
        }
    }

    /// Drains the event bus, handling every queued event until it is empty.
    pub async fn run_to_idle(&self, bus: &EventBus) -> Result<()> {
        while let Some(event) = bus.try_next() {
            self.handle(event).await?;
        }
        Ok(())
    }

    /// Inventory confirmed stock: record the pickup address and request
    /// shipment.
    pub async fn order_filled(&self, order_id: OrderId, pickup_address: Address) -> Result<()> {
        let order = self
            .orders
            .update_order(
                order_id,
                ChangeSet::new().with_pickup_address(pickup_address),
            )
            .await?;
        self.shipping.ship_order(&order).await
    }

    /// Shipping confirmed dispatch: move to `Shipping` and re-enter the
    /// state machine.
    pub async fn order_shipped(&self, order_id: OrderId, tracking_id: String) -> Result<()> {
        let order = self
            .orders
            .update_order(
                order_id,
                ChangeSet::new()
                    .with_status(OrderStatus::Shipping)
                    .with_tracking_id(tracking_id),
            )
            .await?;
        self.dispatch(&order).await
    }

    /// Shipping confirmed customer receipt: request delivery verification.
    pub async fn order_received(&self, order_id: OrderId) -> Result<()> {
        let order = self.latest(order_id).await?;
        self.shipping.verify_delivery(&order).await
    }

    /// Shipping confirmed proof of delivery: capture payment, move to
    /// `Complete`, and re-enter the state machine.
    pub async fn delivery_verified(
        &self,
        order_id: OrderId,
        proof_of_delivery: String,
    ) -> Result<()> {
        let order = self.latest(order_id).await?;
        self.payment.complete_payment(&order).await?;

        let order = self
            .orders
            .update_order(
                order_id,
                ChangeSet::new()
                    .with_status(OrderStatus::Complete)
                    .with_proof_of_delivery(proof_of_delivery),
            )
            .await?;
        self.dispatch(&order).await
    }

    pub(crate) async fn latest(&self, order_id: OrderId) -> Result<Order> {
        self.orders
            .get_order(order_id)
            .await?
            .ok_or(FulfillmentError::OrderNotFound(order_id))
    }
}
