//! Status-driven fulfillment actions.
//!
//! Each non-terminal status has an action that runs whenever an order enters
//! (or re-enters) it. Actions talk to external services and may push further
//! changes through the order service, which in turn re-enters the machine.

use domain::{ChangeSet, Money, Order, OrderRepository, OrderStatus};

use crate::error::{FulfillmentError, Result};
use crate::orchestrator::FulfillmentOrchestrator;
use crate::services::{AddressService, InventoryService, PaymentService, ShippingService};

/// Orders at or above this total require a delivery signature.
pub const SIGNATURE_REQUIRED_TOTAL: Money = Money::from_dollars(500);

impl<R, A, P, S, I> FulfillmentOrchestrator<R, A, P, S, I>
where
    R: OrderRepository,
    A: AddressService,
    P: PaymentService,
    S: ShippingService,
    I: InventoryService,
{
    /// Runs the fulfillment action for the order's current status.
    ///
    /// A failed action is reported as [`FulfillmentError::ActionFailed`]
    /// naming the action and order; the persisted snapshot that triggered
    /// the action is left as is.
    pub(crate) async fn dispatch(&self, order: &Order) -> Result<()> {
        let status = order.status();
        let result = match status {
            OrderStatus::Pending => self.on_pending(order).await,
            OrderStatus::Approved => self.on_approved(order).await,
            OrderStatus::Shipping => self.on_shipping(order).await,
            OrderStatus::Canceled => self.on_canceled(order).await,
            // Nothing left to do.
            OrderStatus::Complete => Ok(()),
        };

        result.map_err(|source| {
            metrics::counter!("fulfillment_action_failures_total").increment(1);
            tracing::error!(
                action = action_name(status),
                order_id = %order.id(),
                error = %source,
                "fulfillment action failed"
            );
            FulfillmentError::ActionFailed {
                action: action_name(status),
                order_id: order.id(),
                source: Box::new(source),
            }
        })
    }

    /// Pending: validate the shipping address and authorize payment, then
    /// record the resolved address, the authorization token, and the
    /// recomputed signature requirement.
    async fn on_pending(&self, order: &Order) -> Result<()> {
        let validation = self.address.validate_address(order).await?;
        let token = self.payment.authorize_payment(order).await?;

        let signature_required =
            !validation.is_single_family || order.total() >= SIGNATURE_REQUIRED_TOTAL;

        self.orders
            .update_order(
                order.id(),
                ChangeSet::new()
                    .with_shipping_address(validation.address)
                    .with_payment_auth(token)
                    .with_signature_required(signature_required),
            )
            .await?;
        Ok(())
    }

    /// Approved: ask inventory to fill the order. Stock confirmation comes
    /// back as an `OrderFilled` event.
    async fn on_approved(&self, order: &Order) -> Result<()> {
        self.inventory.fill_order(order).await
    }

    /// Shipping: start tracking the shipment. Customer receipt comes back
    /// as an `OrderReceived` event.
    async fn on_shipping(&self, order: &Order) -> Result<()> {
        self.shipping.track_shipment(order).await
    }

    /// Canceled: withdraw any active shipment and release the payment.
    async fn on_canceled(&self, order: &Order) -> Result<()> {
        if order.tracking_id().is_some() {
            self.shipping.cancel_shipment(order).await?;
        }
        self.payment.refund_payment(order).await
    }
}

fn action_name(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "validate_and_authorize",
        OrderStatus::Approved => "fill_order",
        OrderStatus::Shipping => "track_shipment",
        OrderStatus::Complete => "none",
        OrderStatus::Canceled => "refund_payment",
    }
}
