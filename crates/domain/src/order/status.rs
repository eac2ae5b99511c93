//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The status of an order in its fulfillment lifecycle.
///
/// ```text
/// Pending ──► Approved ──► Shipping ──► Complete
///    │            │            │
///    └────────────┴────────────┴──► Canceled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order has been placed but not yet approved.
    #[default]
    Pending,

    /// Order has been approved and is being filled.
    Approved,

    /// Order has been dispatched to the customer.
    Shipping,

    /// Order was delivered and payment captured (terminal).
    Complete,

    /// Order was canceled (terminal).
    Canceled,
}

/// Status transitions that are never permitted, regardless of other rules.
///
/// This is a deny-list: any pair not present here is allowed, including a
/// status change to the same value.
const FORBIDDEN_TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Approved, OrderStatus::Pending),
    (OrderStatus::Shipping, OrderStatus::Pending),
    (OrderStatus::Shipping, OrderStatus::Approved),
    (OrderStatus::Pending, OrderStatus::Shipping),
    (OrderStatus::Pending, OrderStatus::Complete),
];

impl OrderStatus {
    /// Returns true if the transition to `next` is permitted.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        !FORBIDDEN_TRANSITIONS.contains(&(self, next))
    }

    /// Returns true if this is a terminal status (no further transitions).
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Complete | OrderStatus::Canceled)
    }

    /// Returns the status name as a string.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Approved => "APPROVED",
            OrderStatus::Shipping => "SHIPPING",
            OrderStatus::Complete => "COMPLETE",
            OrderStatus::Canceled => "CANCELED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
