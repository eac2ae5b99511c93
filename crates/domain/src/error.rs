//! Domain error types.

use common::OrderId;
use thiserror::Error;

use crate::order::OrderError;
use crate::repository::RepositoryError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An order rule or validation was violated.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// An error occurred in the order repository.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Order not found.
    #[error("Order not found: {0}")]
    NotFound(OrderId),
}
