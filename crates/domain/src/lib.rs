//! Domain layer for the order governance system.
//!
//! This crate provides the core building blocks:
//! - Declarative update rules (required, frozen, derived, validated)
//! - The change governance engine that applies a change set to a snapshot
//! - The order aggregate with its factory and lifecycle state
//! - The order repository trait with an in-memory implementation

pub mod error;
pub mod governance;
pub mod order;
pub mod repository;
pub mod rules;

pub use error::DomainError;
pub use governance::GovernanceEngine;
pub use order::{
    Address, CardRef, ChangeSet, CustomerId, Money, Order, OrderError, OrderField, OrderItem,
    OrderService, OrderStatus,
};
pub use repository::{InMemoryOrderRepository, OrderRepository, RepositoryError};
pub use rules::{Check, DerivedRule, FrozenRule, RequiredRule, RuleSet, ValidatedRule};
