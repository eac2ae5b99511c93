//! Declarative update rules.
//!
//! Four rule variants govern every order update:
//! - [`RequiredRule`]: a field that must hold a value on the new snapshot,
//!   unconditionally or once a condition on the snapshot holds.
//! - [`FrozenRule`]: a field that may no longer change once a condition on
//!   the previous snapshot holds.
//! - [`DerivedRule`]: a field whose presence in a change set triggers
//!   computation of additional changes (merged into the same change set).
//! - [`ValidatedRule`]: checks that every proposed value for a field must
//!   pass before the change set is applied.
//!
//! A [`RuleSet`] is pure configuration: built once at aggregate definition
//! time, never mutated at runtime, and evaluated by the governance engine.

use crate::order::{ChangeSet, Money, Order, OrderError, OrderField};

/// A predicate yielding a field name, conditionally or unconditionally.
///
/// Static field names are composed into the same rule lists as conditional
/// predicates by treating them as constant-returning predicates.
#[derive(Debug, Clone, Copy)]
enum FieldPredicate {
    Always(OrderField),
    When(fn(&Order) -> Option<OrderField>),
}

impl FieldPredicate {
    fn evaluate(&self, snapshot: &Order) -> Option<OrderField> {
        match self {
            FieldPredicate::Always(field) => Some(*field),
            FieldPredicate::When(f) => f(snapshot),
        }
    }
}

/// A field that must hold a value on every snapshot the rule matches.
#[derive(Debug, Clone, Copy)]
pub struct RequiredRule(FieldPredicate);

impl RequiredRule {
    /// The field is always required.
    pub fn always(field: OrderField) -> Self {
        Self(FieldPredicate::Always(field))
    }

    /// The field is required once the predicate yields it for a snapshot.
    pub fn when(predicate: fn(&Order) -> Option<OrderField>) -> Self {
        Self(FieldPredicate::When(predicate))
    }

    /// Evaluated against the new snapshot; yields the field that must be set.
    pub fn required_field(&self, snapshot: &Order) -> Option<OrderField> {
        self.0.evaluate(snapshot)
    }
}

/// A field that becomes immutable once a prior condition holds.
#[derive(Debug, Clone, Copy)]
pub struct FrozenRule(FieldPredicate);

impl FrozenRule {
    /// The field is immutable after the initial write.
    pub fn always(field: OrderField) -> Self {
        Self(FieldPredicate::Always(field))
    }

    /// The field is immutable once the predicate yields it for the previous
    /// snapshot.
    pub fn when(predicate: fn(&Order) -> Option<OrderField>) -> Self {
        Self(FieldPredicate::When(predicate))
    }

    /// Evaluated against the previous snapshot; yields the frozen field.
    pub fn frozen_field(&self, previous: &Order) -> Option<OrderField> {
        self.0.evaluate(previous)
    }
}

/// A rule that computes additional changes when its trigger field changes.
#[derive(Debug, Clone, Copy)]
pub struct DerivedRule {
    trigger: OrderField,
    compute: fn(&Order, &ChangeSet) -> ChangeSet,
}

impl DerivedRule {
    /// Creates a derived rule triggered by a change to `trigger`.
    pub fn new(trigger: OrderField, compute: fn(&Order, &ChangeSet) -> ChangeSet) -> Self {
        Self { trigger, compute }
    }

    /// Returns the field whose change triggers this rule.
    pub fn trigger(&self) -> OrderField {
        self.trigger
    }

    /// Computes the derived changes from the previous snapshot and the
    /// proposed change set.
    pub fn derive(&self, previous: &Order, changes: &ChangeSet) -> ChangeSet {
        (self.compute)(previous, changes)
    }
}

/// A single validation check on a proposed value.
#[derive(Debug, Clone, Copy)]
pub enum Check {
    /// The proposed monetary value must not exceed the given ceiling.
    AtMost(Money),

    /// A custom predicate over the previous snapshot and the proposed
    /// change set. May signal any domain error.
    Predicate(fn(&Order, &ChangeSet) -> Result<(), OrderError>),
}

impl Check {
    fn run(&self, field: OrderField, previous: &Order, changes: &ChangeSet) -> Result<(), OrderError> {
        match self {
            Check::AtMost(max) => {
                if let Some(value) = changes.amount_of(field) {
                    if value > *max {
                        return Err(OrderError::InvalidValue {
                            field,
                            reason: format!("{value} exceeds the maximum of {max}"),
                        });
                    }
                }
                Ok(())
            }
            Check::Predicate(f) => f(previous, changes),
        }
    }
}

/// One or more checks attached to a field.
#[derive(Debug, Clone)]
pub struct ValidatedRule {
    field: OrderField,
    checks: Vec<Check>,
}

impl ValidatedRule {
    /// Creates a validated rule for a field.
    pub fn new(field: OrderField, checks: Vec<Check>) -> Self {
        Self { field, checks }
    }

    /// Returns the field this rule validates.
    pub fn field(&self) -> OrderField {
        self.field
    }

    /// Runs every check against the proposed change set.
    pub fn validate(&self, previous: &Order, changes: &ChangeSet) -> Result<(), OrderError> {
        for check in &self.checks {
            check.run(self.field, previous, changes)?;
        }
        Ok(())
    }
}

/// The rule registry for an aggregate type.
///
/// Holds the four rule lists in a fixed order. Queried by the governance
/// engine; never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    required: Vec<RequiredRule>,
    frozen: Vec<FrozenRule>,
    derived: Vec<DerivedRule>,
    validated: Vec<ValidatedRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, rule: RequiredRule) -> Self {
        self.required.push(rule);
        self
    }

    pub fn freeze(mut self, rule: FrozenRule) -> Self {
        self.frozen.push(rule);
        self
    }

    pub fn derive(mut self, rule: DerivedRule) -> Self {
        self.derived.push(rule);
        self
    }

    pub fn validate(mut self, rule: ValidatedRule) -> Self {
        self.validated.push(rule);
        self
    }

    pub fn required(&self) -> &[RequiredRule] {
        &self.required
    }

    pub fn frozen(&self) -> &[FrozenRule] {
        &self.frozen
    }

    pub fn derived(&self) -> &[DerivedRule] {
        &self.derived
    }

    pub fn validated(&self) -> &[ValidatedRule] {
        &self.validated
    }
}
