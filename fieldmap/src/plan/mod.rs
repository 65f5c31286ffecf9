//! Field plan resolution.
//!
//! A [`FieldPlan`] is the ordered list of fields a mapper copies for one
//! record type and one direction, each tagged with the [`CoercionKind`] the
//! synthesizer applies to it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::{FieldDescriptor, Record};
use crate::value::{FieldType, ValueKind};

/// Which way a mapper copies data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Carrier to record.
    Read,
    /// Record to carrier.
    Write,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// How a raw carrier value is converted to a field's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionKind {
    /// The value must be exactly the declared scalar kind.
    Direct,
    /// `Null` becomes `None`, the wrapped kind becomes `Some`.
    NullableWrap,
    /// The value is stored untouched.
    Identity,
}

impl CoercionKind {
    /// Classifies a declared field type.
    #[must_use]
    pub const fn classify(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Scalar(_) => Self::Direct,
            FieldType::Nullable(_) => Self::NullableWrap,
            FieldType::Any => Self::Identity,
        }
    }
}

/// One field of a plan.
pub struct FieldStep<R> {
    field: FieldDescriptor<R>,
    coercion: CoercionKind,
}

impl<R> FieldStep<R> {
    fn new(field: FieldDescriptor<R>) -> Self {
        Self {
            coercion: CoercionKind::classify(field.field_type()),
            field,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.field.name()
    }

    /// Returns the declared field type.
    #[must_use]
    pub const fn declared_type(&self) -> FieldType {
        self.field.field_type()
    }

    /// Returns the declared scalar kind; for `Option` fields, the wrapped kind.
    #[must_use]
    pub const fn declared_kind(&self) -> Option<ValueKind> {
        self.field.field_type().kind()
    }

    /// Returns true if the field accepts `Null`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.field.field_type().is_nullable()
    }

    /// Returns the coercion applied to this field.
    #[must_use]
    pub const fn coercion(&self) -> CoercionKind {
        self.coercion
    }

    /// Returns the underlying field descriptor.
    #[must_use]
    pub const fn field(&self) -> &FieldDescriptor<R> {
        &self.field
    }
}

impl<R> Clone for FieldStep<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            coercion: self.coercion,
        }
    }
}

impl<R> fmt::Debug for FieldStep<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldStep")
            .field("name", &self.name())
            .field("declared_type", &self.declared_type())
            .field("coercion", &self.coercion)
            .finish()
    }
}

/// The ordered field steps for one record type and direction.
pub struct FieldPlan<R> {
    record: &'static str,
    direction: Direction,
    steps: Vec<FieldStep<R>>,
}

impl<R> FieldPlan<R> {
    /// Returns the record type name.
    #[must_use]
    pub const fn record_name(&self) -> &'static str {
        self.record
    }

    /// Returns the direction the plan was resolved for.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the steps in declaration order.
    #[must_use]
    pub fn steps(&self) -> &[FieldStep<R>] {
        &self.steps
    }

    /// Returns the field names in plan order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(FieldStep::name).collect()
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no field is eligible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<R> fmt::Debug for FieldPlan<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPlan")
            .field("record", &self.record)
            .field("direction", &self.direction)
            .field("steps", &self.steps)
            .finish()
    }
}

/// Resolves the field plan of `R` for `direction`.
///
/// Read plans keep writable fields, write plans keep readable fields. A
/// record with no eligible field yields an empty plan.
#[must_use]
pub fn resolve<R: Record>(direction: Direction) -> FieldPlan<R> {
    let steps = R::fields()
        .into_iter()
        .filter(|field| match direction {
            Direction::Read => field.is_writable(),
            Direction::Write => field.is_readable(),
        })
        .map(FieldStep::new)
        .collect();

    FieldPlan {
        record: R::type_name(),
        direction,
        steps,
    }
}
