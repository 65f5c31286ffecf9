//! Mapper synthesis.
//!
//! [`synthesize`] interprets a [`FieldPlan`]: each step becomes one boxed
//! field-copy closure chosen by its [`CoercionKind`], and the closures are
//! composed into a single [`CompiledMapper`] that runs them in plan order.

use std::fmt;
use std::sync::Arc;

use crate::accessor::{Accessor, ReadAccessor, WriteAccessor};
use crate::config::EmptyPlanPolicy;
use crate::errors::{CoercionError, MapperError, SynthesisError};
use crate::plan::{CoercionKind, Direction, FieldPlan, FieldStep};
use crate::value::Value;

type ReadStep<C, R> = Box<dyn Fn(&C, &mut R) -> Result<(), MapperError> + Send + Sync>;
type WriteStep<C, R> = Box<dyn Fn(&R, &mut C) -> Result<(), MapperError> + Send + Sync>;

enum Steps<C, R> {
    Read(Vec<ReadStep<C, R>>),
    Write(Vec<WriteStep<C, R>>),
}

struct Inner<C, R> {
    record: &'static str,
    fields: Vec<&'static str>,
    steps: Steps<C, R>,
}

/// An executable mapper for one record type, built by one container.
///
/// Clones share the same synthesized closures.
pub struct CompiledMapper<C, R> {
    inner: Arc<Inner<C, R>>,
}

impl<C, R> CompiledMapper<C, R> {
    /// Copies every planned field from `carrier` into `record`.
    ///
    /// Fields are copied in plan order. On the first failure the call
    /// returns; fields copied before it stay applied to `record`.
    pub fn read_into(&self, carrier: &C, record: &mut R) -> Result<(), MapperError> {
        let Steps::Read(steps) = &self.inner.steps else {
            return Err(self.mismatch(Direction::Read));
        };
        for step in steps {
            step(carrier, record)?;
        }
        Ok(())
    }

    /// Builds a fresh record from `carrier`.
    pub fn read_new(&self, carrier: &C) -> Result<R, MapperError>
    where
        R: Default,
    {
        let mut record = R::default();
        self.read_into(carrier, &mut record)?;
        Ok(record)
    }

    /// Copies every planned field from `record` into `carrier`.
    pub fn write_from(&self, record: &R, carrier: &mut C) -> Result<(), MapperError> {
        let Steps::Write(steps) = &self.inner.steps else {
            return Err(self.mismatch(Direction::Write));
        };
        for step in steps {
            step(record, carrier)?;
        }
        Ok(())
    }

    /// Returns the direction the mapper was synthesized for.
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self.inner.steps {
            Steps::Read(_) => Direction::Read,
            Steps::Write(_) => Direction::Write,
        }
    }

    /// Returns the record type name.
    #[must_use]
    pub fn record_name(&self) -> &'static str {
        self.inner.record
    }

    /// Returns the mapped field names in plan order.
    #[must_use]
    pub fn field_names(&self) -> &[&'static str] {
        &self.inner.fields
    }

    /// Returns true if no field is mapped.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Returns true if both handles share the same synthesized mapper.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn mismatch(&self, expected: Direction) -> MapperError {
        MapperError::DirectionMismatch {
            record: self.inner.record,
            expected,
            actual: self.direction(),
        }
    }
}

impl<C, R> Clone for CompiledMapper<C, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C, R> fmt::Debug for CompiledMapper<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledMapper")
            .field("record", &self.inner.record)
            .field("direction", &self.direction())
            .field("fields", &self.inner.fields)
            .finish()
    }
}

/// Turns `plan` into an executable mapper driven by `accessor`.
///
/// Fails if the plan and accessor directions differ, if a step lacks the
/// setter or getter its direction needs, or if `empty_plan` rejects a plan
/// without steps.
pub fn synthesize<C: 'static, R: 'static>(
    plan: &FieldPlan<R>,
    accessor: &Accessor<C>,
    empty_plan: EmptyPlanPolicy,
) -> Result<CompiledMapper<C, R>, SynthesisError> {
    let record = plan.record_name();

    if plan.direction() != accessor.direction() {
        return Err(SynthesisError::new(
            record,
            format!(
                "plan resolved for {} but accessor maps {}",
                plan.direction(),
                accessor.direction()
            ),
        ));
    }

    if plan.is_empty() && empty_plan == EmptyPlanPolicy::Reject {
        return Err(SynthesisError::new(
            record,
            format!("record has no {} fields", match plan.direction() {
                Direction::Read => "writable",
                Direction::Write => "readable",
            }),
        ));
    }

    let steps = match accessor {
        Accessor::ReadByKey(read) => Steps::Read(
            plan.steps()
                .iter()
                .map(|step| read_step(record, step, Arc::clone(read)))
                .collect::<Result<_, _>>()?,
        ),
        Accessor::WriteByKey(write) => Steps::Write(
            plan.steps()
                .iter()
                .map(|step| write_step(record, step, Arc::clone(write)))
                .collect::<Result<_, _>>()?,
        ),
    };

    Ok(CompiledMapper {
        inner: Arc::new(Inner {
            record,
            fields: plan.field_names(),
            steps,
        }),
    })
}

fn read_step<C: 'static, R: 'static>(
    record: &'static str,
    step: &FieldStep<R>,
    accessor: Arc<dyn ReadAccessor<C>>,
) -> Result<ReadStep<C, R>, SynthesisError> {
    let name = step.name();
    let declared = step.declared_type();
    let coercion = step.coercion();
    let set = step.field().setter().ok_or_else(|| {
        SynthesisError::new(record, format!("field '{name}' has no setter"))
    })?;

    let coercion_error =
        move |found: &Value| CoercionError::new(record, name, declared, found.kind());

    let step: ReadStep<C, R> = match coercion {
        CoercionKind::Direct => Box::new(move |carrier: &C, target: &mut R| -> Result<(), MapperError> {
            let raw = accessor.read(carrier, name)?;
            if !declared.accepts(&raw) {
                return Err(coercion_error(&raw).into());
            }
            set(target, raw).map_err(|raw| MapperError::from(coercion_error(&raw)))
        }),
        CoercionKind::NullableWrap => Box::new(move |carrier: &C, target: &mut R| -> Result<(), MapperError> {
            let raw = accessor.read(carrier, name)?;
            if !raw.is_null() && !declared.accepts(&raw) {
                return Err(coercion_error(&raw).into());
            }
            set(target, raw).map_err(|raw| MapperError::from(coercion_error(&raw)))
        }),
        CoercionKind::Identity => Box::new(move |carrier: &C, target: &mut R| -> Result<(), MapperError> {
            let raw = accessor.read(carrier, name)?;
            set(target, raw).map_err(|raw| MapperError::from(coercion_error(&raw)))
        }),
    };
    Ok(step)
}

fn write_step<C: 'static, R: 'static>(
    record: &'static str,
    step: &FieldStep<R>,
    accessor: Arc<dyn WriteAccessor<C>>,
) -> Result<WriteStep<C, R>, SynthesisError> {
    let name = step.name();
    let get = step.field().getter().ok_or_else(|| {
        SynthesisError::new(record, format!("field '{name}' has no getter"))
    })?;

    let step: WriteStep<C, R> = Box::new(move |source: &R, carrier: &mut C| -> Result<(), MapperError> {
        accessor.write(carrier, name, get(source))?;
        Ok(())
    });
    Ok(step)
}
