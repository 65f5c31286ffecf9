//! Accessors: how a mapper reaches a single named field on a carrier.
//!
//! A container is built around exactly one [`Accessor`]. Its variant fixes
//! the mapping direction: [`Accessor::ReadByKey`] copies carrier values into
//! records, [`Accessor::WriteByKey`] copies record fields into the carrier.

mod validate;

pub use validate::validate;

use std::fmt;
use std::sync::Arc;

use crate::carrier::{KeyedCarrier, KeyedSink};
use crate::errors::CarrierError;
use crate::plan::Direction;
use crate::value::Value;

/// The type of one key parameter an accessor takes besides the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A field name.
    Str,
    /// A positional column index.
    Ordinal,
    /// Anything else, described by name.
    Other(&'static str),
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => f.write_str("&str"),
            Self::Ordinal => f.write_str("usize"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// The key parameters an accessor declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeySignature {
    params: Vec<ParamType>,
}

impl KeySignature {
    /// Creates a signature from its key parameters.
    #[must_use]
    pub fn new(params: impl IntoIterator<Item = ParamType>) -> Self {
        Self {
            params: params.into_iter().collect(),
        }
    }

    /// The signature of a well-formed accessor: a single string key.
    #[must_use]
    pub fn keyed() -> Self {
        Self::new([ParamType::Str])
    }

    /// Returns the key parameters.
    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }
}

impl fmt::Display for KeySignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(carrier")?;
        for param in &self.params {
            write!(f, ", {param}")?;
        }
        f.write_str(")")
    }
}

/// Reads one named field from a carrier.
///
/// Closures `Fn(&C, &str) -> Result<Value, CarrierError>` implement this
/// trait with the single-string-key signature.
pub trait ReadAccessor<C>: Send + Sync {
    /// Returns the key parameters this accessor takes.
    fn signature(&self) -> KeySignature {
        KeySignature::keyed()
    }

    /// Reads the value stored under `key`.
    fn read(&self, carrier: &C, key: &str) -> Result<Value, CarrierError>;
}

impl<C, F> ReadAccessor<C> for F
where
    F: Fn(&C, &str) -> Result<Value, CarrierError> + Send + Sync,
{
    fn read(&self, carrier: &C, key: &str) -> Result<Value, CarrierError> {
        self(carrier, key)
    }
}

/// Writes one named field into a carrier.
///
/// Closures `Fn(&mut C, &str, Value) -> Result<(), CarrierError>` implement
/// this trait with the single-string-key signature.
pub trait WriteAccessor<C>: Send + Sync {
    /// Returns the key parameters this accessor takes.
    fn signature(&self) -> KeySignature {
        KeySignature::keyed()
    }

    /// Writes `value` under `key`.
    fn write(&self, carrier: &mut C, key: &str, value: Value) -> Result<(), CarrierError>;
}

impl<C, F> WriteAccessor<C> for F
where
    F: Fn(&mut C, &str, Value) -> Result<(), CarrierError> + Send + Sync,
{
    fn write(&self, carrier: &mut C, key: &str, value: Value) -> Result<(), CarrierError> {
        self(carrier, key, value)
    }
}

/// The accessor a container is built around.
pub enum Accessor<C> {
    /// `(carrier, field) -> value`: maps carriers into records.
    ReadByKey(Arc<dyn ReadAccessor<C>>),
    /// `(carrier, field, value)`: maps records into carriers.
    WriteByKey(Arc<dyn WriteAccessor<C>>),
}

impl<C: 'static> Accessor<C> {
    /// Wraps a [`ReadAccessor`] implementation.
    pub fn read(accessor: impl ReadAccessor<C> + 'static) -> Self {
        Self::ReadByKey(Arc::new(accessor))
    }

    /// Wraps a [`WriteAccessor`] implementation.
    pub fn write(accessor: impl WriteAccessor<C> + 'static) -> Self {
        Self::WriteByKey(Arc::new(accessor))
    }

    /// Builds a read accessor from a closure.
    pub fn read_fn<F>(f: F) -> Self
    where
        F: Fn(&C, &str) -> Result<Value, CarrierError> + Send + Sync + 'static,
    {
        Self::read(f)
    }

    /// Builds a write accessor from a closure.
    pub fn write_fn<F>(f: F) -> Self
    where
        F: Fn(&mut C, &str, Value) -> Result<(), CarrierError> + Send + Sync + 'static,
    {
        Self::write(f)
    }
}

impl<C: KeyedCarrier + 'static> Accessor<C> {
    /// Reads through the carrier's own [`KeyedCarrier`] lookup.
    #[must_use]
    pub fn indexed() -> Self {
        Self::read_fn(|carrier: &C, key: &str| carrier.get_value(key))
    }
}

impl<C: KeyedSink + 'static> Accessor<C> {
    /// Writes through the carrier's own [`KeyedSink`] insertion.
    #[must_use]
    pub fn sink() -> Self {
        Self::write_fn(|carrier: &mut C, key: &str, value: Value| carrier.set_value(key, value))
    }
}

impl<C> Accessor<C> {
    /// Returns the mapping direction this accessor drives.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::ReadByKey(_) => Direction::Read,
            Self::WriteByKey(_) => Direction::Write,
        }
    }

    /// Returns the key signature the accessor declares.
    #[must_use]
    pub fn signature(&self) -> KeySignature {
        match self {
            Self::ReadByKey(accessor) => accessor.signature(),
            Self::WriteByKey(accessor) => accessor.signature(),
        }
    }
}

impl<C> Clone for Accessor<C> {
    fn clone(&self) -> Self {
        match self {
            Self::ReadByKey(accessor) => Self::ReadByKey(Arc::clone(accessor)),
            Self::WriteByKey(accessor) => Self::WriteByKey(Arc::clone(accessor)),
        }
    }
}

impl<C> fmt::Debug for Accessor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("direction", &self.direction())
            .field("signature", &self.signature().to_string())
            .finish()
    }
}
