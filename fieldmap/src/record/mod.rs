//! Field metadata for mapped record types.
//!
//! A record type describes its fields through [`Record::fields`], in
//! declaration order. Each [`FieldDescriptor`] carries the field name, its
//! declared [`FieldType`] and the setter/getter the synthesized mappers call.
//! The [`record!`](crate::record!) macro writes all of this for plain structs.

mod macros;

use std::fmt;

use crate::value::{FieldType, Value};

/// Stores a converted carrier value into a field, handing the value back if
/// its kind does not fit.
pub type Setter<R> = fn(&mut R, Value) -> Result<(), Value>;

/// Reads a field as a carrier value.
pub type Getter<R> = fn(&R) -> Value;

/// Describes one field of a record type.
pub struct FieldDescriptor<R> {
    name: &'static str,
    field_type: FieldType,
    setter: Option<Setter<R>>,
    getter: Option<Getter<R>>,
}

impl<R> FieldDescriptor<R> {
    /// Creates a descriptor with neither setter nor getter.
    #[must_use]
    pub const fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            setter: None,
            getter: None,
        }
    }

    /// Makes the field writable.
    #[must_use]
    pub fn with_setter(mut self, setter: Setter<R>) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Makes the field readable.
    #[must_use]
    pub fn with_getter(mut self, getter: Getter<R>) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Returns the field name, which is also the carrier key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared field type.
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Returns the setter, if the field is writable.
    #[must_use]
    pub const fn setter(&self) -> Option<Setter<R>> {
        self.setter
    }

    /// Returns the getter, if the field is readable.
    #[must_use]
    pub const fn getter(&self) -> Option<Getter<R>> {
        self.getter
    }

    /// Returns true if the field has a setter.
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Returns true if the field has a getter.
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.getter.is_some()
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldDescriptor<R> {}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("writable", &self.is_writable())
            .field("readable", &self.is_readable())
            .finish()
    }
}

/// A flat record type whose scalar fields can be mapped to and from carriers.
pub trait Record: 'static {
    /// Returns the record's fields in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>>
    where
        Self: Sized;

    /// Returns the full type name of the record.
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }

    /// Returns the type name without its module path.
    fn short_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(Self::type_name())
    }
}

/// Strips the module path from a type name.
pub(crate) fn short_type_name(type_name: &'static str) -> &'static str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Returns the module path of a type name.
pub(crate) fn module_path_of(type_name: &'static str) -> &'static str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rfind("::").map_or("", |idx| &base[..idx])
}
