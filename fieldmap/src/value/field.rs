//! Conversions between record field types and carrier values.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::{Value, ValueKind};

/// The declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A plain scalar that must always be present.
    Scalar(ValueKind),
    /// An `Option` wrapper around a scalar.
    Nullable(ValueKind),
    /// An untyped [`Value`], stored as the carrier hands it out.
    Any,
}

impl FieldType {
    /// Returns the scalar kind, if the type has one.
    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Scalar(kind) | Self::Nullable(kind) => Some(*kind),
            Self::Any => None,
        }
    }

    /// Returns true if the type accepts [`Value::Null`].
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_) | Self::Any)
    }

    /// Returns true if `value` can be stored in a field of this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Scalar(kind) => value.kind() == *kind,
            Self::Nullable(kind) => value.is_null() || value.kind() == *kind,
            Self::Any => true,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(rust_name(*kind)),
            Self::Nullable(kind) => write!(f, "Option<{}>", rust_name(*kind)),
            Self::Any => f.write_str("Value"),
        }
    }
}

const fn rust_name(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Null => "()",
        ValueKind::Bool => "bool",
        ValueKind::I32 => "i32",
        ValueKind::I64 => "i64",
        ValueKind::F64 => "f64",
        ValueKind::String => "String",
        ValueKind::Uuid => "Uuid",
        ValueKind::Timestamp => "DateTime<Utc>",
    }
}

/// A Rust type that can be stored in a mapped record field.
///
/// Implemented for `bool`, `i32`, `i64`, `f64`, `String`, `Uuid`,
/// `DateTime<Utc>`, the `Option` of each, and [`Value`] itself.
pub trait FieldValue: Sized {
    /// The declared type reported to the field plan.
    const FIELD_TYPE: FieldType;

    /// Converts a carrier value, handing it back unchanged on a kind mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;

    /// Converts the field into a carrier value.
    fn to_value(&self) -> Value;
}

macro_rules! impl_field_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                const FIELD_TYPE: FieldType = FieldType::Scalar(ValueKind::$variant);

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.clone())
                }
            }

            impl FieldValue for Option<$ty> {
                const FIELD_TYPE: FieldType = FieldType::Nullable(ValueKind::$variant);

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Null => Ok(None),
                        Value::$variant(v) => Ok(Some(v)),
                        other => Err(other),
                    }
                }

                fn to_value(&self) -> Value {
                    self.as_ref().map_or(Value::Null, |v| Value::$variant(v.clone()))
                }
            }
        )*
    };
}

impl_field_value! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    f64 => F64,
    String => String,
    Uuid => Uuid,
    DateTime<Utc> => Timestamp,
}

impl FieldValue for Value {
    const FIELD_TYPE: FieldType = FieldType::Any;

    fn from_value(value: Value) -> Result<Self, Value> {
        Ok(value)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_types() {
        assert_eq!(<i32 as FieldValue>::FIELD_TYPE, FieldType::Scalar(ValueKind::I32));
        assert_eq!(
            <Option<Uuid> as FieldValue>::FIELD_TYPE,
            FieldType::Nullable(ValueKind::Uuid)
        );
        assert_eq!(<Value as FieldValue>::FIELD_TYPE, FieldType::Any);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(FieldType::Scalar(ValueKind::String).to_string(), "String");
        assert_eq!(FieldType::Nullable(ValueKind::I32).to_string(), "Option<i32>");
        assert_eq!(
            FieldType::Scalar(ValueKind::Timestamp).to_string(),
            "DateTime<Utc>"
        );
        assert_eq!(FieldType::Any.to_string(), "Value");
    }

    #[test]
    fn test_accepts() {
        let nullable = FieldType::Nullable(ValueKind::I32);
        assert!(nullable.accepts(&Value::Null));
        assert!(nullable.accepts(&Value::I32(4)));
        assert!(!nullable.accepts(&Value::I64(4)));

        let scalar = FieldType::Scalar(ValueKind::I64);
        assert!(!scalar.accepts(&Value::Null));
        assert!(!scalar.accepts(&Value::I32(4)));
        assert!(FieldType::Any.accepts(&Value::from("x")));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(i64::from_value(Value::I64(9)), Ok(9));
        assert_eq!(i64::from_value(Value::I32(9)), Err(Value::I32(9)));
        assert_eq!(String::from_value(Value::Null), Err(Value::Null));
        assert_eq!("hola".to_string().to_value(), Value::from("hola"));
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Option::<i32>::from_value(Value::Null), Ok(None));
        assert_eq!(Option::<i32>::from_value(Value::I32(1)), Ok(Some(1)));
        assert_eq!(
            Option::<i32>::from_value(Value::from("1")),
            Err(Value::from("1"))
        );
        assert_eq!(None::<bool>.to_value(), Value::Null);
        assert_eq!(Some(true).to_value(), Value::Bool(true));
    }
}
