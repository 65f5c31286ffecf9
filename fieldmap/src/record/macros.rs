//! Declarative `Record` implementation for plain structs.

/// Declares a struct and implements [`Record`](crate::record::Record) for it.
///
/// Every field becomes readable and writable, keyed by its identifier, with
/// its declared type taken from [`FieldValue`](crate::value::FieldValue).
///
/// ```rust
/// use fieldmap::record;
/// use uuid::Uuid;
///
/// record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Item {
///         pub id: Uuid,
///         pub name: String,
///         pub count: Option<i32>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::record::Record for $name {
            fn fields() -> ::std::vec::Vec<$crate::record::FieldDescriptor<Self>> {
                ::std::vec![
                    $(
                        $crate::record::FieldDescriptor::new(
                            ::std::stringify!($field),
                            <$ty as $crate::value::FieldValue>::FIELD_TYPE,
                        )
                        .with_setter(|record: &mut Self, value: $crate::value::Value| {
                            record.$field = <$ty as $crate::value::FieldValue>::from_value(value)?;
                            ::std::result::Result::Ok(())
                        })
                        .with_getter(|record: &Self| {
                            <$ty as $crate::value::FieldValue>::to_value(&record.$field)
                        }),
                    )*
                ]
            }
        }
    };
}
