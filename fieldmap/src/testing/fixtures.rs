//! Record types and carriers shared by the unit and integration tests.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::record::{FieldDescriptor, Record};
use crate::value::{FieldType, Value, ValueKind};

/// The carrier used throughout the tests.
pub type Row = HashMap<String, Value>;

crate::record! {
    /// One field of every common scalar kind.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Poco {
        pub id: Uuid,
        pub name: String,
        pub date: DateTime<Utc>,
        pub count: Option<i32>,
        pub long: i64,
        pub question: bool,
    }
}

crate::record! {
    /// A record with nothing to map.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct Empty {}
}

/// A hand-written record with a read-only and a write-only field.
#[derive(Debug, Default)]
pub struct Counters {
    pub hits: i64,
    pub misses: i64,
    pub extra: Value,
}

fn set_i64(slot: &mut i64, value: Value) -> Result<(), Value> {
    match value {
        Value::I64(v) => {
            *slot = v;
            Ok(())
        }
        other => Err(other),
    }
}

impl Record for Counters {
    fn fields() -> Vec<FieldDescriptor<Self>> {
        let i64_type = FieldType::Scalar(ValueKind::I64);
        vec![
            FieldDescriptor::new("hits", i64_type)
                .with_setter(|record: &mut Self, value| set_i64(&mut record.hits, value))
                .with_getter(|record: &Self| Value::I64(record.hits)),
            FieldDescriptor::new("misses", i64_type)
                .with_setter(|record: &mut Self, value| set_i64(&mut record.misses, value))
                .with_getter(|record: &Self| Value::I64(record.misses)),
            FieldDescriptor::new("total", i64_type)
                .with_getter(|record: &Self| Value::I64(record.hits + record.misses)),
            FieldDescriptor::new("extra", FieldType::Any).with_setter(|record: &mut Self, value| {
                record.extra = value;
                Ok(())
            }),
        ]
    }
}

/// Returns a row holding every [`Poco`] field and the record it maps to.
pub fn poco_row() -> (Row, Poco) {
    let poco = Poco {
        id: Uuid::from_u128(0x6f1c_2a4e_9b3d_4c8a_a1f0_5e7d_3b2c_1a09),
        name: "Hola".to_string(),
        date: Utc
            .with_ymd_and_hms(2024, 3, 14, 15, 9, 26)
            .single()
            .unwrap_or_default(),
        count: None,
        long: 123_456_789_111,
        question: true,
    };

    let row = Row::from([
        ("id".to_string(), Value::Uuid(poco.id)),
        ("name".to_string(), Value::from("Hola")),
        ("date".to_string(), Value::Timestamp(poco.date)),
        ("count".to_string(), Value::Null),
        ("long".to_string(), Value::I64(poco.long)),
        ("question".to_string(), Value::Bool(true)),
    ]);

    (row, poco)
}
