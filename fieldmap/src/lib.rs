//! # Fieldmap
//!
//! Cached, synthesized mappers between flat records and keyed carriers.
//!
//! A [`MapperContainer`] is built around one [`Accessor`]: a function that
//! reads (or writes) a single named field on a carrier such as a result row
//! or a key/value map. For every record type it is asked about, the container
//! resolves the record's field plan once, synthesizes a [`CompiledMapper`]
//! that copies every field through the accessor, and caches it for reuse.
//!
//! - **Accessor validation**: accessors must take exactly one string key
//! - **Field plans**: per-field coercions derived from declared types
//! - **Mapper cache**: one synthesis per record type, even under contention
//! - **Batch registration**: warm the cache from explicit record lists
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldmap::prelude::*;
//! use std::collections::HashMap;
//! use uuid::Uuid;
//!
//! fieldmap::record! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Item {
//!         pub id: Uuid,
//!         pub name: String,
//!         pub count: Option<i32>,
//!     }
//! }
//!
//! # fn main() -> Result<(), MapperError> {
//! let container = MapperContainer::<HashMap<String, Value>>::new(Accessor::indexed())?;
//!
//! let id = Uuid::new_v4();
//! let row = HashMap::from([
//!     ("id".to_string(), Value::Uuid(id)),
//!     ("name".to_string(), Value::from("Hola")),
//!     ("count".to_string(), Value::Null),
//! ]);
//!
//! let item = container.get_or_create::<Item>()?.read_new(&row)?;
//! assert_eq!(item.name, "Hola");
//! assert_eq!(item.count, None);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod accessor;
pub mod cache;
pub mod carrier;
pub mod config;
pub mod container;
pub mod errors;
pub mod observability;
pub mod plan;
pub mod record;
pub mod registrar;
pub mod synth;
pub mod value;

#[cfg(test)]
pub(crate) mod testing;


pub use accessor::Accessor;
pub use config::ContainerConfig;
pub use container::MapperContainer;
pub use errors::MapperError;
pub use synth::CompiledMapper;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::accessor::{Accessor, KeySignature, ParamType, ReadAccessor, WriteAccessor};
    pub use crate::cache::CacheStats;
    pub use crate::carrier::{KeyedCarrier, KeyedSink};
    pub use crate::config::{ContainerConfig, EmptyPlanPolicy};
    pub use crate::container::MapperContainer;
    pub use crate::errors::{
        CarrierError, CoercionError, ContractViolation, ErrorInfo, MapperError, SynthesisError,
    };
    pub use crate::plan::{CoercionKind, Direction};
    pub use crate::record::{FieldDescriptor, Record};
    pub use crate::registrar::{RecordCatalog, RecordType};
    pub use crate::synth::CompiledMapper;
    pub use crate::value::{FieldType, FieldValue, Value, ValueKind};
}
