//! Record types registered with a container ahead of first use.

use parking_lot::RwLock;
use std::any::TypeId;
use std::fmt;

use crate::container::MapperContainer;
use crate::errors::MapperError;
use crate::record::{module_path_of, short_type_name, Record};

type RegisterFn<C> = fn(&MapperContainer<C>) -> Result<bool, MapperError>;

/// A type-erased handle to a record type, able to register it with a container.
pub struct RecordType<C> {
    type_id: TypeId,
    type_name: &'static str,
    field_names: fn() -> Vec<&'static str>,
    register: RegisterFn<C>,
}

impl<C: 'static> RecordType<C> {
    /// Creates the handle for `R`.
    #[must_use]
    pub fn of<R: Record>() -> Self {
        Self {
            type_id: TypeId::of::<R>(),
            type_name: R::type_name(),
            field_names: || R::fields().iter().map(|field| field.name()).collect(),
            register: MapperContainer::<C>::register_type::<R>,
        }
    }
}

impl<C> RecordType<C> {
    /// Returns the full type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns the type name without its module path.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// Returns the module the type is declared in.
    #[must_use]
    pub fn module_path(&self) -> &'static str {
        module_path_of(self.type_name)
    }

    /// Returns every declared field name, mappable or not.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        (self.field_names)()
    }

    /// Returns the type id of the record.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Synthesizes and caches the mapper for this type.
    ///
    /// Returns true if this call synthesized it.
    pub(crate) fn register(&self, container: &MapperContainer<C>) -> Result<bool, MapperError> {
        (self.register)(container)
    }
}

impl<C> Clone for RecordType<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for RecordType<C> {}

impl<C> PartialEq for RecordType<C> {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl<C> Eq for RecordType<C> {}

impl<C> fmt::Debug for RecordType<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordType")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// An explicit, thread-safe list of record types.
///
/// Adding a type twice keeps the first entry.
pub struct RecordCatalog<C> {
    types: RwLock<Vec<RecordType<C>>>,
}

impl<C> Default for RecordCatalog<C> {
    fn default() -> Self {
        Self {
            types: RwLock::new(Vec::new()),
        }
    }
}

impl<C: 'static> RecordCatalog<C> {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `R` and returns the catalog.
    #[must_use]
    pub fn with<R: Record>(self) -> Self {
        self.add::<R>();
        self
    }

    /// Adds `R`. Returns false if it was already listed.
    pub fn add<R: Record>(&self) -> bool {
        self.insert(RecordType::of::<R>())
    }

    /// Adds a handle. Returns false if its type was already listed.
    pub fn insert(&self, record_type: RecordType<C>) -> bool {
        let mut types = self.types.write();
        if types.contains(&record_type) {
            return false;
        }
        types.push(record_type);
        true
    }
}

impl<C> RecordCatalog<C> {
    /// Returns the listed types satisfying `predicate`, in insertion order.
    pub fn matching<P>(&self, mut predicate: P) -> Vec<RecordType<C>>
    where
        P: FnMut(&RecordType<C>) -> bool,
    {
        self.types
            .read()
            .iter()
            .filter(|record_type| predicate(record_type))
            .copied()
            .collect()
    }

    /// Returns the full names of all listed types.
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        self.types.read().iter().map(RecordType::type_name).collect()
    }

    /// Returns the number of listed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// Returns true if nothing is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }
}

impl<C> fmt::Debug for RecordCatalog<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordCatalog")
            .field("types", &self.type_names())
            .finish()
    }
}
