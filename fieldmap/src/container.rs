//! The mapper container: one accessor, one cache of compiled mappers.

use std::any::TypeId;
use std::fmt;

use tracing::{debug, trace};

use crate::accessor::{validate, Accessor};
use crate::cache::{CacheStats, MapperCache};
use crate::config::ContainerConfig;
use crate::errors::MapperError;
use crate::observability::SynthesisTimer;
use crate::plan::{resolve, Direction};
use crate::record::Record;
use crate::registrar::{RecordCatalog, RecordType};
use crate::synth::{synthesize, CompiledMapper};

/// Hands out compiled mappers for carrier type `C`.
///
/// Mappers are synthesized on first use of a record type (or by batch
/// registration) and cached for the lifetime of the container. The container
/// is `Send + Sync` and is meant to be shared through `Arc`.
pub struct MapperContainer<C> {
    accessor: Accessor<C>,
    config: ContainerConfig,
    cache: MapperCache,
}

impl<C: 'static> MapperContainer<C> {
    /// Creates a container around `accessor` with the default config.
    pub fn new(accessor: Accessor<C>) -> Result<Self, MapperError> {
        Self::with_config(accessor, ContainerConfig::default())
    }

    /// Creates a container around `accessor`.
    ///
    /// Fails with [`MapperError::ContractViolation`] unless the accessor
    /// takes exactly one string key.
    pub fn with_config(accessor: Accessor<C>, config: ContainerConfig) -> Result<Self, MapperError> {
        validate(&accessor)?;

        debug!(
            container = %config.name,
            direction = %accessor.direction(),
            "Mapper container created"
        );

        Ok(Self {
            accessor,
            config,
            cache: MapperCache::new(),
        })
    }

    /// Returns the mapper for `R`, synthesizing it on first use.
    ///
    /// Every call for the same type returns the same mapper. A failed
    /// synthesis is returned and nothing is cached, so a later call retries.
    pub fn get_or_create<R: Record>(&self) -> Result<CompiledMapper<C, R>, MapperError> {
        let (mapper, created) = self.cache.get_or_try_insert_with(
            TypeId::of::<R>(),
            R::type_name(),
            || self.compile::<R>(),
        )?;

        if !created {
            trace!(container = %self.config.name, record = R::type_name(), "Mapper cache hit");
        }
        Ok(mapper)
    }

    /// Returns the mapper for `R` if one has been synthesized.
    pub fn try_get<R: Record>(&self) -> Option<CompiledMapper<C, R>> {
        self.cache.get(TypeId::of::<R>())
    }

    /// Synthesizes mappers for every listed type.
    ///
    /// Types already cached are left untouched. The first failure aborts the
    /// batch; types registered before it stay cached.
    pub fn register_all(&self, types: &[RecordType<C>]) -> Result<(), MapperError> {
        let mut synthesized = 0usize;
        for record_type in types {
            if record_type.register(self)? {
                synthesized += 1;
            }
        }

        debug!(
            container = %self.config.name,
            requested = types.len(),
            synthesized,
            "Record types registered"
        );
        Ok(())
    }

    /// Registers every catalog entry satisfying `predicate`.
    ///
    /// Returns how many types matched.
    pub fn register_matching<P>(
        &self,
        catalog: &RecordCatalog<C>,
        predicate: P,
    ) -> Result<usize, MapperError>
    where
        P: FnMut(&RecordType<C>) -> bool,
    {
        let types = catalog.matching(predicate);
        self.register_all(&types)?;
        Ok(types.len())
    }

    /// Entry point stored in [`RecordType`] handles.
    pub(crate) fn register_type<R: Record>(&self) -> Result<bool, MapperError> {
        let (_, created) = self.cache.get_or_try_insert_with::<CompiledMapper<C, R>, _>(
            TypeId::of::<R>(),
            R::type_name(),
            || self.compile::<R>(),
        )?;
        Ok(created)
    }

    fn compile<R: Record>(&self) -> Result<CompiledMapper<C, R>, MapperError> {
        let timer = SynthesisTimer::start(R::type_name());
        let direction = self.accessor.direction();
        let plan = resolve::<R>(direction);
        let mapper = synthesize(&plan, &self.accessor, self.config.empty_plan)?;

        if self.config.log_synthesis {
            debug!(
                container = %self.config.name,
                record = timer.record(),
                %direction,
                fields = plan.len(),
                duration_ms = timer.elapsed_ms(),
                "Mapper synthesized"
            );
        }
        Ok(mapper)
    }
}

impl<C> MapperContainer<C> {
    /// Returns true if a mapper for `R` is cached.
    pub fn contains<R: Record>(&self) -> bool {
        self.cache.contains(TypeId::of::<R>())
    }

    /// Returns the direction fixed by the accessor.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.accessor.direction()
    }

    /// Returns the container config.
    #[must_use]
    pub const fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Returns the number of cached mappers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if no mapper has been synthesized yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns a snapshot of cache activity.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl<C> fmt::Debug for MapperContainer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperContainer")
            .field("name", &self.config.name)
            .field("accessor", &self.accessor)
            .field("cache", &self.cache)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{KeySignature, ParamType, ReadAccessor};
    use crate::config::EmptyPlanPolicy;
    use crate::errors::CarrierError;
    use crate::testing::fixtures::{poco_row, Counters, Empty, Poco, Row};
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    struct Ordinal;

    impl ReadAccessor<Row> for Ordinal {
        fn signature(&self) -> KeySignature {
            KeySignature::new([ParamType::Ordinal])
        }

        fn read(&self, _carrier: &Row, _key: &str) -> Result<Value, CarrierError> {
            Ok(Value::Null)
        }
    }

    fn reader() -> MapperContainer<Row> {
        MapperContainer::new(Accessor::indexed()).unwrap()
    }

    #[test]
    fn test_invalid_accessor_is_rejected() {
        let err = MapperContainer::<Row>::new(Accessor::read(Ordinal)).unwrap_err();
        assert!(matches!(err, MapperError::ContractViolation(_)));
    }

    #[test]
    fn test_get_or_create_returns_same_mapper() {
        let container = reader();
        let first = container.get_or_create::<Poco>().unwrap();
        let second = container.get_or_create::<Poco>().unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(container.len(), 1);
        assert_eq!(container.stats().syntheses, 1);
    }

    #[test]
    fn test_mapper_reads_row() {
        let (row, expected) = poco_row();
        let mapper = reader().get_or_create::<Poco>().unwrap();
        assert_eq!(mapper.read_new(&row).unwrap(), expected);
    }

    #[test]
    fn test_try_get_does_not_create() {
        let container = reader();
        assert!(container.try_get::<Poco>().is_none());
        assert!(!container.contains::<Poco>());
        assert!(container.is_empty());

        container.get_or_create::<Poco>().unwrap();

        assert!(container.try_get::<Poco>().is_some());
        assert!(container.contains::<Poco>());
    }

    #[test]
    fn test_empty_plan_policy() {
        let container = reader();
        let mapper = container.get_or_create::<Empty>().unwrap();
        assert!(mapper.is_noop());

        let strict = MapperContainer::<Row>::with_config(
            Accessor::indexed(),
            ContainerConfig::new().with_empty_plan(EmptyPlanPolicy::Reject),
        )
        .unwrap();
        let err = strict.get_or_create::<Empty>().unwrap_err();
        assert_eq!(err.code(), "MAPPER-002-SYNTHESIS");
        assert!(!strict.contains::<Empty>());
    }

    #[test]
    fn test_register_all_skips_cached_types() {
        let container = reader();
        let before = container.get_or_create::<Poco>().unwrap();

        container
            .register_all(&[RecordType::of::<Poco>(), RecordType::of::<Counters>()])
            .unwrap();

        assert!(container.contains::<Counters>());
        assert!(container.try_get::<Poco>().unwrap().ptr_eq(&before));
        assert_eq!(container.stats().syntheses, 2);
    }

    #[test]
    fn test_register_all_stops_at_first_failure() {
        let container = MapperContainer::<Row>::with_config(
            Accessor::indexed(),
            ContainerConfig::new().with_empty_plan(EmptyPlanPolicy::Reject),
        )
        .unwrap();

        let result = container.register_all(&[
            RecordType::of::<Poco>(),
            RecordType::of::<Empty>(),
            RecordType::of::<Counters>(),
        ]);

        assert!(matches!(result, Err(MapperError::Synthesis(_))));
        assert!(container.contains::<Poco>());
        assert!(!container.contains::<Empty>());
        assert!(!container.contains::<Counters>());
    }

    #[test]
    fn test_register_matching() {
        let catalog = RecordCatalog::new()
            .with::<Poco>()
            .with::<Counters>()
            .with::<Empty>();
        let container = reader();

        let count = container
            .register_matching(&catalog, |record_type| record_type.short_name() != "Empty")
            .unwrap();

        assert_eq!(count, 2);
        assert!(container.contains::<Poco>());
        assert!(container.contains::<Counters>());
        assert!(!container.contains::<Empty>());
    }

    #[test]
    fn test_accessors() {
        let container = MapperContainer::<Row>::with_config(
            Accessor::sink(),
            ContainerConfig::new().with_name("sink"),
        )
        .unwrap();

        assert_eq!(container.direction(), Direction::Write);
        assert_eq!(container.config().name, "sink");
    }
}
