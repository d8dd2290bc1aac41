//! Mapping declaration for one entity type.
//!
//! `TableMapping` collects mappers, the destination table and an optional key
//! generator, then assembles them into an immutable
//! `RuntimeMappingConfiguration`:
//!
//! ```ignore
//! let mut mapping = TableMapping::<Order>::new();
//! mapping
//!     .partition_key(member!(Order => category))?
//!     .row_key(member!(Order => id))?
//!     .content_as(member!(Order => payload), "Payload")?;
//! let config = mapping.get_configuration()?;
//! ```

use crate::{
    config::MappingSettings,
    error::MappingError,
    key::{AutoKey, KeyGenerator},
    mapper::{
        ColumnMapper, ContentMapper, KeyMapper, KeyRole, MapperSet, PropertyMapper,
        ValidationState,
    },
    member::{Accessor, Member},
    row::{RowTypeCache, create_type},
    runtime::RuntimeMappingConfiguration,
    serialize::ContentSerializer,
    table::{DefaultTableNameProvider, TableNameProvider, validate_table_name},
    value::{ColumnKind, ColumnValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

///
/// TableMapping
///

pub struct TableMapping<E> {
    mappers: MapperSet<E>,
    settings: MappingSettings,
    table_name: Option<String>,
    table_names: Option<Arc<dyn TableNameProvider>>,
    auto_key: Option<AutoKey<E>>,
    cache: Arc<RowTypeCache>,
}

impl<E> TableMapping<E>
where
    E: Send + Sync + 'static,
{
    /// Empty mapping using default settings and the process-wide row-type cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mappers: MapperSet::new(),
            settings: MappingSettings::default(),
            table_name: None,
            table_names: None,
            auto_key: None,
            cache: RowTypeCache::global(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: MappingSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Use `cache` instead of the process-wide row-type cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<RowTypeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replace the default table-name provider.
    #[must_use]
    pub fn with_table_name_provider(mut self, provider: impl TableNameProvider + 'static) -> Self {
        self.table_names = Some(Arc::new(provider));
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &MappingSettings {
        &self.settings
    }

    #[must_use]
    pub const fn mappers(&self) -> &MapperSet<E> {
        &self.mappers
    }

    //
    // keys
    //

    pub fn partition_key<T>(&mut self, member: Member<E, T>) -> Result<&mut Self, MappingError>
    where
        T: ColumnValue + Send + Sync + 'static,
    {
        self.key(KeyRole::PartitionKey, member)
    }

    pub fn row_key<T>(&mut self, member: Member<E, T>) -> Result<&mut Self, MappingError>
    where
        T: ColumnValue + Send + Sync + 'static,
    {
        self.key(KeyRole::RowKey, member)
    }

    fn key<T>(&mut self, role: KeyRole, member: Member<E, T>) -> Result<&mut Self, MappingError>
    where
        T: ColumnValue + Send + Sync + 'static,
    {
        self.register(member, |accessor| {
            Ok(Arc::new(KeyMapper::from_accessor(role, accessor)?))
        })
    }

    //
    // properties
    //

    /// Map a primitive member to the column named after its path.
    pub fn property<T>(&mut self, member: Member<E, T>) -> Result<&mut Self, MappingError>
    where
        T: ColumnValue + Send + Sync + 'static,
    {
        self.register(member, |accessor| {
            Ok(Arc::new(PropertyMapper::from_accessor(accessor, None)?))
        })
    }

    /// Map a primitive member to the column `name`.
    pub fn property_as<T>(
        &mut self,
        member: Member<E, T>,
        name: &str,
    ) -> Result<&mut Self, MappingError>
    where
        T: ColumnValue + Send + Sync + 'static,
    {
        self.register(member, |accessor| {
            Ok(Arc::new(PropertyMapper::from_accessor(accessor, Some(name))?))
        })
    }

    //
    // content
    //

    /// Map a complex member through the configured default content format.
    pub fn content<T>(&mut self, member: Member<E, T>) -> Result<&mut Self, MappingError>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let serializer = self.settings.content_format.serializer::<T>();

        self.content_inner(member, None, serializer)
    }

    /// As `content`, stored under the column `name`.
    pub fn content_as<T>(
        &mut self,
        member: Member<E, T>,
        name: &str,
    ) -> Result<&mut Self, MappingError>
    where
        T: Serialize + DeserializeOwned + Send + Sync + 'static,
    {
        let serializer = self.settings.content_format.serializer::<T>();

        self.content_inner(member, Some(name), serializer)
    }

    /// Map a complex member through an explicit serializer.
    pub fn content_with<T, S>(
        &mut self,
        member: Member<E, T>,
        serializer: S,
    ) -> Result<&mut Self, MappingError>
    where
        T: Send + Sync + 'static,
        S: ContentSerializer<T> + 'static,
    {
        self.content_inner(member, None, Box::new(serializer))
    }

    fn content_inner<T>(
        &mut self,
        member: Member<E, T>,
        name: Option<&str>,
        serializer: Box<dyn ContentSerializer<T>>,
    ) -> Result<&mut Self, MappingError>
    where
        T: Send + Sync + 'static,
    {
        let max_bytes = self.settings.max_content_bytes;

        self.register(member, |accessor| {
            Ok(Arc::new(ContentMapper::from_accessor(
                accessor, name, serializer, max_bytes,
            )?))
        })
    }

    //
    // custom
    //

    /// Register a user-implemented mapper under its own member path.
    pub fn custom(
        &mut self,
        mapper: impl ColumnMapper<E> + 'static,
    ) -> Result<&mut Self, MappingError> {
        let path = mapper.member_path().clone();
        self.mappers.register(&path, || Ok(Arc::new(mapper)))?;

        Ok(self)
    }

    fn register<T, F>(&mut self, member: Member<E, T>, build: F) -> Result<&mut Self, MappingError>
    where
        T: 'static,
        F: FnOnce(Accessor<E, T>) -> Result<Arc<dyn ColumnMapper<E>>, MappingError>,
    {
        let accessor = member.resolve()?;
        let path = accessor.path().clone();
        self.mappers.register(&path, || build(accessor))?;

        Ok(self)
    }

    //
    // table + keys
    //

    /// Write to the table `name` instead of the type-derived default.
    pub fn to_table(&mut self, name: impl Into<String>) -> Result<&mut Self, MappingError> {
        let name = name.into();
        validate_table_name(&name)?;
        self.table_name = Some(name);

        Ok(self)
    }

    /// Fill the `role` key from `generator` whenever the mapped member is
    /// null or empty at write time. A later call replaces the earlier one.
    pub fn auto_key(
        &mut self,
        role: KeyRole,
        generator: impl KeyGenerator<E> + 'static,
    ) -> &mut Self {
        self.auto_key = Some(AutoKey::new(role, generator));
        self
    }

    //
    // assembly
    //

    /// Check key cardinality. The verdict is computed once and cached until
    /// another mapper is registered.
    pub fn validate(&self) -> Result<(), MappingError> {
        self.mappers.validate()
    }

    #[must_use]
    pub fn validation_state(&self) -> ValidationState {
        self.mappers.validation_state()
    }

    /// Validate, obtain the row type and compile the translation plans.
    /// Safe to call repeatedly; each call yields an equivalent configuration.
    pub fn get_configuration(&self) -> Result<RuntimeMappingConfiguration<E>, MappingError> {
        self.validate()?;
        self.check_auto_key()?;

        let row_type = create_type(&self.cache, &self.mappers)?;
        let table_names = self.table_name_provider()?;

        let config = RuntimeMappingConfiguration::assemble(
            &self.mappers,
            row_type,
            table_names,
            self.auto_key.clone(),
        )?;

        tracing::debug!(
            entity = std::any::type_name::<E>(),
            row_type = config.row_type().name(),
            mappers = config.mappers().len(),
            writable = config.writable_mappers().len(),
            "mapping configuration assembled"
        );

        Ok(config)
    }

    // Generated keys are free-form text, so the key member they fill must be
    // a string or the stored row could never be read back.
    fn check_auto_key(&self) -> Result<(), MappingError> {
        let Some(auto) = &self.auto_key else {
            return Ok(());
        };
        let role = auto.role();

        match self.mappers.of_kind(role.mapper_kind()).next() {
            Some(mapper) if mapper.member_kind() != ColumnKind::Text => {
                Err(MappingError::UnsupportedType {
                    path: mapper.member_path().to_string(),
                    kind: mapper.member_kind(),
                    role: match role {
                        KeyRole::PartitionKey => "generated partition key",
                        KeyRole::RowKey => "generated row key",
                    },
                })
            }
            _ => Ok(()),
        }
    }

    fn table_name_provider(&self) -> Result<Arc<dyn TableNameProvider>, MappingError> {
        if let Some(provider) = &self.table_names {
            return Ok(Arc::clone(provider));
        }

        let mut provider = DefaultTableNameProvider::<E>::new(self.settings.table_prefix.clone());
        if let Some(name) = &self.table_name {
            provider = provider.with_name(name.clone())?;
        }

        Ok(Arc::new(provider))
    }
}

impl<E> Default for TableMapping<E>
where
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

///
/// TESTS
///
