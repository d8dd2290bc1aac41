use crate::{
    error::MappingError,
    key::AutoKey,
    mapper::{ColumnMapper, MapperSet},
    row::{Row, RowType},
    table::TableNameProvider,
    translate::{EntityDeserializer, EntitySerializer, build_deserializer, build_serializer},
};
use chrono::{DateTime, Utc};
use std::{fmt, sync::Arc};

///
/// RuntimeMappingConfiguration
///
/// Immutable result of `TableMapping::get_configuration`: everything a storage
/// layer needs to read and write one entity type. Cloning shares the compiled
/// plans.
///

pub struct RuntimeMappingConfiguration<E> {
    row_type: Arc<RowType>,
    mappers: Arc<[Arc<dyn ColumnMapper<E>>]>,
    writable: Arc<[Arc<dyn ColumnMapper<E>>]>,
    table_names: Arc<dyn TableNameProvider>,
    auto_key: Option<AutoKey<E>>,
    serializer: Arc<EntitySerializer<E>>,
    deserializer: Arc<EntityDeserializer<E>>,
}

impl<E> RuntimeMappingConfiguration<E> {
    pub(crate) fn assemble(
        mappers: &MapperSet<E>,
        row_type: Arc<RowType>,
        table_names: Arc<dyn TableNameProvider>,
        auto_key: Option<AutoKey<E>>,
    ) -> Result<Self, MappingError> {
        let serializer = build_serializer(mappers, Arc::clone(&row_type), auto_key.clone())?;
        let deserializer = build_deserializer(mappers, Arc::clone(&row_type))?;

        let all: Vec<_> = mappers.get_all().to_vec();
        let writable: Vec<_> = all
            .iter()
            .filter(|mapper| mapper.is_writable())
            .cloned()
            .collect();

        Ok(Self {
            row_type,
            mappers: all.into(),
            writable: writable.into(),
            table_names,
            auto_key,
            serializer: Arc::new(serializer),
            deserializer: Arc::new(deserializer),
        })
    }

    #[must_use]
    pub const fn row_type(&self) -> &Arc<RowType> {
        &self.row_type
    }

    /// Every mapper, in registration order.
    #[must_use]
    pub fn mappers(&self) -> &[Arc<dyn ColumnMapper<E>>] {
        &self.mappers
    }

    /// Mappers that can write back into an entity.
    #[must_use]
    pub fn writable_mappers(&self) -> &[Arc<dyn ColumnMapper<E>>] {
        &self.writable
    }

    #[must_use]
    pub fn mapper(&self, binding: &str) -> Option<&Arc<dyn ColumnMapper<E>>> {
        self.mappers
            .iter()
            .find(|mapper| mapper.binding_name() == binding)
    }

    #[must_use]
    pub const fn auto_key(&self) -> Option<&AutoKey<E>> {
        self.auto_key.as_ref()
    }

    #[must_use]
    pub fn table_names(&self) -> &dyn TableNameProvider {
        self.table_names.as_ref()
    }

    /// Destination table, optionally overridden for this call.
    pub fn table_name(&self, override_name: Option<&str>) -> Result<String, MappingError> {
        self.table_names.table_name(override_name)
    }

    #[must_use]
    pub const fn serializer(&self) -> &Arc<EntitySerializer<E>> {
        &self.serializer
    }

    #[must_use]
    pub const fn deserializer(&self) -> &Arc<EntityDeserializer<E>> {
        &self.deserializer
    }

    /// Empty row of this configuration's row type.
    #[must_use]
    pub fn new_row(&self) -> Row {
        Row::new(Arc::clone(&self.row_type))
    }

    pub fn serialize(&self, entity: &E) -> Result<Row, MappingError> {
        self.serializer.serialize(entity)
    }

    pub fn serialize_at(&self, entity: &E, now: DateTime<Utc>) -> Result<Row, MappingError> {
        self.serializer.serialize_at(entity, now)
    }

    /// Translate without generating keys; see `EntitySerializer::serialize_existing`.
    pub fn serialize_existing(&self, entity: &E) -> Result<Row, MappingError> {
        self.serializer.serialize_existing(entity)
    }

    pub fn deserialize(&self, row: &Row) -> Result<E, MappingError>
    where
        E: Default,
    {
        self.deserializer.deserialize(row)
    }

    pub fn deserialize_into(&self, row: &Row, entity: &mut E) -> Result<(), MappingError> {
        self.deserializer.deserialize_into(row, entity)
    }
}

impl<E> Clone for RuntimeMappingConfiguration<E> {
    fn clone(&self) -> Self {
        Self {
            row_type: Arc::clone(&self.row_type),
            mappers: Arc::clone(&self.mappers),
            writable: Arc::clone(&self.writable),
            table_names: Arc::clone(&self.table_names),
            auto_key: self.auto_key.clone(),
            serializer: Arc::clone(&self.serializer),
            deserializer: Arc::clone(&self.deserializer),
        }
    }
}

impl<E> fmt::Debug for RuntimeMappingConfiguration<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeMappingConfiguration")
            .field("row_type", &self.row_type.name())
            .field("mappers", &self.mappers)
            .field("auto_key", &self.auto_key)
            .finish_non_exhaustive()
    }
}
