use crate::{
    error::RepositoryError,
    store::{StoreError, TableStore},
};
use std::{fmt, sync::Arc};
use tablemap_core::{
    row::{PARTITION_KEY, ROW_KEY, Row},
    runtime::RuntimeMappingConfiguration,
};

///
/// Repository
///
/// Typed read/write facade over one table: entities go through the compiled
/// mapping plans on the way in and out of the store.
///

pub struct Repository<E, S> {
    config: RuntimeMappingConfiguration<E>,
    store: Arc<S>,
    table: String,
}

impl<E, S> Repository<E, S>
where
    S: TableStore,
{
    /// Open the configuration's default table, creating it if needed.
    pub fn new(
        config: RuntimeMappingConfiguration<E>,
        store: Arc<S>,
    ) -> Result<Self, RepositoryError> {
        Self::open(config, store, None)
    }

    /// Open `table` instead of the configured name.
    pub fn with_table(
        config: RuntimeMappingConfiguration<E>,
        store: Arc<S>,
        table: &str,
    ) -> Result<Self, RepositoryError> {
        Self::open(config, store, Some(table))
    }

    fn open(
        config: RuntimeMappingConfiguration<E>,
        store: Arc<S>,
        override_name: Option<&str>,
    ) -> Result<Self, RepositoryError> {
        let table = config.table_name(override_name)?;
        if store.create_table_if_not_exists(&table)? {
            tracing::debug!(table = %table, "repository created its table");
        }

        Ok(Self {
            config,
            store,
            table,
        })
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &RuntimeMappingConfiguration<E> {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    //
    // writes
    //

    /// Insert a new entity; fails if its keys are taken.
    pub fn create(&self, entity: &E) -> Result<Row, RepositoryError> {
        let row = self.config.serialize(entity)?;
        tracing::trace!(table = %self.table, "create");

        Ok(self.store.insert(&self.table, row)?)
    }

    /// Insert or fully replace an entity.
    pub fn upsert(&self, entity: &E) -> Result<Row, RepositoryError> {
        let row = self.config.serialize(entity)?;
        tracing::trace!(table = %self.table, "upsert");

        Ok(self.store.upsert(&self.table, row)?)
    }

    /// Merge an entity's non-null columns into the stored row. The entity
    /// must carry both keys; none are generated.
    pub fn update(&self, entity: &E, if_match: Option<&str>) -> Result<Row, RepositoryError> {
        let row = self.config.serialize_existing(entity)?;
        keys_of(&row)?;
        tracing::trace!(table = %self.table, "update");

        Ok(self.store.merge(&self.table, row, if_match)?)
    }

    /// Delete the row keyed by `entity`'s key members. Unset keys are an
    /// error rather than a freshly generated key.
    pub fn delete(&self, entity: &E, if_match: Option<&str>) -> Result<(), RepositoryError> {
        let row = self.config.serialize_existing(entity)?;
        let (partition_key, row_key) = keys_of(&row)?;

        self.delete_by_key(partition_key, row_key, if_match)
    }

    pub fn delete_by_key(
        &self,
        partition_key: &str,
        row_key: &str,
        if_match: Option<&str>,
    ) -> Result<(), RepositoryError> {
        tracing::trace!(table = %self.table, partition_key, row_key, "delete");

        Ok(self
            .store
            .delete(&self.table, partition_key, row_key, if_match)?)
    }

    //
    // reads
    //

    pub fn get(&self, partition_key: &str, row_key: &str) -> Result<Option<E>, RepositoryError>
    where
        E: Default,
    {
        self.store
            .get(&self.table, partition_key, row_key)?
            .map(|row| self.config.deserialize(&row))
            .transpose()
            .map_err(RepositoryError::from)
    }

    /// Every entity of one partition, in row-key order.
    pub fn list_partition(&self, partition_key: &str) -> Result<Vec<E>, RepositoryError>
    where
        E: Default,
    {
        let rows = self.store.query_partition(&self.table, partition_key)?;

        self.decode_all(&rows)
    }

    /// Every entity in the table, in key order.
    pub fn list_all(&self) -> Result<Vec<E>, RepositoryError>
    where
        E: Default,
    {
        let rows = self.store.scan(&self.table)?;

        self.decode_all(&rows)
    }

    fn decode_all(&self, rows: &[Row]) -> Result<Vec<E>, RepositoryError>
    where
        E: Default,
    {
        rows.iter()
            .map(|row| self.config.deserialize(row).map_err(RepositoryError::from))
            .collect()
    }
}

// Both keys of a row addressing a stored entity; empty counts as missing.
fn keys_of(row: &Row) -> Result<(&str, &str), StoreError> {
    let partition_key = row
        .partition_key()
        .filter(|key| !key.is_empty())
        .ok_or(StoreError::MissingKey {
            column: PARTITION_KEY,
        })?;
    let row_key = row
        .row_key()
        .filter(|key| !key.is_empty())
        .ok_or(StoreError::MissingKey { column: ROW_KEY })?;

    Ok((partition_key, row_key))
}

impl<E, S> fmt::Debug for Repository<E, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("table", &self.table)
            .field("row_type", &self.config.row_type().name())
            .finish_non_exhaustive()
    }
}
