use crate::store::{StoreError, TableStore};
use chrono::Utc;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};
use tablemap_core::row::{PARTITION_KEY, ROW_KEY, Row};

type Key = (String, String);
type Table = BTreeMap<Key, Row>;

///
/// MemoryTableStore
///
/// Process-local `TableStore`. Rows are kept per table in key order; every
/// write stamps a fresh timestamp and a monotonically increasing ETag.
///

#[derive(Debug, Default)]
pub struct MemoryTableStore {
    tables: RwLock<HashMap<String, Table>>,
    version: AtomicU64,
}

impl MemoryTableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<_> = tables.keys().cloned().collect();
        names.sort();

        names
    }

    /// Rows in `table`, or zero when it does not exist.
    #[must_use]
    pub fn row_count(&self, table: &str) -> usize {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);

        tables.get(table).map_or(0, BTreeMap::len)
    }

    fn stamp(&self, row: &mut Row) {
        let version = self.version.fetch_add(1, Ordering::Relaxed) + 1;

        row.set_timestamp(Utc::now());
        row.set_etag(format!("W/\"{version}\""));
    }

    fn write<R>(
        &self,
        table: &str,
        f: impl FnOnce(&mut Table) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::Table(table.to_string()))?;

        f(rows)
    }

    fn read<R>(&self, table: &str, f: impl FnOnce(&Table) -> R) -> Result<R, StoreError> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let rows = tables
            .get(table)
            .ok_or_else(|| StoreError::Table(table.to_string()))?;

        Ok(f(rows))
    }
}

fn key_of(row: &Row) -> Result<Key, StoreError> {
    let partition_key = row
        .partition_key()
        .ok_or(StoreError::MissingKey {
            column: PARTITION_KEY,
        })?;
    let row_key = row.row_key().ok_or(StoreError::MissingKey { column: ROW_KEY })?;

    Ok((partition_key.to_string(), row_key.to_string()))
}

fn check_etag(stored: &Row, if_match: Option<&str>) -> Result<(), StoreError> {
    let (Some(expected), Some(found)) = (if_match, stored.etag()) else {
        return Ok(());
    };

    if expected == "*" || expected == found {
        Ok(())
    } else {
        Err(StoreError::PreconditionFailed {
            expected: expected.to_string(),
            found: found.to_string(),
        })
    }
}

impl TableStore for MemoryTableStore {
    fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        if tables.contains_key(table) {
            return Ok(false);
        }

        tables.insert(table.to_string(), Table::new());
        tracing::debug!(table, "table created");

        Ok(true)
    }

    fn insert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        let key = key_of(&row)?;

        self.write(table, |rows| {
            if rows.contains_key(&key) {
                return Err(StoreError::Conflict {
                    table: table.to_string(),
                    partition_key: key.0.clone(),
                    row_key: key.1.clone(),
                });
            }

            self.stamp(&mut row);
            rows.insert(key, row.clone());

            Ok(row)
        })
    }

    fn upsert(&self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        let key = key_of(&row)?;

        self.write(table, |rows| {
            self.stamp(&mut row);
            rows.insert(key, row.clone());

            Ok(row)
        })
    }

    fn merge(&self, table: &str, row: Row, if_match: Option<&str>) -> Result<Row, StoreError> {
        let key = key_of(&row)?;

        self.write(table, |rows| {
            let Some(stored) = rows.get(&key) else {
                return Err(StoreError::NotFound {
                    table: table.to_string(),
                    partition_key: key.0.clone(),
                    row_key: key.1.clone(),
                });
            };
            check_etag(stored, if_match)?;

            // null columns keep whatever the stored row holds
            let mut merged = row;
            let keep: Vec<String> = merged
                .iter()
                .filter(|(_, value)| value.is_null())
                .map(|(name, _)| name.to_string())
                .collect();
            for name in keep {
                if let Some(previous) = stored.get(&name).filter(|v| !v.is_null()) {
                    merged
                        .set(&name, previous.clone())
                        .map_err(|err| StoreError::Merge {
                            table: table.to_string(),
                            column: name.clone(),
                            reason: err.to_string(),
                        })?;
                }
            }

            self.stamp(&mut merged);
            rows.insert(key, merged.clone());

            Ok(merged)
        })
    }

    fn get(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Option<Row>, StoreError> {
        let key = (partition_key.to_string(), row_key.to_string());

        self.read(table, |rows| rows.get(&key).cloned())
    }

    fn query_partition(&self, table: &str, partition_key: &str) -> Result<Vec<Row>, StoreError> {
        self.read(table, |rows| {
            rows.iter()
                .filter(|((pk, _), _)| pk == partition_key)
                .map(|(_, row)| row.clone())
                .collect()
        })
    }

    fn scan(&self, table: &str) -> Result<Vec<Row>, StoreError> {
        self.read(table, |rows| rows.values().cloned().collect())
    }

    fn delete(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
        if_match: Option<&str>,
    ) -> Result<(), StoreError> {
        let key = (partition_key.to_string(), row_key.to_string());

        self.write(table, |rows| {
            let Some(stored) = rows.get(&key) else {
                return Err(StoreError::NotFound {
                    table: table.to_string(),
                    partition_key: key.0.clone(),
                    row_key: key.1.clone(),
                });
            };
            check_etag(stored, if_match)?;
            rows.remove(&key);

            Ok(())
        })
    }
}
