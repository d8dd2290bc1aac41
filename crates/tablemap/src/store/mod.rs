//! Storage collaborator boundary.
//!
//! A `TableStore` persists rows produced by a `RuntimeMappingConfiguration`.
//! Stores own the `Timestamp` and `ETag` system columns: callers send rows with
//! those slots empty and receive them filled in on every write.

mod memory;

use tablemap_core::row::Row;
use thiserror::Error as ThisError;

pub use memory::MemoryTableStore;

///
/// StoreError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum StoreError {
    #[error("row '{partition_key}'/'{row_key}' already exists in table '{table}'")]
    Conflict {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("cannot merge stored column '{column}' in table '{table}': {reason}")]
    Merge {
        table: String,
        column: String,
        reason: String,
    },

    #[error("row is missing its {column} value")]
    MissingKey { column: &'static str },

    #[error("row '{partition_key}'/'{row_key}' not found in table '{table}'")]
    NotFound {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("etag mismatch: expected {expected}, found {found}")]
    PreconditionFailed { expected: String, found: String },

    #[error("table '{0}' does not exist")]
    Table(String),
}

///
/// TableStore
///

pub trait TableStore: Send + Sync {
    /// Create `table` unless it exists. Returns whether it was created.
    fn create_table_if_not_exists(&self, table: &str) -> Result<bool, StoreError>;

    /// Add a new row; fails with `Conflict` if the key is taken.
    fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Add or fully replace a row.
    fn upsert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Overwrite the non-null columns of an existing row. With `if_match`,
    /// the stored ETag must equal it.
    fn merge(&self, table: &str, row: Row, if_match: Option<&str>) -> Result<Row, StoreError>;

    fn get(&self, table: &str, partition_key: &str, row_key: &str)
    -> Result<Option<Row>, StoreError>;

    /// Every row of one partition, in row-key order.
    fn query_partition(&self, table: &str, partition_key: &str) -> Result<Vec<Row>, StoreError>;

    /// Every row of the table, in key order.
    fn scan(&self, table: &str) -> Result<Vec<Row>, StoreError>;

    fn delete(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
        if_match: Option<&str>,
    ) -> Result<(), StoreError>;
}
