//! Synthesized row types and row values.
//!
//! A `RowType` is the value-level schema the store sees for one mapping
//! shape: the four system columns followed by one column per non-key mapper.
//! Row types are built once per distinct `RowSignature` and shared through the
//! `RowTypeCache`.

mod builder;
mod cache;
mod signature;

#[cfg(test)]
mod tests;

use crate::{
    error::MappingError,
    value::{ColumnKind, Value},
};
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};

// re-exports
pub use builder::create_type;
pub use cache::{CacheStats, RowTypeCache};
pub use signature::RowSignature;

///
/// CONSTANTS
///

pub const PARTITION_KEY: &str = "PartitionKey";
pub const ROW_KEY: &str = "RowKey";
pub const TIMESTAMP: &str = "Timestamp";
pub const ETAG: &str = "ETag";

/// The store's row-entity contract, spliced into every row type in this order.
pub const SYSTEM_COLUMNS: [(&str, ColumnKind); 4] = [
    (PARTITION_KEY, ColumnKind::Text),
    (ROW_KEY, ColumnKind::Text),
    (TIMESTAMP, ColumnKind::Timestamp),
    (ETAG, ColumnKind::Text),
];

pub(crate) const PARTITION_KEY_SLOT: usize = 0;
pub(crate) const ROW_KEY_SLOT: usize = 1;
pub(crate) const TIMESTAMP_SLOT: usize = 2;
pub(crate) const ETAG_SLOT: usize = 3;

/// True for the column names reserved by the store contract.
#[must_use]
pub fn is_system_column(name: &str) -> bool {
    SYSTEM_COLUMNS.iter().any(|(system, _)| *system == name)
}

///
/// ColumnDef
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
    pub system: bool,
}

///
/// RowType
///
/// Immutable column layout for one mapping shape.
///

#[derive(Debug)]
pub struct RowType {
    name: String,
    signature: RowSignature,
    columns: Vec<ColumnDef>,
    slots: HashMap<String, usize>,
}

impl RowType {
    /// Generated type name, derived from the signature digest.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn signature(&self) -> &RowSignature {
        &self.signature
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Mapped (non-system) columns in mapper order.
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|column| !column.system)
    }

    #[must_use]
    pub fn slot(&self, name: &str) -> Option<usize> {
        self.slots.get(name).copied()
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.slot(name).map(|slot| &self.columns[slot])
    }

    fn unknown(&self, name: &str) -> MappingError {
        MappingError::UnknownColumn {
            name: name.to_string(),
            row_type: self.name.clone(),
        }
    }
}

///
/// Row
///
/// One row value of a synthesized row type: a slot per column.
///

#[derive(Clone, Debug)]
pub struct Row {
    row_type: Arc<RowType>,
    values: Vec<Value>,
}

impl Row {
    /// Empty row; every column starts `Null`.
    #[must_use]
    pub fn new(row_type: Arc<RowType>) -> Self {
        let values = vec![Value::Null; row_type.columns.len()];

        Self { row_type, values }
    }

    #[must_use]
    pub const fn row_type(&self) -> &Arc<RowType> {
        &self.row_type
    }

    #[must_use]
    pub fn partition_key(&self) -> Option<&str> {
        self.values[PARTITION_KEY_SLOT].as_text()
    }

    #[must_use]
    pub fn row_key(&self) -> Option<&str> {
        self.values[ROW_KEY_SLOT].as_text()
    }

    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self.values[TIMESTAMP_SLOT] {
            Value::Timestamp(ts) => Some(ts),
            _ => None,
        }
    }

    #[must_use]
    pub fn etag(&self) -> Option<&str> {
        self.values[ETAG_SLOT].as_text()
    }

    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) {
        self.values[TIMESTAMP_SLOT] = Value::Timestamp(timestamp);
    }

    pub fn set_etag(&mut self, etag: impl Into<String>) {
        self.values[ETAG_SLOT] = Value::Text(etag.into());
    }

    /// Read a column by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.row_type.slot(name).map(|slot| &self.values[slot])
    }

    /// Write a column by name, checking it exists and the value fits its kind.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), MappingError> {
        let slot = self
            .row_type
            .slot(name)
            .ok_or_else(|| self.row_type.unknown(name))?;

        let kind = self.row_type.columns[slot].kind;
        if !value.fits(kind) {
            return Err(MappingError::ValueType {
                binding: name.to_string(),
                expected: kind,
                found: value.label().to_string(),
            });
        }

        self.values[slot] = value;

        Ok(())
    }

    /// Column names paired with their values, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.row_type
            .columns
            .iter()
            .zip(&self.values)
            .map(|(column, value)| (column.name.as_str(), value))
    }

    pub(crate) fn slot_value(&self, slot: usize) -> &Value {
        &self.values[slot]
    }

    pub(crate) fn set_slot(&mut self, slot: usize, value: Value) {
        self.values[slot] = value;
    }
}
