mod content;
mod key;
mod property;
mod set;

use crate::{
    error::MappingError,
    member::MemberPath,
    row::{PARTITION_KEY, ROW_KEY},
    value::{ColumnKind, Value},
};
use derive_more::Display;
use std::fmt;

// re-exports
pub use content::ContentMapper;
pub use key::KeyMapper;
pub use property::PropertyMapper;
pub use set::{MapperSet, ValidationState};

///
/// MapperKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[remain::sorted]
pub enum MapperKind {
    Content,
    Custom,
    PartitionKey,
    Property,
    RowKey,
}

impl MapperKind {
    #[must_use]
    pub const fn key_role(self) -> Option<KeyRole> {
        match self {
            Self::PartitionKey => Some(KeyRole::PartitionKey),
            Self::RowKey => Some(KeyRole::RowKey),
            Self::Content | Self::Custom | Self::Property => None,
        }
    }
}

///
/// KeyRole
///
/// The two key columns every row carries.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum KeyRole {
    PartitionKey,
    RowKey,
}

impl KeyRole {
    /// Store column the key binds to.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::PartitionKey => PARTITION_KEY,
            Self::RowKey => ROW_KEY,
        }
    }

    /// Human-readable role name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PartitionKey => "partition key",
            Self::RowKey => "row key",
        }
    }

    #[must_use]
    pub const fn mapper_kind(self) -> MapperKind {
        match self {
            Self::PartitionKey => MapperKind::PartitionKey,
            Self::RowKey => MapperKind::RowKey,
        }
    }
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// ColumnMapper
///
/// One configured rule binding an entity member to a row column.
///
/// `get_value` returns the column-ready value (already serialized for content
/// columns) and `Null` when any intermediate segment is absent.
/// `set_value` is only called for writable mappers and never with `Null`.
/// Custom mappers implement this trait directly.
///

pub trait ColumnMapper<E>: Send + Sync {
    fn kind(&self) -> MapperKind;

    /// Column name in the row.
    fn binding_name(&self) -> &str;

    fn member_path(&self) -> &MemberPath;

    /// Declared column type.
    fn column_kind(&self) -> ColumnKind;

    /// Kind of the entity member itself. Key mappers store text, so this
    /// differs from `column_kind` when the key member is not a string.
    fn member_kind(&self) -> ColumnKind {
        self.column_kind()
    }

    fn get_value(&self, entity: &E) -> Result<Value, MappingError>;

    fn set_value(&self, entity: &mut E, value: &Value) -> Result<(), MappingError>;

    fn is_writable(&self) -> bool {
        true
    }
}

impl<E> fmt::Debug for dyn ColumnMapper<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMapper")
            .field("kind", &self.kind())
            .field("binding", &self.binding_name())
            .field("path", &self.member_path().to_string())
            .field("column_kind", &self.column_kind())
            .finish()
    }
}

// Shared mismatch error for mappers whose stored value has the wrong variant.
pub(crate) fn value_type_error(binding: &str, expected: ColumnKind, found: &Value) -> MappingError {
    MappingError::ValueType {
        binding: binding.to_string(),
        expected,
        found: found.label().to_string(),
    }
}

///
/// TESTS
///
