mod cbor;
mod json;

use crate::value::{ColumnKind, Value};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;
use thiserror::Error as ThisError;

// re-exports
pub use cbor::CborContent;
pub use json::JsonContent;

/// Content serialization for complex members.
///
/// This module is format-level only:
/// - A serializer turns one typed value into one storable column value.
/// - Size limits are caller policy and are passed in explicitly.

///
/// SerializeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("serialize error: {0}")]
    Serialize(String),

    #[error("deserialize error: {0}")]
    Deserialize(String),

    #[error("content size limit exceeded: {len} bytes (limit {max_bytes})")]
    SizeLimitExceeded { len: usize, max_bytes: usize },

    #[error("stored column is {found}, serializer expects {expected}")]
    UnexpectedColumn {
        expected: ColumnKind,
        found: &'static str,
    },
}

///
/// SerializeErrorKind
///
/// Stable error-kind taxonomy for serializer failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SerializeErrorKind {
    Serialize,
    Deserialize,
    SizeLimitExceeded,
    UnexpectedColumn,
}

impl SerializeErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Serialize => "serialize",
            Self::Deserialize => "deserialize",
            Self::SizeLimitExceeded => "size_limit_exceeded",
            Self::UnexpectedColumn => "unexpected_column",
        }
    }
}

impl fmt::Display for SerializeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SerializeError {
    /// Return a stable error kind independent of backend error-message text.
    #[must_use]
    pub const fn kind(&self) -> SerializeErrorKind {
        match self {
            Self::Serialize(_) => SerializeErrorKind::Serialize,
            Self::Deserialize(_) => SerializeErrorKind::Deserialize,
            Self::SizeLimitExceeded { .. } => SerializeErrorKind::SizeLimitExceeded,
            Self::UnexpectedColumn { .. } => SerializeErrorKind::UnexpectedColumn,
        }
    }

    pub(crate) fn unexpected(expected: ColumnKind, found: &Value) -> Self {
        Self::UnexpectedColumn {
            expected,
            found: found.label(),
        }
    }
}

///
/// ContentSerializer
///
/// Pluggable codec turning a complex member into one storable column value
/// and back. `column_kind` is the declared type of the column it produces.
///

pub trait ContentSerializer<T>: Send + Sync {
    fn column_kind(&self) -> ColumnKind;

    fn serialize(&self, value: &T) -> Result<Value, SerializeError>;

    fn deserialize(&self, stored: &Value) -> Result<T, SerializeError>;
}

///
/// ContentFormat
///
/// Built-in serializer selection used when a content column is declared
/// without an explicit serializer.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Cbor,
    #[default]
    Json,
}

impl ContentFormat {
    /// Built-in serializer for this format.
    #[must_use]
    pub fn serializer<T>(self) -> Box<dyn ContentSerializer<T>>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        match self {
            Self::Cbor => Box::new(CborContent),
            Self::Json => Box::new(JsonContent),
        }
    }
}

///
/// TESTS
///
