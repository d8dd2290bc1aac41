use crate::{mapper::KeyRole, serialize::SerializeError, value::ColumnKind};
use std::fmt;
use thiserror::Error as ThisError;

///
/// MappingError
///
/// Every configuration-time failure, plus the narrow set of per-row failures
/// (content codec errors, foreign row shapes) that translation can surface.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum MappingError {
    #[error("content column '{binding}': {source}")]
    Content {
        binding: String,
        #[source]
        source: SerializeError,
    },

    #[error("invalid member expression '{expr}': {reason}")]
    ExpressionShape { expr: String, reason: String },

    #[error("invalid table name '{name}': {reason}")]
    InvalidTableName { name: String, reason: String },

    #[error("expected exactly one {role} mapper, found {found}")]
    KeyCardinality { role: KeyRole, found: usize },

    #[error("row of type '{found}' cannot be translated by a plan for '{expected}'")]
    RowShape { expected: String, found: String },

    #[error("row type synthesis failed: {reason}")]
    TypeSynthesis { reason: String },

    #[error("unknown column '{name}' on row type '{row_type}'")]
    UnknownColumn { name: String, row_type: String },

    #[error("member '{path}' of kind {kind} cannot be mapped as {role}")]
    UnsupportedType {
        path: String,
        kind: ColumnKind,
        role: &'static str,
    },

    #[error("column '{binding}' expected {expected}, found {found}")]
    ValueType {
        binding: String,
        expected: ColumnKind,
        found: String,
    },
}

impl MappingError {
    pub(crate) fn expression(expr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ExpressionShape {
            expr: expr.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn synthesis(reason: impl Into<String>) -> Self {
        Self::TypeSynthesis {
            reason: reason.into(),
        }
    }

    pub(crate) fn content(binding: impl Into<String>, source: SerializeError) -> Self {
        Self::Content {
            binding: binding.into(),
            source,
        }
    }

    /// Return a stable error kind independent of message text.
    #[must_use]
    pub const fn kind(&self) -> MappingErrorKind {
        match self {
            Self::Content { .. } => MappingErrorKind::Content,
            Self::ExpressionShape { .. } => MappingErrorKind::ExpressionShape,
            Self::InvalidTableName { .. } => MappingErrorKind::InvalidTableName,
            Self::KeyCardinality { .. } => MappingErrorKind::KeyCardinality,
            Self::RowShape { .. } => MappingErrorKind::RowShape,
            Self::TypeSynthesis { .. } => MappingErrorKind::TypeSynthesis,
            Self::UnknownColumn { .. } => MappingErrorKind::UnknownColumn,
            Self::UnsupportedType { .. } => MappingErrorKind::UnsupportedType,
            Self::ValueType { .. } => MappingErrorKind::ValueType,
        }
    }

    /// True for errors raised while building a configuration, as opposed to
    /// errors raised while translating one entity or row.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self.kind(),
            MappingErrorKind::ExpressionShape
                | MappingErrorKind::InvalidTableName
                | MappingErrorKind::KeyCardinality
                | MappingErrorKind::TypeSynthesis
                | MappingErrorKind::UnsupportedType
        )
    }
}

///
/// MappingErrorKind
///
/// Stable error-kind taxonomy for mapping failures.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum MappingErrorKind {
    Content,
    ExpressionShape,
    InvalidTableName,
    KeyCardinality,
    RowShape,
    TypeSynthesis,
    UnknownColumn,
    UnsupportedType,
    ValueType,
}

impl MappingErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::ExpressionShape => "expression_shape",
            Self::InvalidTableName => "invalid_table_name",
            Self::KeyCardinality => "key_cardinality",
            Self::RowShape => "row_shape",
            Self::TypeSynthesis => "type_synthesis",
            Self::UnknownColumn => "unknown_column",
            Self::UnsupportedType => "unsupported_type",
            Self::ValueType => "value_type",
        }
    }
}

impl fmt::Display for MappingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///
