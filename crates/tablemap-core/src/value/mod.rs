mod convert;

#[cfg(test)]
mod tests;

use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::Display;
use std::any::TypeId;
use ulid::Ulid;

// re-exports
pub use convert::ColumnValue;

///
/// ColumnKind
///
/// Declared type of one row column.
/// `Structured` marks complex members that only a Content mapper may store.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
pub enum ColumnKind {
    Blob,
    Bool,
    Float64,
    Int,
    Structured,
    Text,
    Timestamp,
    Uint,
    Ulid,
}

impl ColumnKind {
    /// Stable label used in row signatures and diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blob => "Blob",
            Self::Bool => "Bool",
            Self::Float64 => "Float64",
            Self::Int => "Int",
            Self::Structured => "Structured",
            Self::Text => "Text",
            Self::Timestamp => "Timestamp",
            Self::Uint => "Uint",
            Self::Ulid => "Ulid",
        }
    }

    /// Store-native column type.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Structured)
    }

    /// Kinds with a lossless key-text form.
    #[must_use]
    pub const fn is_keyable(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Int | Self::Text | Self::Timestamp | Self::Uint | Self::Ulid
        )
    }

    /// Primitive column kind of a Rust type, if it is one of the types the
    /// store holds natively (optionals included).
    #[must_use]
    pub fn of<T: 'static>() -> Option<Self> {
        let id = TypeId::of::<T>();

        macro_rules! lookup {
            ( $( $ty:ty => $kind:ident ),* $(,)? ) => {
                $(
                    if id == TypeId::of::<$ty>() || id == TypeId::of::<Option<$ty>>() {
                        return Some(Self::$kind);
                    }
                )*
            };
        }

        lookup!(
            String => Text,
            &'static str => Text,
            bool => Bool,
            i8 => Int,
            i16 => Int,
            i32 => Int,
            i64 => Int,
            u8 => Uint,
            u16 => Uint,
            u32 => Uint,
            u64 => Uint,
            f32 => Float64,
            f64 => Float64,
            Vec<u8> => Blob,
            DateTime<Utc> => Timestamp,
            Ulid => Ulid,
        );

        None
    }
}

///
/// Value
///
/// One column value in the store's native row representation.
/// Null → the member was absent (None, or an unset intermediate segment).
///

#[derive(Clone, Debug, PartialEq)]
#[remain::sorted]
pub enum Value {
    Blob(Vec<u8>),
    Bool(bool),
    Float64(f64),
    Int(i64),
    Null,
    Text(String),
    Timestamp(DateTime<Utc>),
    Uint(u64),
    Ulid(Ulid),
}

impl Value {
    /// Column kind of this value; `None` for `Null`.
    #[must_use]
    pub const fn kind(&self) -> Option<ColumnKind> {
        match self {
            Self::Blob(_) => Some(ColumnKind::Blob),
            Self::Bool(_) => Some(ColumnKind::Bool),
            Self::Float64(_) => Some(ColumnKind::Float64),
            Self::Int(_) => Some(ColumnKind::Int),
            Self::Null => None,
            Self::Text(_) => Some(ColumnKind::Text),
            Self::Timestamp(_) => Some(ColumnKind::Timestamp),
            Self::Uint(_) => Some(ColumnKind::Uint),
            Self::Ulid(_) => Some(ColumnKind::Ulid),
        }
    }

    /// Diagnostic label, `Null` included.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.label(),
            None => "Null",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True when a key column holding this value is considered unset.
    #[must_use]
    pub fn is_empty_key(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            _ => false,
        }
    }

    /// True when this value may be stored in a column declared as `kind`.
    #[must_use]
    pub fn fits(&self, kind: ColumnKind) -> bool {
        self.kind().is_none_or(|own| own == kind)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render this value as store key text.
    ///
    /// Returns `None` for `Null` and for kinds without a lossless key form.
    #[must_use]
    pub fn to_key_text(&self) -> Option<String> {
        match self {
            Self::Bool(v) => Some(v.to_string()),
            Self::Int(v) => Some(v.to_string()),
            Self::Text(v) => Some(v.clone()),
            Self::Timestamp(v) => Some(v.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Uint(v) => Some(v.to_string()),
            Self::Ulid(v) => Some(v.to_string()),
            Self::Blob(_) | Self::Float64(_) | Self::Null => None,
        }
    }

    /// Parse store key text back into a value of `kind`.
    #[must_use]
    pub fn parse_key(kind: ColumnKind, text: &str) -> Option<Self> {
        match kind {
            ColumnKind::Bool => text.parse().ok().map(Self::Bool),
            ColumnKind::Int => text.parse().ok().map(Self::Int),
            ColumnKind::Text => Some(Self::Text(text.to_string())),
            ColumnKind::Timestamp => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|ts| Self::Timestamp(ts.with_timezone(&Utc))),
            ColumnKind::Uint => text.parse().ok().map(Self::Uint),
            ColumnKind::Ulid => Ulid::from_string(text).ok().map(Self::Ulid),
            ColumnKind::Blob | ColumnKind::Float64 | ColumnKind::Structured => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}
