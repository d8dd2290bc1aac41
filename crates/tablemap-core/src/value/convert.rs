use crate::value::{ColumnKind, Value};
use chrono::{DateTime, Utc};
use ulid::Ulid;

///
/// ColumnValue
///
/// Conversion boundary between a Rust member type and a row column value.
///
/// Implemented for the store-native primitives and for `Option<T>`.
/// Types reporting `ColumnKind::Structured` are rejected by key and property
/// mappers and must go through a Content mapper instead.
///

pub trait ColumnValue {
    fn kind() -> ColumnKind
    where
        Self: Sized;

    fn to_value(&self) -> Value;

    #[must_use]
    fn from_value(value: &Value) -> Option<Self>
    where
        Self: Sized;
}

impl<T: ColumnValue> ColumnValue for Option<T> {
    fn kind() -> ColumnKind {
        T::kind()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return Some(None);
        }

        T::from_value(value).map(Some)
    }
}

impl ColumnValue for String {
    fn kind() -> ColumnKind {
        ColumnKind::Text
    }

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl ColumnValue for Vec<u8> {
    fn kind() -> ColumnKind {
        ColumnKind::Blob
    }

    fn to_value(&self) -> Value {
        Value::Blob(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Blob(v) => Some(v.clone()),
            _ => None,
        }
    }
}

// impl_copy_column_value
// Copy types stored one-to-one in a value variant.
macro_rules! impl_copy_column_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl ColumnValue for $type {
                fn kind() -> ColumnKind {
                    ColumnKind::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(*self)
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(*v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_copy_column_value!(
    bool => Bool,
    f64 => Float64,
    i64 => Int,
    u64 => Uint,
    DateTime<Utc> => Timestamp,
    Ulid => Ulid,
);

// impl_widened_column_value
// Narrow integers widen into the 64-bit variant and narrow back checked.
macro_rules! impl_widened_column_value {
    ( $( $type:ty => $variant:ident ( $wide:ty ) ),* $(,)? ) => {
        $(
            impl ColumnValue for $type {
                fn kind() -> ColumnKind {
                    ColumnKind::$variant
                }

                fn to_value(&self) -> Value {
                    Value::$variant(<$wide>::from(*self))
                }

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => <$type>::try_from(*v).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_widened_column_value!(
    i8 => Int(i64),
    i16 => Int(i64),
    i32 => Int(i64),
    u8 => Uint(u64),
    u16 => Uint(u64),
    u32 => Uint(u64),
);

impl ColumnValue for f32 {
    fn kind() -> ColumnKind {
        ColumnKind::Float64
    }

    fn to_value(&self) -> Value {
        Value::Float64(f64::from(*self))
    }

    #[expect(clippy::cast_possible_truncation)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float64(v) => Some(*v as Self),
            _ => None,
        }
    }
}
