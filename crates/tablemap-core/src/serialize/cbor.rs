use crate::{
    serialize::{ContentSerializer, SerializeError},
    value::{ColumnKind, Value},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_cbor::{from_slice, to_vec};
use std::panic::{AssertUnwindSafe, catch_unwind};

///
/// CborContent
///
/// Stores content as a CBOR blob.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CborContent;

impl<T> ContentSerializer<T> for CborContent
where
    T: Serialize + DeserializeOwned,
{
    fn column_kind(&self) -> ColumnKind {
        ColumnKind::Blob
    }

    fn serialize(&self, value: &T) -> Result<Value, SerializeError> {
        to_vec(value)
            .map(Value::Blob)
            .map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    /// Any panic during decode is caught and reported as a deserialize error.
    fn deserialize(&self, stored: &Value) -> Result<T, SerializeError> {
        let Value::Blob(bytes) = stored else {
            return Err(SerializeError::unexpected(ColumnKind::Blob, stored));
        };

        match catch_unwind(AssertUnwindSafe(|| from_slice(bytes))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(SerializeError::Deserialize(err.to_string())),
            Err(_) => Err(SerializeError::Deserialize(
                "panic during CBOR deserialization".into(),
            )),
        }
    }
}
