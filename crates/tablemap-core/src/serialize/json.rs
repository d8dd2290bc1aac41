use crate::{
    serialize::{ContentSerializer, SerializeError},
    value::{ColumnKind, Value},
};
use serde::{Serialize, de::DeserializeOwned};

///
/// JsonContent
///
/// Stores content as JSON text.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonContent;

impl<T> ContentSerializer<T> for JsonContent
where
    T: Serialize + DeserializeOwned,
{
    fn column_kind(&self) -> ColumnKind {
        ColumnKind::Text
    }

    fn serialize(&self, value: &T) -> Result<Value, SerializeError> {
        serde_json::to_string(value)
            .map(Value::Text)
            .map_err(|e| SerializeError::Serialize(e.to_string()))
    }

    fn deserialize(&self, stored: &Value) -> Result<T, SerializeError> {
        let Value::Text(text) = stored else {
            return Err(SerializeError::unexpected(ColumnKind::Text, stored));
        };

        serde_json::from_str(text).map_err(|e| SerializeError::Deserialize(e.to_string()))
    }
}
