use crate::{
    error::MappingError,
    mapper::{ColumnMapper, MapperKind},
    member::{Accessor, Member, MemberPath, check_content_type},
    serialize::{ContentSerializer, SerializeError},
    value::{ColumnKind, Value},
};

///
/// ContentMapper
///
/// Complex member stored as one serialized column (text or blob, depending
/// on the serializer). Encoded size is bounded in both directions.
///

pub struct ContentMapper<E, T> {
    binding: String,
    accessor: Accessor<E, T>,
    serializer: Box<dyn ContentSerializer<T>>,
    max_bytes: usize,
}

impl<E, T> ContentMapper<E, T>
where
    E: 'static,
    T: 'static,
{
    pub fn new(
        member: Member<E, T>,
        rename: Option<&str>,
        serializer: Box<dyn ContentSerializer<T>>,
        max_bytes: usize,
    ) -> Result<Self, MappingError> {
        Self::from_accessor(member.resolve()?, rename, serializer, max_bytes)
    }

    pub fn from_accessor(
        accessor: Accessor<E, T>,
        rename: Option<&str>,
        serializer: Box<dyn ContentSerializer<T>>,
        max_bytes: usize,
    ) -> Result<Self, MappingError> {
        accessor.require_writable()?;
        check_content_type::<T>(accessor.path())?;

        let kind = serializer.column_kind();
        if !kind.is_primitive() {
            return Err(MappingError::UnsupportedType {
                path: accessor.path().to_string(),
                kind,
                role: "content column",
            });
        }

        Ok(Self {
            binding: rename.map_or_else(|| accessor.path().column_name(), str::to_string),
            accessor,
            serializer,
            max_bytes,
        })
    }

    fn check_size(&self, value: &Value) -> Result<(), MappingError> {
        let len = match value {
            Value::Text(text) => text.len(),
            Value::Blob(bytes) => bytes.len(),
            _ => 0,
        };

        if len > self.max_bytes {
            return Err(MappingError::content(
                &self.binding,
                SerializeError::SizeLimitExceeded {
                    len,
                    max_bytes: self.max_bytes,
                },
            ));
        }

        Ok(())
    }
}

impl<E, T> ColumnMapper<E> for ContentMapper<E, T>
where
    E: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    fn kind(&self) -> MapperKind {
        MapperKind::Content
    }

    fn binding_name(&self) -> &str {
        &self.binding
    }

    fn member_path(&self) -> &MemberPath {
        self.accessor.path()
    }

    fn column_kind(&self) -> ColumnKind {
        self.serializer.column_kind()
    }

    fn get_value(&self, entity: &E) -> Result<Value, MappingError> {
        let Some(member) = self.accessor.get(entity) else {
            return Ok(Value::Null);
        };

        let stored = self
            .serializer
            .serialize(member)
            .map_err(|err| MappingError::content(&self.binding, err))?;
        self.check_size(&stored)?;

        Ok(stored)
    }

    fn set_value(&self, entity: &mut E, value: &Value) -> Result<(), MappingError> {
        self.check_size(value)?;

        let decoded = self
            .serializer
            .deserialize(value)
            .map_err(|err| MappingError::content(&self.binding, err))?;

        if let Some(slot) = self.accessor.get_mut(entity) {
            *slot = decoded;
        }

        Ok(())
    }
}
