use crate::{
    error::MappingError,
    mapper::{ColumnMapper, KeyRole, MapperKind, value_type_error},
    member::{Accessor, Member, MemberPath, check_column_type},
    value::{ColumnKind, ColumnValue, Value},
};

///
/// KeyMapper
///
/// Binds a member to the row's `PartitionKey` or `RowKey` column.
/// Keys are stored as text; the member keeps its own kind and is converted
/// through the key-text form in both directions.
///

pub struct KeyMapper<E, T> {
    role: KeyRole,
    member_kind: ColumnKind,
    accessor: Accessor<E, T>,
}

impl<E, T> KeyMapper<E, T>
where
    E: 'static,
    T: ColumnValue + 'static,
{
    pub fn new(role: KeyRole, member: Member<E, T>) -> Result<Self, MappingError> {
        Self::from_accessor(role, member.resolve()?)
    }

    pub fn from_accessor(role: KeyRole, accessor: Accessor<E, T>) -> Result<Self, MappingError> {
        let member_kind = check_column_type::<T>(accessor.path(), role.label(), true)?;

        Ok(Self {
            role,
            member_kind,
            accessor,
        })
    }

    #[must_use]
    pub const fn role(&self) -> KeyRole {
        self.role
    }
}

impl<E, T> ColumnMapper<E> for KeyMapper<E, T>
where
    E: Send + Sync,
    T: ColumnValue + Send + Sync,
{
    fn kind(&self) -> MapperKind {
        self.role.mapper_kind()
    }

    fn binding_name(&self) -> &str {
        self.role.column()
    }

    fn member_path(&self) -> &MemberPath {
        self.accessor.path()
    }

    fn column_kind(&self) -> ColumnKind {
        ColumnKind::Text
    }

    fn member_kind(&self) -> ColumnKind {
        self.member_kind
    }

    fn get_value(&self, entity: &E) -> Result<Value, MappingError> {
        let text = self
            .accessor
            .get(entity)
            .and_then(|member| member.to_value().to_key_text());

        Ok(text.map_or(Value::Null, Value::Text))
    }

    fn set_value(&self, entity: &mut E, value: &Value) -> Result<(), MappingError> {
        let Some(text) = value.as_text() else {
            return Err(value_type_error(self.binding_name(), ColumnKind::Text, value));
        };

        let parsed = Value::parse_key(self.member_kind, text)
            .and_then(|parsed| T::from_value(&parsed))
            .ok_or_else(|| MappingError::ValueType {
                binding: self.binding_name().to_string(),
                expected: self.member_kind,
                found: format!("key text '{text}'"),
            })?;

        if let Some(slot) = self.accessor.get_mut(entity) {
            *slot = parsed;
        }

        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.accessor.is_writable()
    }
}

