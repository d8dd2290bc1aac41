use crate::{
    error::MappingError,
    mapper::{ColumnMapper, MapperKind, value_type_error},
    member::{Accessor, Member, MemberPath, check_column_type},
    value::{ColumnKind, ColumnValue, Value},
};

///
/// PropertyMapper
///
/// Simple column: a primitive member stored under its own (or a renamed)
/// column name.
///

pub struct PropertyMapper<E, T> {
    binding: String,
    kind: ColumnKind,
    accessor: Accessor<E, T>,
}

impl<E, T> PropertyMapper<E, T>
where
    E: 'static,
    T: ColumnValue + 'static,
{
    pub fn new(member: Member<E, T>, rename: Option<&str>) -> Result<Self, MappingError> {
        Self::from_accessor(member.resolve()?, rename)
    }

    pub fn from_accessor(
        accessor: Accessor<E, T>,
        rename: Option<&str>,
    ) -> Result<Self, MappingError> {
        accessor.require_writable()?;
        let kind = check_column_type::<T>(accessor.path(), "property", false)?;
        let binding = rename.map_or_else(|| accessor.path().column_name(), str::to_string);

        Ok(Self {
            binding,
            kind,
            accessor,
        })
    }
}

impl<E, T> ColumnMapper<E> for PropertyMapper<E, T>
where
    E: Send + Sync,
    T: ColumnValue + Send + Sync,
{
    fn kind(&self) -> MapperKind {
        MapperKind::Property
    }

    fn binding_name(&self) -> &str {
        &self.binding
    }

    fn member_path(&self) -> &MemberPath {
        self.accessor.path()
    }

    fn column_kind(&self) -> ColumnKind {
        self.kind
    }

    fn get_value(&self, entity: &E) -> Result<Value, MappingError> {
        Ok(self
            .accessor
            .get(entity)
            .map_or(Value::Null, ColumnValue::to_value))
    }

    fn set_value(&self, entity: &mut E, value: &Value) -> Result<(), MappingError> {
        let parsed =
            T::from_value(value).ok_or_else(|| value_type_error(&self.binding, self.kind, value))?;

        if let Some(slot) = self.accessor.get_mut(entity) {
            *slot = parsed;
        }

        Ok(())
    }
}
