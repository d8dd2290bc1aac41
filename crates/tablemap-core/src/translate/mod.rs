//! Compiled entity <-> row copy plans.
//!
//! Plans are built once per configuration from the mapper set and row type.
//! Each step already knows its row slot, so translating an entity never looks
//! a column up by name. Plans are immutable and shared freely across threads.


use crate::{
    error::MappingError,
    key::{AutoKey, KeyContext},
    mapper::{ColumnMapper, MapperSet},
    row::{Row, RowType},
    value::Value,
};
use chrono::{DateTime, Utc};
use std::{fmt, sync::Arc};

///
/// Step
///

struct Step<E> {
    slot: usize,
    mapper: Arc<dyn ColumnMapper<E>>,
}

impl<E> Clone for Step<E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot,
            mapper: Arc::clone(&self.mapper),
        }
    }
}

fn compile<'a, E: 'a>(
    mappers: impl Iterator<Item = &'a Arc<dyn ColumnMapper<E>>>,
    row_type: &RowType,
) -> Result<Vec<Step<E>>, MappingError> {
    mappers
        .map(|mapper| {
            let slot =
                row_type
                    .slot(mapper.binding_name())
                    .ok_or_else(|| MappingError::UnknownColumn {
                        name: mapper.binding_name().to_string(),
                        row_type: row_type.name().to_string(),
                    })?;

            Ok(Step {
                slot,
                mapper: Arc::clone(mapper),
            })
        })
        .collect()
}

///
/// EntitySerializer
///
/// Entity -> row plan covering every mapper.
///

pub struct EntitySerializer<E> {
    row_type: Arc<RowType>,
    steps: Vec<Step<E>>,
    auto_key: Option<AutoKey<E>>,
}

impl<E> EntitySerializer<E> {
    #[must_use]
    pub const fn row_type(&self) -> &Arc<RowType> {
        &self.row_type
    }

    /// Translate `entity` into a new row, using the current time for
    /// generated keys.
    pub fn serialize(&self, entity: &E) -> Result<Row, MappingError> {
        self.serialize_at(entity, Utc::now())
    }

    /// Translate `entity` into a new row. `now` is handed to the auto-key
    /// generator when the mapped key is null or empty.
    pub fn serialize_at(&self, entity: &E, now: DateTime<Utc>) -> Result<Row, MappingError> {
        self.translate(entity, Some(now))
    }

    /// Translate an entity that is already stored. The auto-key generator is
    /// never consulted, so unset keys stay empty.
    pub fn serialize_existing(&self, entity: &E) -> Result<Row, MappingError> {
        self.translate(entity, None)
    }

    fn translate(&self, entity: &E, now: Option<DateTime<Utc>>) -> Result<Row, MappingError> {
        let mut row = Row::new(Arc::clone(&self.row_type));

        for step in &self.steps {
            let mut value = step.mapper.get_value(entity)?;

            if value.is_empty_key()
                && let Some(now) = now
                && let Some(role) = step.mapper.kind().key_role()
                && let Some(auto) = self.auto_key.as_ref().filter(|auto| auto.role() == role)
            {
                let context = KeyContext {
                    role,
                    binding: role.column(),
                    timestamp: now,
                };
                value = Value::Text(auto.generate(entity, &context));
                tracing::trace!(role = %role, "generated key for unset key member");
            }

            let kind = step.mapper.column_kind();
            if !value.fits(kind) {
                return Err(MappingError::ValueType {
                    binding: step.mapper.binding_name().to_string(),
                    expected: kind,
                    found: value.label().to_string(),
                });
            }

            row.set_slot(step.slot, value);
        }

        Ok(row)
    }
}

impl<E> Clone for EntitySerializer<E> {
    fn clone(&self) -> Self {
        Self {
            row_type: Arc::clone(&self.row_type),
            steps: self.steps.clone(),
            auto_key: self.auto_key.clone(),
        }
    }
}

impl<E> fmt::Debug for EntitySerializer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySerializer")
            .field("row_type", &self.row_type.name())
            .field("steps", &self.steps.len())
            .field("auto_key", &self.auto_key)
            .finish()
    }
}

///
/// EntityDeserializer
///
/// Row -> entity plan covering the writable mappers only.
///

pub struct EntityDeserializer<E> {
    row_type: Arc<RowType>,
    steps: Vec<Step<E>>,
}

impl<E> EntityDeserializer<E> {
    #[must_use]
    pub const fn row_type(&self) -> &Arc<RowType> {
        &self.row_type
    }

    /// Build a fresh entity from `row`.
    pub fn deserialize(&self, row: &Row) -> Result<E, MappingError>
    where
        E: Default,
    {
        let mut entity = E::default();
        self.deserialize_into(row, &mut entity)?;

        Ok(entity)
    }

    /// Copy `row` into an existing entity. Null columns leave the member
    /// untouched; intermediate segments are materialized on write.
    pub fn deserialize_into(&self, row: &Row, entity: &mut E) -> Result<(), MappingError> {
        self.check_shape(row)?;

        for step in &self.steps {
            let value = row.slot_value(step.slot);
            if value.is_null() {
                continue;
            }

            step.mapper.set_value(entity, value)?;
        }

        Ok(())
    }

    fn check_shape(&self, row: &Row) -> Result<(), MappingError> {
        let found = row.row_type();

        if Arc::ptr_eq(found, &self.row_type) || found.signature() == self.row_type.signature() {
            Ok(())
        } else {
            Err(MappingError::RowShape {
                expected: self.row_type.name().to_string(),
                found: found.name().to_string(),
            })
        }
    }
}

impl<E> Clone for EntityDeserializer<E> {
    fn clone(&self) -> Self {
        Self {
            row_type: Arc::clone(&self.row_type),
            steps: self.steps.clone(),
        }
    }
}

impl<E> fmt::Debug for EntityDeserializer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityDeserializer")
            .field("row_type", &self.row_type.name())
            .field("steps", &self.steps.len())
            .finish()
    }
}

///
/// BUILDERS
///

/// Compile the entity -> row plan for `mappers` against `row_type`.
pub fn build_serializer<E>(
    mappers: &MapperSet<E>,
    row_type: Arc<RowType>,
    auto_key: Option<AutoKey<E>>,
) -> Result<EntitySerializer<E>, MappingError> {
    let steps = compile(mappers.get_all().iter(), &row_type)?;

    Ok(EntitySerializer {
        row_type,
        steps,
        auto_key,
    })
}

/// Compile the row -> entity plan for the writable subset of `mappers`.
pub fn build_deserializer<E>(
    mappers: &MapperSet<E>,
    row_type: Arc<RowType>,
) -> Result<EntityDeserializer<E>, MappingError> {
    let writable = mappers.get_all().iter().filter(|mapper| mapper.is_writable());
    let steps = compile(writable, &row_type)?;

    Ok(EntityDeserializer { row_type, steps })
}
