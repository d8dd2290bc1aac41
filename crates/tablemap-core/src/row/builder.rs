use crate::{
    MAX_BINDING_NAME_LEN,
    error::MappingError,
    mapper::{ColumnMapper, MapperSet},
    row::{ColumnDef, RowSignature, RowType, RowTypeCache, SYSTEM_COLUMNS, is_system_column},
    value::ColumnKind,
};
use std::{collections::HashMap, sync::Arc};

/// Return the row type for `mappers`, synthesizing and caching it on first use
/// of its signature.
///
/// Key mappers bind onto the system key columns; every other mapper adds one
/// data column after the system block, in registration order.
pub fn create_type<E>(
    cache: &RowTypeCache,
    mappers: &MapperSet<E>,
) -> Result<Arc<RowType>, MappingError> {
    let signature = RowSignature::of(mappers.get_all());

    cache.get_or_create(&signature, || synthesize(&signature, mappers.get_all()))
}

fn synthesize<E>(
    signature: &RowSignature,
    mappers: &[Arc<dyn ColumnMapper<E>>],
) -> Result<RowType, MappingError> {
    let mut columns: Vec<ColumnDef> = SYSTEM_COLUMNS
        .iter()
        .map(|(name, kind)| ColumnDef {
            name: (*name).to_string(),
            kind: *kind,
            system: true,
        })
        .collect();

    let mut bound = Vec::with_capacity(mappers.len());

    for mapper in mappers {
        let binding = mapper.binding_name();
        check_binding(binding)?;

        let kind = mapper.column_kind();
        if !kind.is_primitive() {
            return Err(MappingError::synthesis(format!(
                "column '{binding}' declares unsupported kind {kind}"
            )));
        }

        if bound.contains(&binding) {
            return Err(MappingError::synthesis(format!(
                "duplicate binding name '{binding}'"
            )));
        }
        bound.push(binding);

        match mapper.kind().key_role() {
            Some(role) => {
                if binding != role.column() || kind != ColumnKind::Text {
                    return Err(MappingError::synthesis(format!(
                        "{role} mapper must bind to text column '{}', found '{binding}' ({kind})",
                        role.column()
                    )));
                }
            }
            None => {
                if is_system_column(binding) {
                    return Err(MappingError::synthesis(format!(
                        "column '{binding}' collides with a system column"
                    )));
                }

                columns.push(ColumnDef {
                    name: binding.to_string(),
                    kind,
                    system: false,
                });
            }
        }
    }

    let slots: HashMap<String, usize> = columns
        .iter()
        .enumerate()
        .map(|(slot, column)| (column.name.clone(), slot))
        .collect();

    Ok(RowType {
        name: format!("Dynamic_{signature}"),
        signature: signature.clone(),
        columns,
        slots,
    })
}

fn check_binding(binding: &str) -> Result<(), MappingError> {
    if binding.is_empty() {
        return Err(MappingError::synthesis("empty binding name"));
    }

    if binding.len() > MAX_BINDING_NAME_LEN {
        return Err(MappingError::synthesis(format!(
            "binding name '{binding}' exceeds {MAX_BINDING_NAME_LEN} bytes"
        )));
    }

    Ok(())
}
