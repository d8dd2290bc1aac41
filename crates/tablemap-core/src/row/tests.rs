use super::*;
use crate::{
    error::MappingErrorKind,
    mapper::{ColumnMapper, MapperKind},
    member,
    member::MemberPath,
    test_fixtures::{Order, isolated, order_mapping},
};
use std::thread;

///
/// FixedColumn
///
/// Custom mapper with a configurable binding, kind and role.
///

struct FixedColumn {
    kind: MapperKind,
    binding: &'static str,
    column_kind: ColumnKind,
    path: MemberPath,
}

impl FixedColumn {
    fn new(kind: MapperKind, binding: &'static str, column_kind: ColumnKind) -> Self {
        Self {
            kind,
            binding,
            column_kind,
            path: MemberPath::parse(&format!("fixed.{}", binding.to_lowercase())).unwrap(),
        }
    }
}

impl ColumnMapper<Order> for FixedColumn {
    fn kind(&self) -> MapperKind {
        self.kind
    }

    fn binding_name(&self) -> &str {
        self.binding
    }

    fn member_path(&self) -> &MemberPath {
        &self.path
    }

    fn column_kind(&self) -> ColumnKind {
        self.column_kind
    }

    fn get_value(&self, _: &Order) -> Result<Value, MappingError> {
        Ok(Value::Null)
    }

    fn set_value(&self, _: &mut Order, _: &Value) -> Result<(), MappingError> {
        Ok(())
    }
}

fn synthesis_error(mapping: &crate::configurator::TableMapping<Order>) -> MappingError {
    let err = mapping.get_configuration().expect_err("synthesis should fail");
    assert_eq!(err.kind(), MappingErrorKind::TypeSynthesis, "{err}");

    err
}

//
// signature
//

#[test]
fn signatures_are_deterministic() {
    let pairs = vec![
        ("PartitionKey".to_string(), ColumnKind::Text),
        ("qty".to_string(), ColumnKind::Uint),
    ];

    let a = RowSignature::new(pairs.clone());
    let b = RowSignature::new(pairs);

    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn signatures_differ_by_name_kind_and_order() {
    let base = RowSignature::new(vec![
        ("a".to_string(), ColumnKind::Text),
        ("b".to_string(), ColumnKind::Int),
    ]);
    let renamed = RowSignature::new(vec![
        ("a".to_string(), ColumnKind::Text),
        ("c".to_string(), ColumnKind::Int),
    ]);
    let retyped = RowSignature::new(vec![
        ("a".to_string(), ColumnKind::Text),
        ("b".to_string(), ColumnKind::Uint),
    ]);
    let reordered = RowSignature::new(vec![
        ("b".to_string(), ColumnKind::Int),
        ("a".to_string(), ColumnKind::Text),
    ]);

    assert_ne!(base, renamed);
    assert_ne!(base, retyped);
    assert_ne!(base, reordered);
}

#[test]
fn binding_boundaries_are_part_of_the_signature() {
    let split_early = RowSignature::new(vec![
        ("ab".to_string(), ColumnKind::Text),
        ("c".to_string(), ColumnKind::Text),
    ]);
    let split_late = RowSignature::new(vec![
        ("a".to_string(), ColumnKind::Text),
        ("bc".to_string(), ColumnKind::Text),
    ]);

    assert_ne!(split_early.digest(), split_late.digest());
}

//
// row type layout
//

#[test]
fn system_columns_lead_every_row_type() {
    let (mapping, cache) = order_mapping();
    let row_type = create_type(&cache, mapping.mappers()).unwrap();

    let names: Vec<_> = row_type.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [PARTITION_KEY, ROW_KEY, TIMESTAMP, ETAG, "quantity", "Payload"]
    );

    let data: Vec<_> = row_type.data_columns().map(|c| c.kind).collect();
    assert_eq!(data, [ColumnKind::Uint, ColumnKind::Text]);

    assert!(row_type.name().starts_with("Dynamic_"));
    assert_eq!(row_type.slot("Payload"), Some(5));
}

#[test]
fn duplicate_bindings_fail_synthesis() {
    let (mut mapping, cache) = order_mapping();
    mapping.property_as(member!(Order => weight), "quantity").unwrap();

    let err = synthesis_error(&mapping);

    assert!(err.to_string().contains("duplicate binding name 'quantity'"));
    assert!(cache.is_empty());
}

#[test]
fn data_columns_cannot_shadow_system_columns() {
    let (mut mapping, _) = order_mapping();
    mapping.property_as(member!(Order => weight), TIMESTAMP).unwrap();

    let err = synthesis_error(&mapping);

    assert!(err.to_string().contains("system column"));
}

#[test]
fn binding_names_must_be_non_empty_and_bounded() {
    let (mut empty, _) = order_mapping();
    empty.property_as(member!(Order => weight), "").unwrap();
    synthesis_error(&empty);

    let long = "w".repeat(crate::MAX_BINDING_NAME_LEN + 1);
    let (mut too_long, _) = order_mapping();
    too_long.property_as(member!(Order => weight), &long).unwrap();
    synthesis_error(&too_long);
}

#[test]
fn structured_columns_fail_synthesis() {
    let (mut mapping, _) = order_mapping();
    mapping
        .custom(FixedColumn::new(MapperKind::Custom, "Blobby", ColumnKind::Structured))
        .unwrap();

    synthesis_error(&mapping);
}

#[test]
fn key_mappers_must_bind_their_system_column() {
    let (mut mapping, _) = isolated::<Order>();
    mapping
        .custom(FixedColumn::new(MapperKind::PartitionKey, "Tenant", ColumnKind::Text))
        .unwrap()
        .row_key(member!(Order => id))
        .unwrap();

    let err = synthesis_error(&mapping);

    assert!(err.to_string().contains("partition key"));
}

//
// cache
//

#[test]
fn cache_counts_hits_and_misses() {
    let (mapping, cache) = order_mapping();

    let first = create_type(&cache, mapping.mappers()).unwrap();
    let second = create_type(&cache, mapping.mappers()).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(
        cache.stats(),
        CacheStats {
            hits: 1,
            misses: 1,
            size: 1,
        }
    );

    cache.clear();
    assert_eq!(cache.stats().size, 0);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn failed_synthesis_is_not_cached() {
    let (mut mapping, cache) = order_mapping();
    mapping.property_as(member!(Order => weight), ETAG).unwrap();

    assert!(create_type(&cache, mapping.mappers()).is_err());
    assert!(create_type(&cache, mapping.mappers()).is_err());
    assert_eq!(cache.stats().misses, 2);
    assert!(cache.is_empty());
}

#[test]
fn concurrent_creation_converges_on_one_type() {
    let cache = RowTypeCache::new();

    let types: Vec<Arc<RowType>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let (mapping, _) = order_mapping();
                    create_type(&cache, mapping.mappers()).unwrap()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(types.iter().all(|t| Arc::ptr_eq(t, &types[0])));
    assert_eq!(cache.len(), 1);
}

#[test]
fn global_cache_is_shared() {
    assert!(Arc::ptr_eq(&RowTypeCache::global(), &RowTypeCache::global()));
}

//
// row values
//

#[test]
fn rows_check_column_names_and_kinds() {
    let (mapping, _) = order_mapping();
    let config = mapping.get_configuration().unwrap();
    let mut row = config.new_row();

    let err = row.set("missing", Value::Int(1)).unwrap_err();
    assert_eq!(err.kind(), MappingErrorKind::UnknownColumn);

    let err = row.set("quantity", Value::from("three")).unwrap_err();
    assert_eq!(err.kind(), MappingErrorKind::ValueType);

    row.set("quantity", Value::Uint(3)).unwrap();
    row.set("quantity", Value::Null).unwrap();
    assert_eq!(row.get("quantity"), Some(&Value::Null));
}

#[test]
fn system_fields_have_typed_accessors() {
    let (mapping, _) = order_mapping();
    let config = mapping.get_configuration().unwrap();
    let mut row = config.new_row();

    let now = chrono::Utc::now();
    row.set_timestamp(now);
    row.set_etag("W/\"1\"");

    assert_eq!(row.timestamp(), Some(now));
    assert_eq!(row.etag(), Some("W/\"1\""));
    assert_eq!(row.iter().count(), row.row_type().columns().len());
}
