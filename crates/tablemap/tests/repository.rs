use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablemap::{StoreError, core::row::RowTypeCache, prelude::*};

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
struct Details {
    notes: String,
    priority: u8,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Task {
    project: String,
    id: String,
    title: String,
    done: Option<bool>,
    details: Details,
}

fn task(project: &str, id: &str, title: &str) -> Task {
    Task {
        project: project.to_string(),
        id: id.to_string(),
        title: title.to_string(),
        done: Some(false),
        details: Details {
            notes: format!("{title} notes"),
            priority: 1,
        },
    }
}

fn config() -> RuntimeMappingConfiguration<Task> {
    let mut mapping = TableMapping::<Task>::new().with_cache(Arc::new(RowTypeCache::new()));
    mapping
        .partition_key(member!(Task => project))
        .unwrap()
        .row_key(member!(Task => id))
        .unwrap()
        .property(member!(Task => title))
        .unwrap()
        .property(member!(Task => done))
        .unwrap()
        .content(member!(Task => details))
        .unwrap()
        .auto_key(KeyRole::RowKey, UlidKeyGenerator);

    mapping.get_configuration().unwrap()
}

fn repository() -> Repository<Task, MemoryTableStore> {
    Repository::new(config(), Arc::new(MemoryTableStore::new())).unwrap()
}

#[test]
fn opening_creates_the_type_named_table() {
    let repo = repository();

    assert_eq!(repo.table(), "Task");
    assert_eq!(repo.store().table_names(), ["Task"]);
}

#[test]
fn explicit_table_overrides_the_default() {
    let repo =
        Repository::with_table(config(), Arc::new(MemoryTableStore::new()), "Backlog").unwrap();

    assert_eq!(repo.table(), "Backlog");
    assert!(Repository::with_table(config(), Arc::new(MemoryTableStore::new()), "x").is_err());
}

#[test]
fn create_then_get_round_trips() {
    let repo = repository();
    let original = task("alpha", "t1", "write docs");

    let stored = repo.create(&original).unwrap();
    assert!(stored.etag().is_some());
    assert!(stored.timestamp().is_some());

    let loaded = repo.get("alpha", "t1").unwrap();
    assert_eq!(loaded, Some(original));
    assert_eq!(repo.get("alpha", "missing").unwrap(), None);
}

#[test]
fn create_rejects_existing_keys() {
    let repo = repository();
    repo.create(&task("alpha", "t1", "first")).unwrap();

    let err = repo.create(&task("alpha", "t1", "second")).unwrap_err();

    assert!(err.is_conflict());
    assert!(matches!(err, RepositoryError::Store(StoreError::Conflict { .. })));
}

#[test]
fn upsert_replaces_the_whole_row() {
    let repo = repository();
    repo.create(&task("alpha", "t1", "first")).unwrap();

    let mut replacement = task("alpha", "t1", "second");
    replacement.done = None;
    repo.upsert(&replacement).unwrap();

    let loaded = repo.get("alpha", "t1").unwrap().unwrap();
    assert_eq!(loaded.title, "second");
    assert_eq!(loaded.done, None);
}

#[test]
fn update_merges_non_null_columns() {
    let repo = repository();
    repo.create(&task("alpha", "t1", "first")).unwrap();

    let mut patch = task("alpha", "t1", "renamed");
    patch.done = None;
    repo.update(&patch, None).unwrap();

    let loaded = repo.get("alpha", "t1").unwrap().unwrap();
    assert_eq!(loaded.title, "renamed");
    assert_eq!(loaded.done, Some(false));
}

#[test]
fn update_honours_etag_preconditions() {
    let repo = repository();
    let stored = repo.create(&task("alpha", "t1", "first")).unwrap();
    let etag = stored.etag().unwrap().to_string();

    repo.update(&task("alpha", "t1", "second"), Some(&etag)).unwrap();

    let err = repo
        .update(&task("alpha", "t1", "third"), Some(&etag))
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Store(StoreError::PreconditionFailed { .. })
    ));

    repo.update(&task("alpha", "t1", "fourth"), Some("*")).unwrap();
    assert_eq!(repo.get("alpha", "t1").unwrap().unwrap().title, "fourth");
}

#[test]
fn update_of_a_missing_row_is_not_found() {
    let repo = repository();

    let err = repo.update(&task("alpha", "nope", "x"), None).unwrap_err();

    assert!(err.is_not_found());
}

#[test]
fn empty_row_keys_are_generated() {
    let repo = repository();

    let stored = repo.create(&task("alpha", "", "generated")).unwrap();
    let row_key = stored.row_key().unwrap().to_string();
    assert_eq!(row_key.len(), 26);

    let loaded = repo.get("alpha", &row_key).unwrap().unwrap();
    assert_eq!(loaded.id, row_key);
}

#[test]
fn keyless_entities_cannot_be_addressed() {
    let repo = repository();
    let keyless = task("alpha", "", "generated");
    repo.upsert(&keyless).unwrap();

    let err = repo.delete(&keyless, None).unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Store(StoreError::MissingKey { column: "RowKey" })
    ));

    let err = repo.update(&keyless, None).unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Store(StoreError::MissingKey { .. })
    ));

    assert_eq!(repo.store().row_count("Task"), 1);
}

#[test]
fn partitions_list_in_row_key_order() {
    let repo = repository();
    for (project, id) in [("beta", "b2"), ("alpha", "a2"), ("alpha", "a1"), ("beta", "b1")] {
        repo.create(&task(project, id, id)).unwrap();
    }

    let alpha: Vec<_> = repo
        .list_partition("alpha")
        .unwrap()
        .into_iter()
        .map(|t| t.id)
        .collect();
    assert_eq!(alpha, ["a1", "a2"]);

    let all: Vec<_> = repo.list_all().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(all, ["a1", "a2", "b1", "b2"]);
}

#[test]
fn delete_removes_by_entity_keys() {
    let repo = repository();
    let entity = task("alpha", "t1", "first");
    repo.create(&entity).unwrap();

    repo.delete(&entity, None).unwrap();

    assert_eq!(repo.get("alpha", "t1").unwrap(), None);
    assert!(repo.delete(&entity, None).unwrap_err().is_not_found());
    assert_eq!(repo.store().row_count("Task"), 0);
}

#[test]
fn repositories_share_one_store() {
    let store = Arc::new(MemoryTableStore::new());
    let writer = Repository::new(config(), Arc::clone(&store)).unwrap();
    let reader = Repository::new(config(), Arc::clone(&store)).unwrap();

    writer.create(&task("alpha", "t1", "shared")).unwrap();

    assert_eq!(reader.get("alpha", "t1").unwrap().unwrap().title, "shared");
}

#[derive(Clone, Debug, Default, PartialEq)]
struct PricedListing {
    shop: String,
    sku: String,
    price: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct CentsListing {
    shop: String,
    sku: String,
    price: Option<i64>,
}

#[test]
fn merging_over_an_incompatible_stored_column_fails() {
    let cache = Arc::new(RowTypeCache::new());
    let store = Arc::new(MemoryTableStore::new());

    let mut priced = TableMapping::<PricedListing>::new().with_cache(Arc::clone(&cache));
    priced
        .partition_key(member!(PricedListing => shop))
        .unwrap()
        .row_key(member!(PricedListing => sku))
        .unwrap()
        .property(member!(PricedListing => price))
        .unwrap();
    let mut cents = TableMapping::<CentsListing>::new().with_cache(cache);
    cents
        .partition_key(member!(CentsListing => shop))
        .unwrap()
        .row_key(member!(CentsListing => sku))
        .unwrap()
        .property(member!(CentsListing => price))
        .unwrap();

    let old = Repository::with_table(
        priced.get_configuration().unwrap(),
        Arc::clone(&store),
        "Listing",
    )
    .unwrap();
    let new =
        Repository::with_table(cents.get_configuration().unwrap(), Arc::clone(&store), "Listing")
            .unwrap();

    old.create(&PricedListing {
        shop: "north".to_string(),
        sku: "s1".to_string(),
        price: "9.99".to_string(),
    })
    .unwrap();

    let err = new
        .update(
            &CentsListing {
                shop: "north".to_string(),
                sku: "s1".to_string(),
                price: None,
            },
            None,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Store(StoreError::Merge { ref column, .. }) if column == "price"
    ));
    assert_eq!(old.get("north", "s1").unwrap().unwrap().price, "9.99");
}
