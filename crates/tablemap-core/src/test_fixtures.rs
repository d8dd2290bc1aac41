use crate::{configurator::TableMapping, member, member::Member, row::RowTypeCache};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// Note
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub(crate) struct Note {
    #[serde(rename = "Text")]
    pub(crate) text: String,
}

impl Note {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

///
/// Address
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Address {
    pub(crate) city: String,
    pub(crate) zip: Option<String>,
}

///
/// Order
///

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Order {
    pub(crate) id: String,
    pub(crate) category: String,
    pub(crate) payload: Note,
    pub(crate) quantity: u32,
    pub(crate) weight: f64,
    pub(crate) placed_at: Option<DateTime<Utc>>,
    pub(crate) shipping: Option<Address>,
}

impl Order {
    pub(crate) fn sample() -> Self {
        Self {
            id: "o-1".to_string(),
            category: "books".to_string(),
            payload: Note::new("gift wrap"),
            quantity: 3,
            weight: 1.5,
            placed_at: None,
            shipping: Some(Address {
                city: "Lisbon".to_string(),
                zip: Some("1100".to_string()),
            }),
        }
    }
}

/// Mapping builder with a private row-type cache.
pub(crate) fn isolated<E: Send + Sync + 'static>() -> (TableMapping<E>, Arc<RowTypeCache>) {
    let cache = Arc::new(RowTypeCache::new());
    let mapping = TableMapping::new().with_cache(Arc::clone(&cache));

    (mapping, cache)
}

pub(crate) fn shipping_city() -> Member<Order, String> {
    member!(Order => shipping?).then(member!(Address => city))
}

/// Category/id keys, quantity property, JSON payload named `Payload`.
pub(crate) fn order_mapping() -> (TableMapping<Order>, Arc<RowTypeCache>) {
    let (mut mapping, cache) = isolated::<Order>();

    mapping
        .partition_key(member!(Order => category))
        .and_then(|m| m.row_key(member!(Order => id)))
        .and_then(|m| m.property(member!(Order => quantity)))
        .and_then(|m| m.content_as(member!(Order => payload), "Payload"))
        .expect("order mapping");

    (mapping, cache)
}
