use super::*;
use crate::{
    error::MappingErrorKind,
    test_fixtures::{Address, Order, shipping_city},
};

fn shape_reason(expr: &str) -> String {
    match MemberPath::parse(expr) {
        Err(MappingError::ExpressionShape { reason, .. }) => reason,
        other => panic!("expected ExpressionShape for {expr:?}, got {other:?}"),
    }
}

// ---- path parsing ----------------------------------------------------

#[test]
fn dotted_paths_parse_into_segments() {
    let path = MemberPath::parse(" customer.address.city ").unwrap();

    assert_eq!(path.segments(), ["customer", "address", "city"]);
    assert_eq!(path.to_string(), "customer.address.city");
    assert_eq!(path.column_name(), "customer_address_city");
    assert_eq!(path.leaf(), "city");
    assert!(path.is_nested());
}

#[test]
fn computed_expressions_are_rejected_with_a_reason() {
    assert!(shape_reason("name()").contains("method calls"));
    assert!(shape_reason("items[0]").contains("indexing"));
    assert!(shape_reason("price+tax").contains("operators"));
    assert!(shape_reason("a b").contains("whitespace"));
    assert!(shape_reason("a..b").contains("empty path segment"));
    assert!(shape_reason("").contains("empty member expression"));
    assert!(shape_reason("9lives").contains("digit"));
    assert!(shape_reason("a$b").contains("not a member name"));
}

#[test]
fn join_appends_child_segments() {
    let parent = MemberPath::parse("shipping").unwrap();
    let child = MemberPath::parse("city").unwrap();

    assert_eq!(parent.join(&child), MemberPath::parse("shipping.city").unwrap());
}

// ---- accessors -------------------------------------------------------

#[test]
fn absent_intermediates_read_as_none() {
    let accessor = shipping_city().resolve().unwrap();

    assert_eq!(accessor.get(&Order::default()), None);
    assert_eq!(
        accessor.get(&Order::sample()).map(String::as_str),
        Some("Lisbon")
    );
}

#[test]
fn writes_materialize_intermediates() {
    let accessor = shipping_city().resolve().unwrap();
    let mut order = Order::default();

    *accessor.get_mut(&mut order).unwrap() = "Porto".to_string();

    assert_eq!(
        order.shipping,
        Some(Address {
            city: "Porto".to_string(),
            zip: None,
        })
    );
}

#[test]
fn composition_through_read_only_is_read_only() {
    let shipping = Member::<Order, Address>::read_only("shipping", |o: &Order| o.shipping.as_ref());
    let accessor = shipping.then(crate::member!(Address => city)).resolve().unwrap();

    assert!(!accessor.is_writable());
    assert_eq!(accessor.path().to_string(), "shipping.city");

    let err = accessor.require_writable().unwrap_err();
    assert_eq!(err.kind(), MappingErrorKind::ExpressionShape);
}

#[test]
fn invalid_expressions_fail_at_resolve() {
    let bogus =
        Member::<Order, String>::field("id()", |o: &Order| &o.id, |o: &mut Order| &mut o.id);

    let err = bogus.resolve().unwrap_err();

    assert_eq!(err.kind(), MappingErrorKind::ExpressionShape);
}

// ---- type checks -----------------------------------------------------

#[test]
fn keys_require_keyable_kinds() {
    let path = MemberPath::parse("weight").unwrap();

    assert!(check_column_type::<f64>(&path, "row key", true).is_err());
    assert_eq!(
        check_column_type::<f64>(&path, "property", false).unwrap(),
        ColumnKind::Float64
    );
}

#[test]
fn content_requires_complex_members() {
    let path = MemberPath::parse("payload").unwrap();

    assert!(check_content_type::<Address>(&path).is_ok());
    assert!(check_content_type::<Vec<Address>>(&path).is_ok());
    assert!(check_content_type::<String>(&path).is_err());
    assert!(check_content_type::<Option<i64>>(&path).is_err());
}
