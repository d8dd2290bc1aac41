use super::*;
use chrono::TimeZone;

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
}

// ---- kinds -----------------------------------------------------------

#[test]
fn kind_table_covers_primitives_and_optionals() {
    assert_eq!(ColumnKind::of::<String>(), Some(ColumnKind::Text));
    assert_eq!(ColumnKind::of::<Option<u16>>(), Some(ColumnKind::Uint));
    assert_eq!(ColumnKind::of::<i32>(), Some(ColumnKind::Int));
    assert_eq!(ColumnKind::of::<f32>(), Some(ColumnKind::Float64));
    assert_eq!(ColumnKind::of::<Vec<u8>>(), Some(ColumnKind::Blob));
    assert_eq!(ColumnKind::of::<DateTime<Utc>>(), Some(ColumnKind::Timestamp));
    assert_eq!(ColumnKind::of::<Ulid>(), Some(ColumnKind::Ulid));

    assert_eq!(ColumnKind::of::<Vec<String>>(), None);
    assert_eq!(ColumnKind::of::<Option<Vec<u16>>>(), None);
}

#[test]
fn only_lossless_kinds_are_keyable() {
    assert!(ColumnKind::Text.is_keyable());
    assert!(ColumnKind::Ulid.is_keyable());
    assert!(!ColumnKind::Float64.is_keyable());
    assert!(!ColumnKind::Blob.is_keyable());
    assert!(!ColumnKind::Structured.is_primitive());
}

// ---- values ----------------------------------------------------------

#[test]
fn null_fits_every_column() {
    assert!(Value::Null.fits(ColumnKind::Int));
    assert!(Value::Int(1).fits(ColumnKind::Int));
    assert!(!Value::Int(1).fits(ColumnKind::Uint));
}

#[test]
fn empty_keys_are_null_or_empty_text() {
    assert!(Value::Null.is_empty_key());
    assert!(Value::from("").is_empty_key());
    assert!(!Value::from("k").is_empty_key());
    assert!(!Value::Int(0).is_empty_key());
}

#[test]
fn key_text_round_trips_for_keyable_kinds() {
    let ulid = Ulid::from_parts(1_700_000_000_000, 42);
    let cases = [
        Value::Bool(true),
        Value::Int(-7),
        Value::Uint(7),
        Value::from("abc"),
        Value::Timestamp(ts()),
        Value::Ulid(ulid),
    ];

    for value in cases {
        let kind = value.kind().unwrap();
        let text = value.to_key_text().unwrap();

        assert_eq!(Value::parse_key(kind, &text), Some(value));
    }
}

#[test]
fn timestamps_render_as_rfc3339() {
    assert_eq!(
        Value::Timestamp(ts()).to_key_text().as_deref(),
        Some("2025-01-02T03:04:05Z")
    );
}

#[test]
fn lossy_kinds_have_no_key_text() {
    assert_eq!(Value::Float64(1.5).to_key_text(), None);
    assert_eq!(Value::Blob(vec![1]).to_key_text(), None);
    assert_eq!(Value::Null.to_key_text(), None);
    assert_eq!(Value::parse_key(ColumnKind::Int, "seven"), None);
}

// ---- conversions -----------------------------------------------------

#[test]
fn narrow_integers_widen_and_narrow_checked() {
    assert_eq!(7u8.to_value(), Value::Uint(7));
    assert_eq!(u8::from_value(&Value::Uint(300)), None);
    assert_eq!(i16::from_value(&Value::Int(-5)), Some(-5));
    assert_eq!(i16::from_value(&Value::Uint(5)), None);
}

#[test]
fn options_map_none_to_null() {
    assert_eq!(None::<String>.to_value(), Value::Null);
    assert_eq!(Option::<String>::from_value(&Value::Null), Some(None));
    assert_eq!(
        Option::<String>::from_value(&Value::from("x")),
        Some(Some("x".to_string()))
    );
    assert_eq!(Option::<String>::kind(), ColumnKind::Text);
}

#[test]
fn mismatched_variants_do_not_convert() {
    assert_eq!(String::from_value(&Value::Int(1)), None);
    assert_eq!(bool::from_value(&Value::from("true")), None);
    assert_eq!(Vec::<u8>::from_value(&Value::Blob(vec![1, 2])), Some(vec![1, 2]));
}
