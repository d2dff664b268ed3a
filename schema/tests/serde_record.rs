#![cfg(feature = "serde")]

use schema::{Field, FieldValue, FormatVersion, Record, SchemaError};

#[test]
fn record_from_json() {
    let json = r#"{
        "str": { "field": { "kind": { "text": { "len": 5, "terminated": false } }, "value": { "text": "hello" } } },
        "u16": { "field": { "kind": "u16", "value": { "u16": 65535 } } },
        "u8s": { "seq": [
            { "field": { "kind": "u8", "value": { "u8": 255 } } },
            { "field": { "kind": "u8" } }
        ] },
        "late": { "field": { "kind": "f32", "since": "3.5.0" } }
    }"#;
    let record: Record = serde_json::from_str(json).unwrap();

    let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["str", "u16", "u8s", "late"]);
    assert_eq!(record.field("str").and_then(Field::as_text), Some("hello"));
    assert_eq!(record.field("u16").and_then(Field::as_u16), Some(65535));
    assert_eq!(record.path_field("u8s.0").and_then(Field::as_u8), Some(255));
    assert_eq!(record.path_field("u8s.1").and_then(Field::as_u8), Some(0));
    assert_eq!(
        record.field("late").map(Field::min_version),
        Some(FormatVersion::new(3, 5, 0))
    );
}

#[test]
fn mismatched_value_is_rejected() {
    let json = r#"{ "kind": "u8", "value": { "u16": 1 } }"#;
    let err = serde_json::from_str::<Field>(json).unwrap_err();
    assert!(err.to_string().contains("type mismatch"));
}

#[test]
fn short_flag_vector_is_rejected() {
    let json = r#"{ "kind": { "flags": "w8" }, "value": { "flags": [true, false] } }"#;
    assert!(serde_json::from_str::<Field>(json).is_err());
}

#[test]
fn bad_version_string_is_rejected() {
    let json = r#"{ "kind": "u8", "since": "three" }"#;
    assert!(serde_json::from_str::<Field>(json).is_err());
    assert!(matches!(
        "three".parse::<FormatVersion>(),
        Err(SchemaError::InvalidVersion { .. })
    ));
}

#[test]
fn serialize_then_deserialize() {
    let mut record = Record::builder()
        .field("frame", Field::i32(-123))
        .field("name", Field::terminated_text(8).since(FormatVersion::new(3, 9, 0)))
        .build();
    record
        .set("name", FieldValue::Text("FOX".into()))
        .unwrap();
    let json = serde_json::to_string(&record).unwrap();
    let back: Record = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
}
