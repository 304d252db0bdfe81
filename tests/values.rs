use grimoire::{Object, Value};
use serde_json::json;

#[test]
fn test_truthiness() {
    assert!(!Value::Null.is_truthy());
    assert!(Value::Bool(true).is_truthy());
    assert!(!Value::Bool(false).is_truthy());
    assert!(Value::Int(1).is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::Float(0.0).is_truthy());
    assert!(Value::from("x").is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(!Value::Array(vec![]).is_truthy());
    assert!(Value::Array(vec![Value::Null]).is_truthy());
    assert!(!Value::Object(Object::new()).is_truthy());
}

#[test]
fn test_numeric_equality_across_variants() {
    assert_eq!(Value::Int(2), Value::UInt(2));
    assert_eq!(Value::Int(2), Value::Float(2.0));
    assert_eq!(Value::UInt(2), Value::Float(2.0));
    assert_ne!(Value::Int(-1), Value::UInt(u64::MAX));
    assert_ne!(Value::Int(2), Value::from("2"));
    assert_ne!(Value::Int(0), Value::Bool(false));
}

#[test]
fn test_ordering() {
    assert!(Value::Int(1) < Value::Int(2));
    assert!(Value::Int(1) < Value::Float(1.5));
    assert!(Value::UInt(3) > Value::Int(2));
    assert!(Value::Int(-1) < Value::UInt(0));
    assert!(Value::from("a") < Value::from("b"));
    assert!(Value::from("a").partial_cmp(&Value::Int(1)).is_none());
}

#[test]
fn test_display_forms() {
    assert_eq!(Value::Null.to_string(), "");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::UInt(u64::MAX).to_string(), "18446744073709551615");
    assert_eq!(Value::Float(1.0).to_string(), "1.0");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::from("hi").to_string(), "hi");
    assert_eq!(
        Value::Array(vec![Value::Int(1), Value::from("a"), Value::Null]).to_string(),
        "[1,\"a\",null]"
    );
}

#[test]
fn test_dump_escapes_strings() {
    assert_eq!(Value::from("a\"b\\c\nd").dump(), "\"a\\\"b\\\\c\\nd\"");
}

#[test]
fn test_object_order_is_insertion_order() {
    let mut object = Object::new();
    object.insert("zebra".to_string(), Value::Int(1));
    object.insert("alpha".to_string(), Value::Int(2));
    assert_eq!(Value::Object(object).dump(), "{\"zebra\":1,\"alpha\":2}");
}

#[test]
fn test_json_conversion_round_trip() {
    let json = json!({
        "z": 1,
        "a": [true, null, 2.5, "s"],
        "big": 18446744073709551615u64
    });
    let value = Value::from(&json);
    assert_eq!(
        value.dump(),
        "{\"z\":1,\"a\":[true,null,2.5,\"s\"],\"big\":18446744073709551615}"
    );

    let back: serde_json::Value = value.into();
    assert_eq!(back, json);
}
