use serde_json::json;

use super::*;
use crate::ops::{convert, NbtOps, OpsErrorKind};
use crate::tag::Tag;

#[test]
fn primitives_map_to_json() {
    let ops = JsonOps;
    assert_eq!(ops.create_byte(3), json!(3));
    assert_eq!(ops.create_float(0.5), json!(0.5));
    assert_eq!(ops.create_boolean(false), json!(false));
    assert_eq!(ops.create_string("hi"), json!("hi"));
    assert_eq!(ops.empty(), Value::Null);
}

#[test]
fn numbers_and_booleans_read_back() {
    let ops = JsonOps;
    assert_eq!(ops.get_number_value(&json!(7)).expect("int"), Number::Long(7));
    assert_eq!(
        ops.get_number_value(&json!(1.25)).expect("float"),
        Number::Double(1.25)
    );
    assert_eq!(ops.get_number_value(&json!(true)).expect("bool"), Number::Byte(1));
    assert!(ops.get_boolean_value(&json!(0)).is_ok_and(|value| !value));
    assert_eq!(ops.get_string_value(&json!(12)).expect("number text"), "12");
    assert!(ops.get_string_value(&json!(null)).is_err());
}

#[test]
fn merges_follow_the_tag_rules() {
    let ops = JsonOps;
    let list = ops
        .merge_to_list_all(Value::Null, vec![json!(1), json!("a")])
        .expect("null starts a list");
    assert_eq!(list, json!([1, "a"]));

    let err = ops
        .merge_to_list(json!({}), json!(1))
        .expect_err("object is not a list");
    assert_eq!(err.partial(), Some(&json!({})));

    let err = ops
        .merge_to_map(json!({"a": 1}), json!(2), json!("v"))
        .expect_err("number key");
    assert_eq!(err.kind(), OpsErrorKind::NonStringKey);
    assert_eq!(err.partial(), Some(&json!({"a": 1})));
    assert_eq!(err.offending_keys(), &[json!(2)]);
}

#[test]
fn non_string_key_leaves_null_base_untouched() {
    let ops = JsonOps;
    let err = ops
        .merge_to_map(Value::Null, json!(5), json!("v"))
        .expect_err("number key");
    assert_eq!(err.kind(), OpsErrorKind::NonStringKey);
    assert_eq!(err.partial(), Some(&Value::Null));
    assert_eq!(err.offending_keys(), &[json!(5)]);

    let merged = ops
        .merge_to_map(Value::Null, json!("k"), json!(1))
        .expect("null starts a map");
    assert_eq!(merged, json!({"k": 1}));
}

#[test]
fn narrowest_kind_on_the_way_in() {
    let value = json!({
        "byte": 100,
        "short": 1000,
        "int": 100000,
        "long": 10000000000i64,
        "float": 0.5,
        "double": 0.1,
        "flag": true,
    });
    let tag = convert(&JsonOps, &NbtOps, &value);
    let compound = tag.as_compound().expect("object becomes compound");

    assert_eq!(compound.get("byte"), Some(&Tag::Byte(100)));
    assert_eq!(compound.get("short"), Some(&Tag::Short(1000)));
    assert_eq!(compound.get("int"), Some(&Tag::Int(100_000)));
    assert_eq!(compound.get("long"), Some(&Tag::Long(10_000_000_000)));
    assert_eq!(compound.get("float"), Some(&Tag::Float(0.5)));
    assert_eq!(compound.get("double"), Some(&Tag::Double(0.1)));
    assert_eq!(compound.get("flag"), Some(&Tag::Byte(1)));
}

#[test]
fn remove_only_touches_objects() {
    let ops = JsonOps;
    assert_eq!(ops.remove(&json!({"a": 1, "b": 2}), "a"), json!({"b": 2}));
    assert_eq!(ops.remove(&json!([1]), "a"), json!([1]));
}
