use super::*;

#[test]
fn put_returns_previous_value() {
    let mut compound = Compound::new();
    assert_eq!(compound.put("a", 1i32), None);
    assert_eq!(compound.put("a", "x"), Some(Tag::Int(1)));
    assert_eq!(compound.get_string("a"), Some("x"));
    assert_eq!(compound.len(), 1);
}

#[test]
fn keys_iterate_in_byte_order() {
    let mut compound = Compound::new();
    for key in ["b", "B", "a", "_"] {
        compound.put_byte(key, 0);
    }
    assert_eq!(compound.keys().collect::<Vec<_>>(), ["B", "_", "a", "b"]);
}

#[test]
fn numeric_getters_convert_any_number() {
    let mut compound = Compound::new();
    compound.put_double("d", 3.75);
    compound.put_long("l", 0x1_0000_0002);
    compound.put_string("s", "7");
    assert_eq!(compound.get_int("d"), Some(3));
    assert_eq!(compound.get_int("l"), Some(2));
    assert_eq!(compound.get_float("l"), Some(0x1_0000_0002_i64 as f32));
    assert_eq!(compound.get_int("s"), None);
    assert_eq!(compound.get_int_or("missing", 9), 9);
    assert_eq!(compound.get_short_or("s", -1), -1);
    assert_eq!(compound.get_byte_or("d", 0), 3);
    assert_eq!(compound.get_long_or("l", 0), 0x1_0000_0002);
    assert_eq!(compound.get_double_or("nothing", 0.5), 0.5);
    assert_eq!(compound.get_float_or("d", 0.0), 3.75);
}

#[test]
fn booleans_come_from_numbers() {
    let mut compound = Compound::new();
    compound.put_boolean("t", true);
    compound.put_int("wrap", 256);
    compound.put_string("s", "true");
    assert_eq!(compound.get_boolean("t"), Some(true));
    assert_eq!(compound.get_boolean("wrap"), Some(false));
    assert_eq!(compound.get_boolean("s"), None);
    assert!(compound.get_boolean_or("s", true));
}

#[test]
fn container_getters_are_kind_checked() {
    let mut compound = Compound::new();
    compound.put_int_array("ints", vec![1, 2]);
    compound.put_long_array("longs", vec![3]);
    compound.put_byte_array("bytes", vec![4]);
    compound.put("list", List::from(vec![Tag::Int(1)]));
    compound.put("inner", Compound::new());

    assert_eq!(compound.get_int_array("ints").map(IntArray::len), Some(2));
    assert!(compound.get_int_array("longs").is_none());
    assert_eq!(compound.get_long_array("longs").and_then(|a| a.get(0)), Some(3));
    assert_eq!(compound.get_byte_array("bytes").map(ByteArray::as_slice), Some(&[4i8][..]));
    assert!(compound.get_list("ints").is_none());
    assert!(compound.get_list("list").is_some());
    assert!(compound.contains_kind("inner", TagKind::Compound));
    assert!(!compound.contains_kind("inner", TagKind::List));

    compound
        .get_compound_mut("inner")
        .expect("inner")
        .put_string("name", "x");
    compound.get_list_mut("list").expect("list").push(Tag::Int(2));
    assert_eq!(
        compound.get_compound("inner").and_then(|c| c.get_string("name")),
        Some("x")
    );
    assert_eq!(compound.get_list("list").map(List::len), Some(2));
    assert_eq!(compound.get_string_or("inner", "none"), "none");
}

#[test]
fn copy_from_merges_nested_compounds() {
    let mut target = crate::snbt::read_compound("{a: 1, nested: {x: 1, y: 2}, list: [1]}")
        .expect("target");
    let source = crate::snbt::read_compound("{b: 2, nested: {y: 3, z: 4}, list: [2, 3]}")
        .expect("source");
    target.copy_from(&source);
    let expected = crate::snbt::read_compound(
        "{a: 1, b: 2, nested: {x: 1, y: 3, z: 4}, list: [2, 3]}",
    )
    .expect("expected");
    assert_eq!(target, expected);

    // A non-compound source value replaces a compound.
    let mut replaced = crate::snbt::read_compound("{k: {x: 1}}").expect("replaced");
    replaced.copy_from(&crate::snbt::read_compound("{k: 5}").expect("source"));
    assert_eq!(replaced.get_int("k"), Some(5));
}

#[test]
fn remove_contains_and_clear() {
    let mut compound: Compound = [("a".to_string(), Tag::Int(1)), ("b".to_string(), Tag::Int(2))]
        .into_iter()
        .collect();
    assert!(compound.contains("a"));
    assert_eq!(compound.remove("a"), Some(Tag::Int(1)));
    assert!(!compound.contains("a"));
    compound.extend([("c".to_string(), Tag::Int(3))]);
    assert_eq!(compound.values().count(), 2);
    compound.clear();
    assert!(compound.is_empty());
}
