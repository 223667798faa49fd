use nbt_core::ops::DynamicOps;
use nbt_core::{convert, snbt, JsonOps, NbtOps, Tag};
use serde_json::json;

mod common;
use common::structure;

#[test]
fn tags_convert_to_plain_json() {
    let tag = snbt::read("{name: \"x\", flags: [B; 1B, 0B], scale: 0.5f, id: 3L, list: [{a: 1s}]}")
        .expect("snbt");
    let value = convert(&NbtOps, &JsonOps, &tag);
    assert_eq!(
        value,
        json!({"name": "x", "flags": [1, 0], "scale": 0.5, "id": 3, "list": [{"a": 1}]})
    );
}

#[test]
fn json_numbers_come_back_narrowest() {
    let value = json!({"small": 1, "short": 300, "int": 70000, "long": 5_000_000_000i64, "half": 0.5, "third": 0.1});
    let tag = convert(&JsonOps, &NbtOps, &value);
    let compound = tag.as_compound().expect("object becomes a compound");
    assert_eq!(compound.get("small"), Some(&Tag::Byte(1)));
    assert_eq!(compound.get("short"), Some(&Tag::Short(300)));
    assert_eq!(compound.get("int"), Some(&Tag::Int(70000)));
    assert_eq!(compound.get("long"), Some(&Tag::Long(5_000_000_000)));
    assert_eq!(compound.get("half"), Some(&Tag::Float(0.5)));
    assert_eq!(compound.get("third"), Some(&Tag::Double(0.1)));
}

#[test]
fn structure_survives_a_json_detour_in_shape() {
    let original = Tag::Compound(structure());
    let json = convert(&NbtOps, &JsonOps, &original);
    let back = convert(&JsonOps, &NbtOps, &json);
    let back = back.as_compound().expect("compound");

    assert_eq!(back.keys().collect::<Vec<_>>(), structure().keys().collect::<Vec<_>>());
    assert_eq!(back.get_int("DataVersion"), Some(4671));
    assert_eq!(back.get_list("blocks").map(|blocks| blocks.len()), Some(2));
    // Widths are lost: the int list comes back as a list of bytes.
    assert_eq!(
        back.get_list("size").map(|size| size.as_slice().to_vec()),
        Some(vec![Tag::Byte(1), Tag::Byte(1), Tag::Byte(2)])
    );
}

#[test]
fn snbt_reads_straight_into_json() {
    let value = snbt::read_with(&JsonOps, "{ok: true, n: [1, 2], s: 'q'}").expect("snbt");
    assert_eq!(value, json!({"ok": true, "n": [1, 2], "s": "q"}));
}

#[test]
fn map_builder_records_field_errors() {
    let ops = JsonOps;
    let mut builder = ops.map_builder();
    builder
        .add("a", ops.create_int(1))
        .add_result("b", Err(nbt_core::OpsError::wrong_shape("b is broken")));
    let err = builder.build(None).expect_err("one field failed");
    assert_eq!(err.message(), "b is broken");
    assert_eq!(err.partial(), Some(&json!({"a": 1})));
}
