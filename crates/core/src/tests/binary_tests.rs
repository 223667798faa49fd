use super::*;
use crate::error::NbtError;
use crate::snbt;

fn compound(src: &str) -> Compound {
    snbt::read_compound(src).expect("fixture should parse")
}

fn format_error(input: &[u8]) -> String {
    match from_bytes(input, SizeTracker::default()) {
        Err(NbtError::BinaryFormat(message)) => message,
        other => panic!("expected a format error, got {other:?}"),
    }
}

#[test]
fn named_root_layout() {
    let bytes = to_bytes(&compound("{a: 1b}")).expect("encode");
    assert_eq!(bytes, [0x0A, 0, 0, 0x01, 0, 1, b'a', 0x01, 0x00]);
}

#[test]
fn unnamed_root_layout() {
    let mut out = Vec::new();
    write_unnamed(&mut out, &Tag::Int(5)).expect("encode");
    assert_eq!(out, [0x03, 0, 0, 0, 5]);
    let tag = read_unnamed(&out, &mut SizeTracker::default()).expect("decode");
    assert_eq!(tag, Tag::Int(5));

    let mut out = Vec::new();
    write_named(&mut out, "ignored", &Tag::End).expect("encode");
    assert_eq!(out, [0x00]);
    let (name, tag) = read_named(&out, &mut SizeTracker::default()).expect("decode");
    assert_eq!((name.as_str(), tag), ("", Tag::End));
}

#[test]
fn every_kind_survives() {
    let original = compound(
        "{b: -1b, s: 300s, i: -70000, l: 1L, f: 0.5f, d: -0.25d, str: \"h\\u00e9llo\", \
         ba: [B; 1b, -2b], ia: [I; 7, -8], la: [L; 9L], list: [[1], [2, 3]], \
         nested: {deeper: {x: \"y\"}}, empty: [], none: {}}",
    );
    let bytes = to_bytes(&original).expect("encode");
    assert_eq!(from_bytes(&bytes, SizeTracker::default()).expect("decode"), original);
}

#[test]
fn mixed_lists_are_wrapped() {
    let original = compound("{mixed: [1, \"x\", {a: 1}], shaped: [{\"\": 5}, {b: 2}]}");
    let bytes = to_bytes(&original).expect("encode");
    assert_eq!(from_bytes(&bytes, SizeTracker::default()).expect("decode"), original);

    let mut out = Vec::new();
    write_unnamed(&mut out, &snbt::read("[1, \"x\"]").expect("list")).expect("encode");
    assert_eq!(
        out,
        [
            0x09, 0x0A, 0, 0, 0, 2, // compound list of two
            0x03, 0, 0, 0, 0, 0, 1, 0x00, // {"": 1}
            0x08, 0, 0, 0, 1, b'x', 0x00, // {"": "x"}
        ]
    );
}

#[test]
fn modified_utf8() {
    assert_eq!(encode_modified_utf8("\0"), [0xC0, 0x80]);
    assert_eq!(encode_modified_utf8("é"), [0xC3, 0xA9]);
    assert_eq!(
        encode_modified_utf8("\u{1F600}"),
        [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]
    );
    assert_eq!(
        decode_modified_utf8(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]).expect("decode"),
        "\u{1F600}"
    );
    assert_eq!(decode_modified_utf8(&[0xC0, 0x80]).expect("decode"), "\0");
    assert!(decode_modified_utf8(&[0xFF]).is_err());
    assert!(decode_modified_utf8(&[0xC3]).is_err());
    // A lone surrogate has no Rust string form.
    assert!(decode_modified_utf8(&[0xED, 0xA0, 0xBD]).is_err());
}

#[test]
fn malformed_input() {
    assert_eq!(format_error(&[0x0D, 0, 0]), "unknown tag type 13");
    assert_eq!(
        format_error(&[0x0A, 0, 0, 0x07, 0, 1, b'a', 0xFF, 0xFF, 0xFF, 0xFF]),
        "negative length -1"
    );
    assert_eq!(
        format_error(&[0x0A, 0, 0, 0x09, 0, 1, b'a', 0x00, 0, 0, 0, 2]),
        "list of 2 elements has no element type"
    );
    assert_eq!(format_error(&[0x03, 0, 0, 0, 0, 0, 1]), "root tag must be a compound, found TAG_Int");

    let mut bytes = to_bytes(&compound("{a: 1}")).expect("encode");
    bytes.push(0);
    assert_eq!(format_error(&bytes), "1 trailing bytes after root tag");
    bytes.truncate(bytes.len() - 2);
    assert_eq!(format_error(&bytes), "unexpected end of input");
}

#[test]
fn size_budget() {
    let mut big = Compound::new();
    big.put_byte_array("blob", vec![0; 1024]);
    let bytes = to_bytes(&big).expect("encode");
    assert!(matches!(
        from_bytes(&bytes, SizeTracker::new(512, 16)),
        Err(NbtError::SizeLimit(_))
    ));

    // A length prefix larger than the input trips the budget before allocation.
    let lying = [0x0A, 0, 0, 0x0B, 0, 1, b'a', 0x7F, 0xFF, 0xFF, 0xFF];
    assert!(matches!(
        from_bytes(&lying, SizeTracker::default()),
        Err(NbtError::SizeLimit(_))
    ));
}

#[test]
fn accounting_matches_size_estimate() {
    let original = compound("{name: \"abc\", list: [1, 2], arr: [L; 1L, 2L], inner: {x: 1.0d}}");
    let bytes = to_bytes(&original).expect("encode");
    let mut tracker = SizeTracker::unlimited();
    let (_, tag) = read_named(&bytes, &mut tracker).expect("decode");
    assert_eq!(tracker.used(), tag.size_in_bytes());
    assert_eq!(tracker.depth(), 0);
}

#[test]
fn nesting_depth_is_bounded() {
    let mut tag = Tag::Int(0);
    for _ in 0..600 {
        tag = Tag::List(List::from(vec![tag]));
    }
    let mut out = Vec::new();
    write_unnamed(&mut out, &tag).expect("encode");
    assert!(matches!(
        read_unnamed(&out, &mut SizeTracker::default()),
        Err(NbtError::SizeLimit(_))
    ));
    let decoded = read_unnamed(&out, &mut SizeTracker::unlimited()).expect("decode");
    assert_eq!(decoded, tag);
}
