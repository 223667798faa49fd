use super::*;
use crate::snbt;

fn tag(src: &str) -> Tag {
    snbt::read(src).expect("fixture should parse")
}

fn check(standard: &str, subject: &str, ignore_list_order: bool) -> bool {
    matches(Some(&tag(standard)), Some(&tag(subject)), ignore_list_order)
}

#[test]
fn missing_sides() {
    assert!(matches(None, None, false));
    assert!(matches(None, Some(&Tag::Int(1)), false));
    assert!(!matches(Some(&Tag::Int(1)), None, false));
}

#[test]
fn kinds_must_agree() {
    assert!(check("1", "1", false));
    assert!(!check("1", "1b", false));
    assert!(!check("1.0f", "1.0d", false));
    assert!(!check("[I; 1]", "[1]", true));
}

#[test]
fn compounds_allow_extra_keys() {
    assert!(check("{a: 1}", "{a: 1, b: 2}", false));
    assert!(!check("{a: 1, b: 2}", "{a: 1}", false));
    assert!(!check("{a: 1}", "{b: 1, c: 2}", false));
    assert!(check("{}", "{x: 1}", false));
    assert!(check("{a: {b: 1}}", "{a: {b: 1, c: 2}}", false));
}

#[test]
fn ordered_lists_compare_exactly() {
    assert!(check("[1, 2]", "[1, 2]", false));
    assert!(!check("[1, 2]", "[2, 1]", false));
    assert!(!check("[{a: 1}]", "[{a: 1, b: 2}]", false));
}

#[test]
fn unordered_lists() {
    assert!(check("[1, 2]", "[2, 1]", true));
    assert!(check("[1]", "[3, 2, 1]", true));
    assert!(!check("[1, 4]", "[3, 2, 1]", true));
    assert!(!check("[1, 1, 1]", "[1, 1]", true));
    assert!(check("[1, 1]", "[1, 2]", true));
    assert!(check("[]", "[]", true));
    assert!(!check("[]", "[1]", true));
    assert!(check("[{a: 1}]", "[{b: 2}, {a: 1, b: 3}]", true));
}

#[test]
fn matching_is_reflexive() {
    for src in [
        "{a: [1, 2], b: {c: \"x\"}, d: [B; 1b]}",
        "[[1], [2, 3]]",
        "\"text\"",
        "[]",
    ] {
        assert!(check(src, src, false), "{src} should match itself");
        assert!(check(src, src, true), "{src} should match itself ignoring order");
    }
}
