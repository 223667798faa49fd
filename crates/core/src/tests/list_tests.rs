use super::*;

#[test]
fn push_keeps_lists_homogeneous() {
    let mut list = List::new();
    assert_eq!(list.element_kind(), TagKind::End);
    assert!(list.push(Tag::Int(1)));
    assert!(!list.push(Tag::Long(2)));
    assert!(!list.push(Tag::End));
    assert!(list.push(Tag::Int(3)));
    assert_eq!(list.as_slice(), &[Tag::Int(1), Tag::Int(3)]);
    assert_eq!(list.element_kind(), TagKind::Int);
}

#[test]
fn empty_list_rejects_end() {
    let mut list = List::new();
    assert!(!list.add_element(0, Tag::End));
    assert!(list.is_empty());
}

#[test]
fn set_and_add_respect_bounds() {
    let mut list = List::from(vec![Tag::from("a"), Tag::from("c")]);
    assert!(list.add_element(1, Tag::from("b")));
    assert!(!list.add_element(4, Tag::from("z")));
    assert!(list.set_element(2, Tag::from("C")));
    assert!(!list.set_element(3, Tag::from("D")));
    assert!(!list.set_element(0, Tag::Int(0)));
    let strings: Vec<&str> = (0..list.len()).map(|i| list.get_string_or(i, "?")).collect();
    assert_eq!(strings, ["a", "b", "C"]);
}

#[test]
fn value_type_reports_mixed_as_compound() {
    assert_eq!(List::new().value_type(), TagKind::End);
    assert_eq!(List::from(vec![Tag::Short(1)]).value_type(), TagKind::Short);
    let mixed = List::from(vec![Tag::Int(1), Tag::from("x")]);
    assert!(!mixed.is_homogeneous());
    assert_eq!(mixed.value_type(), TagKind::Compound);
}

#[test]
fn typed_getters_fall_back() {
    let list = List::from(vec![Tag::Double(2.5), Tag::from("s")]);
    assert_eq!(list.get_int(0, -1), 2);
    assert_eq!(list.get_float(0, 0.0), 2.5);
    assert_eq!(list.get_short(1, 7), 7);
    assert_eq!(list.get_double(5, 1.0), 1.0);
    assert_eq!(list.get_string(0), None);
    assert!(list.get_compound(0).is_none());
}

#[test]
fn compounds_skips_other_elements() {
    let mut entry = Compound::new();
    entry.put_int("n", 1);
    let list = List::from(vec![Tag::Compound(entry.clone()), Tag::Int(0)]);
    let compounds: Vec<&Compound> = list.compounds().collect();
    assert_eq!(compounds, [&entry]);
}

#[test]
fn remove_and_clear() {
    let mut list: List = [Tag::Int(1), Tag::Int(2)].into_iter().collect();
    assert_eq!(list.remove(5), None);
    assert_eq!(list.remove(0), Some(Tag::Int(1)));
    TagSequence::clear(&mut list);
    assert!(list.is_empty());
    // An emptied list accepts any kind again.
    assert!(list.push(Tag::from("x")));
}
