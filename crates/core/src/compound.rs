use std::collections::btree_map::{self, BTreeMap};

use crate::array::{ByteArray, IntArray, LongArray};
use crate::list::List;
use crate::number::Number;
use crate::tag::{utf16_len, Tag, TagKind};

/// String-keyed mapping of tags. Keys iterate in lexicographic order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Compound {
    entries: BTreeMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `value`, returning the tag previously stored under `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn contains_kind(&self, key: &str, kind: TagKind) -> bool {
        self.entries.get(key).is_some_and(|tag| tag.kind() == kind)
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Tag> {
        self.entries.values()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn size_in_bytes(&self) -> u64 {
        48 + self
            .entries
            .iter()
            .map(|(key, value)| 28 + 2 * utf16_len(key) + 36 + value.size_in_bytes())
            .sum::<u64>()
    }

    /// Deep merge: nested compounds merge key by key, anything else in
    /// `source` replaces the local value.
    pub fn copy_from(&mut self, source: &Compound) -> &mut Self {
        for (key, value) in &source.entries {
            match (value, self.entries.get_mut(key)) {
                (Tag::Compound(incoming), Some(Tag::Compound(existing))) => {
                    existing.copy_from(incoming);
                }
                _ => {
                    self.entries.insert(key.clone(), value.clone());
                }
            }
        }
        self
    }

    pub fn put_byte(&mut self, key: impl Into<String>, value: i8) {
        self.put(key, Tag::Byte(value));
    }

    pub fn put_short(&mut self, key: impl Into<String>, value: i16) {
        self.put(key, Tag::Short(value));
    }

    pub fn put_int(&mut self, key: impl Into<String>, value: i32) {
        self.put(key, Tag::Int(value));
    }

    pub fn put_long(&mut self, key: impl Into<String>, value: i64) {
        self.put(key, Tag::Long(value));
    }

    pub fn put_float(&mut self, key: impl Into<String>, value: f32) {
        self.put(key, Tag::Float(value));
    }

    pub fn put_double(&mut self, key: impl Into<String>, value: f64) {
        self.put(key, Tag::Double(value));
    }

    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, Tag::String(value.into()));
    }

    pub fn put_boolean(&mut self, key: impl Into<String>, value: bool) {
        self.put(key, Tag::boolean(value));
    }

    pub fn put_byte_array(&mut self, key: impl Into<String>, value: Vec<i8>) {
        self.put(key, Tag::ByteArray(ByteArray::from(value)));
    }

    pub fn put_int_array(&mut self, key: impl Into<String>, value: Vec<i32>) {
        self.put(key, Tag::IntArray(IntArray::from(value)));
    }

    pub fn put_long_array(&mut self, key: impl Into<String>, value: Vec<i64>) {
        self.put(key, Tag::LongArray(LongArray::from(value)));
    }

    fn number(&self, key: &str) -> Option<Number> {
        self.entries.get(key).and_then(Tag::as_number)
    }

    pub fn get_byte(&self, key: &str) -> Option<i8> {
        self.number(key).map(Number::byte_value)
    }

    pub fn get_byte_or(&self, key: &str, fallback: i8) -> i8 {
        self.get_byte(key).unwrap_or(fallback)
    }

    pub fn get_short(&self, key: &str) -> Option<i16> {
        self.number(key).map(Number::short_value)
    }

    pub fn get_short_or(&self, key: &str, fallback: i16) -> i16 {
        self.get_short(key).unwrap_or(fallback)
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        self.number(key).map(Number::int_value)
    }

    pub fn get_int_or(&self, key: &str, fallback: i32) -> i32 {
        self.get_int(key).unwrap_or(fallback)
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        self.number(key).map(Number::long_value)
    }

    pub fn get_long_or(&self, key: &str, fallback: i64) -> i64 {
        self.get_long(key).unwrap_or(fallback)
    }

    pub fn get_float(&self, key: &str) -> Option<f32> {
        self.number(key).map(Number::float_value)
    }

    pub fn get_float_or(&self, key: &str, fallback: f32) -> f32 {
        self.get_float(key).unwrap_or(fallback)
    }

    pub fn get_double(&self, key: &str) -> Option<f64> {
        self.number(key).map(Number::double_value)
    }

    pub fn get_double_or(&self, key: &str, fallback: f64) -> f64 {
        self.get_double(key).unwrap_or(fallback)
    }

    /// Any numeric value counts; non-numeric values are not booleans.
    pub fn get_boolean(&self, key: &str) -> Option<bool> {
        self.number(key).map(Number::as_boolean)
    }

    pub fn get_boolean_or(&self, key: &str, fallback: bool) -> bool {
        self.get_boolean(key).unwrap_or(fallback)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Tag::as_str)
    }

    pub fn get_string_or<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        self.get_string(key).unwrap_or(fallback)
    }

    pub fn get_byte_array(&self, key: &str) -> Option<&ByteArray> {
        match self.entries.get(key) {
            Some(Tag::ByteArray(array)) => Some(array),
            _ => None,
        }
    }

    pub fn get_int_array(&self, key: &str) -> Option<&IntArray> {
        match self.entries.get(key) {
            Some(Tag::IntArray(array)) => Some(array),
            _ => None,
        }
    }

    pub fn get_long_array(&self, key: &str) -> Option<&LongArray> {
        match self.entries.get(key) {
            Some(Tag::LongArray(array)) => Some(array),
            _ => None,
        }
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        self.entries.get(key).and_then(Tag::as_compound)
    }

    pub fn get_compound_mut(&mut self, key: &str) -> Option<&mut Compound> {
        self.entries.get_mut(key).and_then(Tag::as_compound_mut)
    }

    pub fn get_list(&self, key: &str) -> Option<&List> {
        self.entries.get(key).and_then(Tag::as_list)
    }

    pub fn get_list_mut(&mut self, key: &str) -> Option<&mut List> {
        self.entries.get_mut(key).and_then(Tag::as_list_mut)
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, Tag)> for Compound {
    fn extend<I: IntoIterator<Item = (String, Tag)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = btree_map::IntoIter<String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = btree_map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
#[path = "tests/compound_tests.rs"]
mod tests;
