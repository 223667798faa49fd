use crate::compound::Compound;
use crate::tag::{Tag, TagKind};

/// Shared surface of `List` and the typed arrays.
///
/// `set_element`/`add_element` never panic: a tag of the wrong kind, or an
/// index out of range, leaves the sequence untouched and returns `false`.
pub trait TagSequence {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Kind accepted by `set_element`/`add_element`; `End` for an empty list.
    fn element_kind(&self) -> TagKind;

    fn get_tag(&self, index: usize) -> Option<Tag>;

    fn set_element(&mut self, index: usize, tag: Tag) -> bool;

    fn add_element(&mut self, index: usize, tag: Tag) -> bool;

    fn clear(&mut self);

    fn iter_tags(&self) -> Box<dyn Iterator<Item = Tag> + '_> {
        Box::new((0..self.len()).filter_map(move |index| self.get_tag(index)))
    }
}

/// Ordered sequence of tags.
///
/// Direct mutation keeps the list homogeneous. `From<Vec<Tag>>` does not
/// check, which is how merge results and decoded data carry mixed lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct List {
    items: Vec<Tag>,
}

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Tag> {
        self.items
    }

    /// Appends under the homogeneity rule.
    pub fn push(&mut self, tag: Tag) -> bool {
        let index = self.items.len();
        self.add_element(index, tag)
    }

    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    pub fn is_homogeneous(&self) -> bool {
        match self.items.split_first() {
            Some((first, rest)) => rest.iter().all(|tag| tag.kind() == first.kind()),
            None => true,
        }
    }

    /// Element type id written to the binary form: `End` when empty,
    /// `Compound` when elements disagree.
    pub fn value_type(&self) -> TagKind {
        let mut kind = TagKind::End;
        for item in &self.items {
            let next = item.kind();
            if kind == TagKind::End {
                kind = next;
            } else if kind != next {
                return TagKind::Compound;
            }
        }
        kind
    }

    pub fn size_in_bytes(&self) -> u64 {
        36 + 4 * self.items.len() as u64
            + self.items.iter().map(Tag::size_in_bytes).sum::<u64>()
    }

    pub fn get_short(&self, index: usize, fallback: i16) -> i16 {
        self.number_at(index)
            .map_or(fallback, crate::number::Number::short_value)
    }

    pub fn get_int(&self, index: usize, fallback: i32) -> i32 {
        self.number_at(index)
            .map_or(fallback, crate::number::Number::int_value)
    }

    pub fn get_float(&self, index: usize, fallback: f32) -> f32 {
        self.number_at(index)
            .map_or(fallback, crate::number::Number::float_value)
    }

    pub fn get_double(&self, index: usize, fallback: f64) -> f64 {
        self.number_at(index)
            .map_or(fallback, crate::number::Number::double_value)
    }

    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.items.get(index).and_then(Tag::as_str)
    }

    pub fn get_string_or<'a>(&'a self, index: usize, fallback: &'a str) -> &'a str {
        self.get_string(index).unwrap_or(fallback)
    }

    pub fn get_compound(&self, index: usize) -> Option<&Compound> {
        self.items.get(index).and_then(Tag::as_compound)
    }

    pub fn get_list(&self, index: usize) -> Option<&List> {
        self.items.get(index).and_then(Tag::as_list)
    }

    /// Compound elements only, skipping anything else.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.items.iter().filter_map(Tag::as_compound)
    }

    fn number_at(&self, index: usize) -> Option<crate::number::Number> {
        self.items.get(index).and_then(Tag::as_number)
    }

    fn accepts(&self, tag: &Tag) -> bool {
        if tag.kind() == TagKind::End {
            return false;
        }
        match self.items.first() {
            Some(first) => first.kind() == tag.kind(),
            None => true,
        }
    }
}

impl TagSequence for List {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn element_kind(&self) -> TagKind {
        self.items.first().map_or(TagKind::End, Tag::kind)
    }

    fn get_tag(&self, index: usize) -> Option<Tag> {
        self.items.get(index).cloned()
    }

    fn set_element(&mut self, index: usize, tag: Tag) -> bool {
        if index >= self.items.len() || !self.accepts(&tag) {
            return false;
        }
        self.items[index] = tag;
        true
    }

    fn add_element(&mut self, index: usize, tag: Tag) -> bool {
        if index > self.items.len() || !self.accepts(&tag) {
            return false;
        }
        self.items.insert(index, tag);
        true
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

impl From<Vec<Tag>> for List {
    fn from(items: Vec<Tag>) -> Self {
        Self { items }
    }
}

impl FromIterator<Tag> for List {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
