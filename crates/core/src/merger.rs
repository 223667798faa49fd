//! Incremental list building for the ops algebra.
//!
//! The concrete container is only known once elements arrive, so the merger
//! starts unspecialised, picks a typed array for a leading Byte/Int/Long and
//! falls back to a general list the moment an element of another kind shows
//! up. Each transition consumes the old state and returns the new one.

use crate::array::{ByteArray, IntArray, LongArray};
use crate::list::List;
use crate::tag::Tag;

#[derive(Clone, Debug, PartialEq)]
pub enum ListMerger {
    Empty,
    Bytes(Vec<i8>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    General(Vec<Tag>),
}

impl ListMerger {
    /// Merger continuing from `base`, or `None` when `base` is not list-shaped.
    pub fn from_base(base: &Tag) -> Option<ListMerger> {
        match base {
            Tag::End => Some(ListMerger::Empty),
            Tag::ByteArray(array) if array.is_empty() => Some(ListMerger::Empty),
            Tag::IntArray(array) if array.is_empty() => Some(ListMerger::Empty),
            Tag::LongArray(array) if array.is_empty() => Some(ListMerger::Empty),
            Tag::List(list) if list.is_empty() => Some(ListMerger::Empty),
            Tag::ByteArray(array) => Some(ListMerger::Bytes(array.as_slice().to_vec())),
            Tag::IntArray(array) => Some(ListMerger::Ints(array.as_slice().to_vec())),
            Tag::LongArray(array) => Some(ListMerger::Longs(array.as_slice().to_vec())),
            Tag::List(list) => Some(ListMerger::General(list.as_slice().to_vec())),
            _ => None,
        }
    }

    pub fn merge(self, tag: Tag) -> ListMerger {
        match (self, tag) {
            (ListMerger::Empty, Tag::Byte(value)) => ListMerger::Bytes(vec![value]),
            (ListMerger::Empty, Tag::Int(value)) => ListMerger::Ints(vec![value]),
            (ListMerger::Empty, Tag::Long(value)) => ListMerger::Longs(vec![value]),
            (ListMerger::Empty, other) => ListMerger::General(vec![other]),
            (ListMerger::Bytes(mut values), Tag::Byte(value)) => {
                values.push(value);
                ListMerger::Bytes(values)
            }
            (ListMerger::Ints(mut values), Tag::Int(value)) => {
                values.push(value);
                ListMerger::Ints(values)
            }
            (ListMerger::Longs(mut values), Tag::Long(value)) => {
                values.push(value);
                ListMerger::Longs(values)
            }
            (ListMerger::General(mut values), other) => {
                values.push(other);
                ListMerger::General(values)
            }
            (specialised, other) => specialised.promote().merge(other),
        }
    }

    pub fn merge_all(self, tags: impl IntoIterator<Item = Tag>) -> ListMerger {
        tags.into_iter().fold(self, ListMerger::merge)
    }

    pub fn finish(self) -> Tag {
        match self {
            ListMerger::Empty => Tag::List(List::new()),
            ListMerger::Bytes(values) => Tag::ByteArray(ByteArray::from(values)),
            ListMerger::Ints(values) => Tag::IntArray(IntArray::from(values)),
            ListMerger::Longs(values) => Tag::LongArray(LongArray::from(values)),
            ListMerger::General(values) => Tag::List(List::from(values)),
        }
    }

    /// Boxes accumulated primitives into a general list.
    fn promote(self) -> ListMerger {
        match self {
            ListMerger::Empty => ListMerger::General(Vec::new()),
            ListMerger::Bytes(values) => {
                ListMerger::General(values.into_iter().map(Tag::Byte).collect())
            }
            ListMerger::Ints(values) => {
                ListMerger::General(values.into_iter().map(Tag::Int).collect())
            }
            ListMerger::Longs(values) => {
                ListMerger::General(values.into_iter().map(Tag::Long).collect())
            }
            general @ ListMerger::General(_) => general,
        }
    }
}

#[cfg(test)]
#[path = "tests/merger_tests.rs"]
mod tests;
