//! Typed primitive arrays: `[B;..]`, `[I;..]` and `[L;..]`.

use crate::list::TagSequence;
use crate::tag::{Tag, TagKind};

macro_rules! typed_array {
    ($(#[$meta:meta])* $name:ident, $elem:ty, $variant:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name {
            values: Vec<$elem>,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn len(&self) -> usize {
                self.values.len()
            }

            pub fn is_empty(&self) -> bool {
                self.values.is_empty()
            }

            pub fn as_slice(&self) -> &[$elem] {
                &self.values
            }

            pub fn as_mut_slice(&mut self) -> &mut [$elem] {
                &mut self.values
            }

            pub fn into_vec(self) -> Vec<$elem> {
                self.values
            }

            pub fn push(&mut self, value: $elem) {
                self.values.push(value);
            }

            pub fn get(&self, index: usize) -> Option<$elem> {
                self.values.get(index).copied()
            }

            pub fn iter(&self) -> std::slice::Iter<'_, $elem> {
                self.values.iter()
            }
        }

        impl From<Vec<$elem>> for $name {
            fn from(values: Vec<$elem>) -> Self {
                Self { values }
            }
        }

        impl From<&[$elem]> for $name {
            fn from(values: &[$elem]) -> Self {
                Self {
                    values: values.to_vec(),
                }
            }
        }

        impl FromIterator<$elem> for $name {
            fn from_iter<I: IntoIterator<Item = $elem>>(iter: I) -> Self {
                Self {
                    values: iter.into_iter().collect(),
                }
            }
        }

        impl TagSequence for $name {
            fn len(&self) -> usize {
                self.values.len()
            }

            fn element_kind(&self) -> TagKind {
                TagKind::$variant
            }

            fn get_tag(&self, index: usize) -> Option<Tag> {
                self.values.get(index).map(|value| Tag::$variant(*value))
            }

            fn set_element(&mut self, index: usize, tag: Tag) -> bool {
                match (tag, self.values.get_mut(index)) {
                    (Tag::$variant(value), Some(slot)) => {
                        *slot = value;
                        true
                    }
                    _ => false,
                }
            }

            fn add_element(&mut self, index: usize, tag: Tag) -> bool {
                match tag {
                    Tag::$variant(value) if index <= self.values.len() => {
                        self.values.insert(index, value);
                        true
                    }
                    _ => false,
                }
            }

            fn clear(&mut self) {
                self.values.clear();
            }
        }
    };
}

typed_array!(ByteArray, i8, Byte);
typed_array!(IntArray, i32, Int);
typed_array!(
    /// Also used for packed storage such as block-state bit arrays.
    LongArray,
    i64,
    Long
);
