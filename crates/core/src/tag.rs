//! The closed tag model and its binary identities.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::array::{ByteArray, IntArray, LongArray};
use crate::compound::Compound;
use crate::list::List;
use crate::number::Number;

/// Kind of a tag, carrying the stable type id used by the binary form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagKind {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    pub const ALL: [TagKind; 13] = [
        TagKind::End,
        TagKind::Byte,
        TagKind::Short,
        TagKind::Int,
        TagKind::Long,
        TagKind::Float,
        TagKind::Double,
        TagKind::ByteArray,
        TagKind::String,
        TagKind::List,
        TagKind::Compound,
        TagKind::IntArray,
        TagKind::LongArray,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<TagKind> {
        TagKind::ALL.get(usize::from(id)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "TAG_End",
            TagKind::Byte => "TAG_Byte",
            TagKind::Short => "TAG_Short",
            TagKind::Int => "TAG_Int",
            TagKind::Long => "TAG_Long",
            TagKind::Float => "TAG_Float",
            TagKind::Double => "TAG_Double",
            TagKind::ByteArray => "TAG_Byte_Array",
            TagKind::String => "TAG_String",
            TagKind::List => "TAG_List",
            TagKind::Compound => "TAG_Compound",
            TagKind::IntArray => "TAG_Int_Array",
            TagKind::LongArray => "TAG_Long_Array",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TagKind::Byte
                | TagKind::Short
                | TagKind::Int
                | TagKind::Long
                | TagKind::Float
                | TagKind::Double
        )
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default)]
pub enum Tag {
    #[default]
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(ByteArray),
    IntArray(IntArray),
    LongArray(LongArray),
    List(List),
    Compound(Compound),
}

impl Tag {
    pub fn kind(&self) -> TagKind {
        match self {
            Tag::End => TagKind::End,
            Tag::Byte(_) => TagKind::Byte,
            Tag::Short(_) => TagKind::Short,
            Tag::Int(_) => TagKind::Int,
            Tag::Long(_) => TagKind::Long,
            Tag::Float(_) => TagKind::Float,
            Tag::Double(_) => TagKind::Double,
            Tag::String(_) => TagKind::String,
            Tag::ByteArray(_) => TagKind::ByteArray,
            Tag::IntArray(_) => TagKind::IntArray,
            Tag::LongArray(_) => TagKind::LongArray,
            Tag::List(_) => TagKind::List,
            Tag::Compound(_) => TagKind::Compound,
        }
    }

    pub fn type_id(&self) -> u8 {
        self.kind().id()
    }

    pub fn boolean(value: bool) -> Tag {
        Tag::Byte(i8::from(value))
    }

    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Tag::Byte(v) => Some(Number::Byte(v)),
            Tag::Short(v) => Some(Number::Short(v)),
            Tag::Int(v) => Some(Number::Int(v)),
            Tag::Long(v) => Some(Number::Long(v)),
            Tag::Float(v) => Some(Number::Float(v)),
            Tag::Double(v) => Some(Number::Double(v)),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<i8> {
        self.as_number().map(Number::byte_value)
    }

    pub fn as_short(&self) -> Option<i16> {
        self.as_number().map(Number::short_value)
    }

    pub fn as_int(&self) -> Option<i32> {
        self.as_number().map(Number::int_value)
    }

    pub fn as_long(&self) -> Option<i64> {
        self.as_number().map(Number::long_value)
    }

    pub fn as_float(&self) -> Option<f32> {
        self.as_number().map(Number::float_value)
    }

    pub fn as_double(&self) -> Option<f64> {
        self.as_number().map(Number::double_value)
    }

    pub fn as_boolean(&self) -> Option<bool> {
        self.as_number().map(Number::as_boolean)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn into_compound(self) -> Option<Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn into_list(self) -> Option<List> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    /// True for `List` and the three typed arrays.
    pub fn is_list_like(&self) -> bool {
        matches!(
            self,
            Tag::List(_) | Tag::ByteArray(_) | Tag::IntArray(_) | Tag::LongArray(_)
        )
    }

    /// Estimated in-memory footprint, used by decode budgets.
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            Tag::End => 8,
            Tag::Byte(_) => 9,
            Tag::Short(_) => 10,
            Tag::Int(_) => 12,
            Tag::Long(_) => 16,
            Tag::Float(_) => 12,
            Tag::Double(_) => 16,
            Tag::String(value) => 36 + 2 * utf16_len(value),
            Tag::ByteArray(array) => 24 + array.len() as u64,
            Tag::IntArray(array) => 24 + 4 * array.len() as u64,
            Tag::LongArray(array) => 24 + 8 * array.len() as u64,
            Tag::List(list) => list.size_in_bytes(),
            Tag::Compound(compound) => compound.size_in_bytes(),
        }
    }

    /// Compact SNBT rendering.
    pub fn to_snbt(&self) -> String {
        crate::snbt::write(self)
    }
}

pub(crate) fn utf16_len(value: &str) -> u64 {
    value.encode_utf16().count() as u64
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Tag::End, Tag::End) => true,
            (Tag::Byte(a), Tag::Byte(b)) => a == b,
            (Tag::Short(a), Tag::Short(b)) => a == b,
            (Tag::Int(a), Tag::Int(b)) => a == b,
            (Tag::Long(a), Tag::Long(b)) => a == b,
            (Tag::Float(a), Tag::Float(b)) => a.to_bits() == b.to_bits(),
            (Tag::Double(a), Tag::Double(b)) => a.to_bits() == b.to_bits(),
            (Tag::String(a), Tag::String(b)) => a == b,
            (Tag::ByteArray(a), Tag::ByteArray(b)) => a == b,
            (Tag::IntArray(a), Tag::IntArray(b)) => a == b,
            (Tag::LongArray(a), Tag::LongArray(b)) => a == b,
            (Tag::List(a), Tag::List(b)) => a == b,
            (Tag::Compound(a), Tag::Compound(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
        match self {
            Tag::End => {}
            Tag::Byte(v) => v.hash(state),
            Tag::Short(v) => v.hash(state),
            Tag::Int(v) => v.hash(state),
            Tag::Long(v) => v.hash(state),
            Tag::Float(v) => v.to_bits().hash(state),
            Tag::Double(v) => v.to_bits().hash(state),
            Tag::String(v) => v.hash(state),
            Tag::ByteArray(v) => v.hash(state),
            Tag::IntArray(v) => v.hash(state),
            Tag::LongArray(v) => v.hash(state),
            Tag::List(v) => v.hash(state),
            Tag::Compound(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_snbt())
    }
}

impl From<Number> for Tag {
    fn from(value: Number) -> Self {
        match value {
            Number::Byte(v) => Tag::Byte(v),
            Number::Short(v) => Tag::Short(v),
            Number::Int(v) => Tag::Int(v),
            Number::Long(v) => Tag::Long(v),
            Number::Float(v) => Tag::Float(v),
            Number::Double(v) => Tag::Double(v),
        }
    }
}

macro_rules! tag_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Tag {
            fn from(value: $ty) -> Self {
                Tag::$variant(value)
            }
        })*
    };
}

tag_from!(
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    ByteArray => ByteArray,
    IntArray => IntArray,
    LongArray => LongArray,
    List => List,
    Compound => Compound,
);

impl From<bool> for Tag {
    fn from(value: bool) -> Self {
        Tag::boolean(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tag::End => serializer.serialize_unit(),
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::ByteArray(array) => serializer.collect_seq(array.as_slice()),
            Tag::IntArray(array) => serializer.collect_seq(array.as_slice()),
            Tag::LongArray(array) => serializer.collect_seq(array.as_slice()),
            Tag::List(list) => {
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tag::Compound(compound) => {
                let mut map = serializer.serialize_map(Some(compound.len()))?;
                for (key, value) in compound.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        arbitrary_tag(u, 0)
    }
}

#[cfg(feature = "arbitrary")]
fn arbitrary_tag(u: &mut arbitrary::Unstructured<'_>, depth: usize) -> arbitrary::Result<Tag> {
    const MAX_DEPTH: usize = 4;
    let upper = if depth >= MAX_DEPTH { 10 } else { 12 };
    Ok(match u.int_in_range(0..=upper)? {
        0 => Tag::Byte(u.arbitrary()?),
        1 => Tag::Short(u.arbitrary()?),
        2 => Tag::Int(u.arbitrary()?),
        3 => Tag::Long(u.arbitrary()?),
        4 => Tag::Float(finite_f32(u.arbitrary()?)),
        5 => Tag::Double(finite_f64(u.arbitrary()?)),
        6 => Tag::String(u.arbitrary()?),
        7 => Tag::ByteArray(ByteArray::from(u.arbitrary::<Vec<i8>>()?)),
        8 => Tag::IntArray(IntArray::from(u.arbitrary::<Vec<i32>>()?)),
        9 => Tag::LongArray(LongArray::from(u.arbitrary::<Vec<i64>>()?)),
        10 => Tag::Int(u.arbitrary()?),
        11 => {
            let len = u.int_in_range(0..=4)?;
            let mut list = List::new();
            if len > 0 {
                let first = arbitrary_tag(u, depth + 1)?;
                let kind = first.kind();
                list.push(first);
                for _ in 1..len {
                    let next = arbitrary_tag(u, depth + 1)?;
                    if next.kind() == kind {
                        list.push(next);
                    }
                }
            }
            Tag::List(list)
        }
        _ => {
            let len = u.int_in_range(0..=4)?;
            let mut compound = Compound::new();
            for _ in 0..len {
                let key: String = u.arbitrary()?;
                if key.is_empty() {
                    continue;
                }
                compound.put(key, arbitrary_tag(u, depth + 1)?);
            }
            Tag::Compound(compound)
        }
    })
}

#[cfg(feature = "arbitrary")]
fn finite_f32(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(feature = "arbitrary")]
fn finite_f64(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
#[path = "tests/tag_tests.rs"]
mod tests;
