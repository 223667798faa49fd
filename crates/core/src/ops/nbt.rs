use std::fmt;

use crate::array::{ByteArray, IntArray, LongArray};
use crate::compound::Compound;
use crate::list::List;
use crate::merger::ListMerger;
use crate::number::Number;
use crate::ops::{DataResult, DynamicOps, MapLike, OpsError};
use crate::tag::Tag;

/// The tag backend of the ops algebra.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NbtOps;

impl NbtOps {
    pub const INSTANCE: NbtOps = NbtOps;
}

impl fmt::Display for NbtOps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NBT")
    }
}

/// Borrowed `MapLike` over a compound.
struct CompoundView<'a> {
    compound: &'a Compound,
}

impl MapLike<Tag> for CompoundView<'_> {
    fn get(&self, key: &Tag) -> Option<Tag> {
        key.as_str().and_then(|key| self.compound.get(key).cloned())
    }

    fn get_str(&self, key: &str) -> Option<Tag> {
        self.compound.get(key).cloned()
    }

    fn entries(&self) -> Vec<(Tag, Tag)> {
        self.compound
            .iter()
            .map(|(key, value)| (Tag::String(key.clone()), value.clone()))
            .collect()
    }
}

/// Callers have already rejected anything but `End` and `Compound`.
fn base_compound(map: Tag) -> Compound {
    match map {
        Tag::Compound(compound) => compound,
        _ => Compound::new(),
    }
}

impl DynamicOps for NbtOps {
    type Value = Tag;

    fn empty(&self) -> Tag {
        Tag::End
    }

    fn empty_list(&self) -> Tag {
        Tag::List(List::new())
    }

    fn empty_map(&self) -> Tag {
        Tag::Compound(Compound::new())
    }

    /// Untyped numbers have no narrower home than a double.
    fn create_numeric(&self, number: Number) -> Tag {
        Tag::Double(number.double_value())
    }

    fn create_byte(&self, value: i8) -> Tag {
        Tag::Byte(value)
    }

    fn create_short(&self, value: i16) -> Tag {
        Tag::Short(value)
    }

    fn create_int(&self, value: i32) -> Tag {
        Tag::Int(value)
    }

    fn create_long(&self, value: i64) -> Tag {
        Tag::Long(value)
    }

    fn create_float(&self, value: f32) -> Tag {
        Tag::Float(value)
    }

    fn create_double(&self, value: f64) -> Tag {
        Tag::Double(value)
    }

    fn create_boolean(&self, value: bool) -> Tag {
        Tag::boolean(value)
    }

    fn create_string(&self, value: &str) -> Tag {
        Tag::String(value.to_string())
    }

    fn create_list(&self, values: Vec<Tag>) -> Tag {
        Tag::List(List::from(values))
    }

    /// Infallible by signature: non-string keys are logged and dropped
    /// rather than aborting the whole map. Use `merge_to_map_entries` to
    /// get them back as an error.
    fn create_map(&self, entries: Vec<(Tag, Tag)>) -> Tag {
        let mut compound = Compound::new();
        for (key, value) in entries {
            match key {
                Tag::String(key) => {
                    compound.put(key, value);
                }
                other => tracing::warn!(key = %other, "skipping non-string map key"),
            }
        }
        Tag::Compound(compound)
    }

    fn create_byte_list(&self, values: &[i8]) -> Tag {
        Tag::ByteArray(ByteArray::from(values))
    }

    fn create_int_list(&self, values: &[i32]) -> Tag {
        Tag::IntArray(IntArray::from(values))
    }

    fn create_long_list(&self, values: &[i64]) -> Tag {
        Tag::LongArray(LongArray::from(values))
    }

    fn get_number_value(&self, input: &Tag) -> DataResult<Number> {
        input
            .as_number()
            .ok_or_else(|| OpsError::wrong_shape("Not a number"))
    }

    fn get_string_value(&self, input: &Tag) -> DataResult<String> {
        match input {
            Tag::String(value) => Ok(value.clone()),
            _ => Err(OpsError::wrong_shape("Not a string")),
        }
    }

    fn get_stream(&self, input: &Tag) -> DataResult<Vec<Tag>> {
        match input {
            Tag::List(list) => Ok(list.as_slice().to_vec()),
            Tag::ByteArray(array) => Ok(array.iter().copied().map(Tag::Byte).collect()),
            Tag::IntArray(array) => Ok(array.iter().copied().map(Tag::Int).collect()),
            Tag::LongArray(array) => Ok(array.iter().copied().map(Tag::Long).collect()),
            _ => Err(OpsError::wrong_shape("Not a list")),
        }
    }

    fn get_byte_buffer(&self, input: &Tag) -> DataResult<Vec<i8>> {
        match input {
            Tag::ByteArray(array) => Ok(array.as_slice().to_vec()),
            _ => self.get_stream(input).map_err(OpsError::retype).and_then(|values| {
                values
                    .iter()
                    .map(Tag::as_byte)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        OpsError::wrong_shape(format!("Some elements are not bytes: {input}"))
                    })
            }),
        }
    }

    fn get_int_stream(&self, input: &Tag) -> DataResult<Vec<i32>> {
        match input {
            Tag::IntArray(array) => Ok(array.as_slice().to_vec()),
            _ => self.get_stream(input).map_err(OpsError::retype).and_then(|values| {
                values
                    .iter()
                    .map(Tag::as_int)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        OpsError::wrong_shape(format!("Some elements are not ints: {input}"))
                    })
            }),
        }
    }

    fn get_long_stream(&self, input: &Tag) -> DataResult<Vec<i64>> {
        match input {
            Tag::LongArray(array) => Ok(array.as_slice().to_vec()),
            _ => self.get_stream(input).map_err(OpsError::retype).and_then(|values| {
                values
                    .iter()
                    .map(Tag::as_long)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| {
                        OpsError::wrong_shape(format!("Some elements are not longs: {input}"))
                    })
            }),
        }
    }

    fn get_map_values(&self, input: &Tag) -> DataResult<Vec<(Tag, Tag)>> {
        match input {
            Tag::Compound(compound) => Ok(CompoundView { compound }.entries()),
            other => Err(OpsError::wrong_shape(format!("Not a map: {other}"))),
        }
    }

    fn get_map<'a>(&'a self, input: &'a Tag) -> DataResult<Box<dyn MapLike<Tag> + 'a>> {
        match input {
            Tag::Compound(compound) => Ok(Box::new(CompoundView { compound })),
            other => Err(OpsError::wrong_shape(format!("Not a map: {other}"))),
        }
    }

    fn merge_to_list(&self, list: Tag, value: Tag) -> DataResult<Tag> {
        match ListMerger::from_base(&list) {
            Some(merger) => Ok(merger.merge(value).finish()),
            None => Err(OpsError::wrong_shape(format!(
                "mergeToList called with not a list: {list}"
            ))
            .with_partial(list)),
        }
    }

    fn merge_to_list_all(&self, list: Tag, values: Vec<Tag>) -> DataResult<Tag> {
        match ListMerger::from_base(&list) {
            Some(merger) => Ok(merger.merge_all(values).finish()),
            None => Err(OpsError::wrong_shape(format!(
                "mergeToList called with not a list: {list}"
            ))
            .with_partial(list)),
        }
    }

    fn merge_to_map(&self, map: Tag, key: Tag, value: Tag) -> DataResult<Tag> {
        if !matches!(map, Tag::End | Tag::Compound(_)) {
            return Err(
                OpsError::wrong_shape(format!("mergeToMap called with not a map: {map}"))
                    .with_partial(map),
            );
        }
        let Tag::String(name) = key else {
            return Err(OpsError::non_string_keys(
                format!("key is not a string: {key}"),
                vec![key],
                map,
            ));
        };
        let mut compound = base_compound(map);
        compound.put(name, value);
        Ok(Tag::Compound(compound))
    }

    fn merge_to_map_entries(&self, map: Tag, entries: Vec<(Tag, Tag)>) -> DataResult<Tag> {
        if !matches!(map, Tag::End | Tag::Compound(_)) {
            return Err(
                OpsError::wrong_shape(format!("mergeToMap called with not a map: {map}"))
                    .with_partial(map),
            );
        }
        if entries.is_empty() {
            return Ok(match map {
                Tag::End => self.empty_map(),
                other => other,
            });
        }
        let mut compound = base_compound(map);
        let mut rejected = Vec::new();
        for (key, value) in entries {
            match key {
                Tag::String(name) => {
                    compound.put(name, value);
                }
                other => rejected.push(other),
            }
        }
        let merged = Tag::Compound(compound);
        if rejected.is_empty() {
            return Ok(merged);
        }
        let listed = rejected
            .iter()
            .map(Tag::to_snbt)
            .collect::<Vec<_>>()
            .join(", ");
        Err(OpsError::non_string_keys(
            format!("some keys are not strings: [{listed}]"),
            rejected,
            merged,
        ))
    }

    fn remove(&self, input: &Tag, key: &str) -> Tag {
        match input {
            Tag::Compound(compound) => {
                let mut copy = compound.clone();
                copy.remove(key);
                Tag::Compound(copy)
            }
            other => other.clone(),
        }
    }

    fn convert_to<U: DynamicOps>(&self, out: &U, input: &Tag) -> U::Value {
        match input {
            Tag::End => out.empty(),
            Tag::Byte(v) => out.create_byte(*v),
            Tag::Short(v) => out.create_short(*v),
            Tag::Int(v) => out.create_int(*v),
            Tag::Long(v) => out.create_long(*v),
            Tag::Float(v) => out.create_float(*v),
            Tag::Double(v) => out.create_double(*v),
            Tag::String(v) => out.create_string(v),
            Tag::ByteArray(array) => out.create_byte_list(array.as_slice()),
            Tag::IntArray(array) => out.create_int_list(array.as_slice()),
            Tag::LongArray(array) => out.create_long_list(array.as_slice()),
            Tag::List(_) => self.convert_list(out, input),
            Tag::Compound(_) => self.convert_map(out, input),
        }
    }
}

#[cfg(test)]
#[path = "../tests/nbt_ops_tests.rs"]
mod tests;
