//! Format-agnostic construction and decomposition of tree values.
//!
//! Codec and migration code written against [`DynamicOps`] runs unchanged
//! over tags ([`NbtOps`]) or JSON ([`JsonOps`]); [`convert`] moves a value
//! from one representation to another.

mod json;
mod nbt;

use std::fmt;

use crate::number::Number;

pub use json::JsonOps;
pub use nbt::NbtOps;

/// Success, or an error that may still carry a best-effort value.
pub type DataResult<T> = Result<T, OpsError<T>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpsErrorKind {
    /// Expected a list, map, string or number and got something else.
    WrongShape,
    /// A map key was not string-shaped.
    NonStringKey,
    /// Errors recorded while building a record.
    Builder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OpsError<T> {
    kind: OpsErrorKind,
    message: String,
    partial: Option<T>,
    offending_keys: Vec<T>,
}

impl<T> OpsError<T> {
    pub fn wrong_shape(message: impl Into<String>) -> Self {
        Self {
            kind: OpsErrorKind::WrongShape,
            message: message.into(),
            partial: None,
            offending_keys: Vec::new(),
        }
    }

    pub fn non_string_keys(message: impl Into<String>, keys: Vec<T>, partial: T) -> Self {
        Self {
            kind: OpsErrorKind::NonStringKey,
            message: message.into(),
            partial: Some(partial),
            offending_keys: keys,
        }
    }

    pub(crate) fn builder(message: impl Into<String>, partial: Option<T>) -> Self {
        Self {
            kind: OpsErrorKind::Builder,
            message: message.into(),
            partial,
            offending_keys: Vec::new(),
        }
    }

    pub fn with_partial(mut self, partial: T) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn kind(&self) -> OpsErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn partial(&self) -> Option<&T> {
        self.partial.as_ref()
    }

    pub fn into_partial(self) -> Option<T> {
        self.partial
    }

    pub fn offending_keys(&self) -> &[T] {
        &self.offending_keys
    }

    /// Keeps the message and kind, dropping anything typed by `T`.
    pub fn retype<U>(self) -> OpsError<U> {
        OpsError {
            kind: self.kind,
            message: self.message,
            partial: None,
            offending_keys: Vec::new(),
        }
    }
}

impl<T> fmt::Display for OpsError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<T: fmt::Debug> std::error::Error for OpsError<T> {}

/// Read-only keyed view over a map-shaped value.
pub trait MapLike<T> {
    fn get(&self, key: &T) -> Option<T>;

    fn get_str(&self, key: &str) -> Option<T>;

    fn entries(&self) -> Vec<(T, T)>;
}

impl<T> fmt::Debug for dyn MapLike<T> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapLike").finish_non_exhaustive()
    }
}

/// Owned entry list, the fallback `MapLike` for backends without a native view.
pub struct EntryMap<T> {
    entries: Vec<(T, T)>,
    names: Vec<Option<String>>,
}

impl<T: Clone + PartialEq> EntryMap<T> {
    pub fn new<O: DynamicOps<Value = T> + ?Sized>(ops: &O, entries: Vec<(T, T)>) -> Self {
        let names = entries
            .iter()
            .map(|(key, _)| ops.get_string_value(key).ok())
            .collect();
        Self { entries, names }
    }
}

impl<T: Clone + PartialEq> MapLike<T> for EntryMap<T> {
    fn get(&self, key: &T) -> Option<T> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.clone())
    }

    fn get_str(&self, key: &str) -> Option<T> {
        self.names
            .iter()
            .position(|name| name.as_deref() == Some(key))
            .map(|index| self.entries[index].1.clone())
    }

    fn entries(&self) -> Vec<(T, T)> {
        self.entries.clone()
    }
}

pub trait DynamicOps {
    type Value: Clone + fmt::Debug + fmt::Display + PartialEq;

    fn empty(&self) -> Self::Value;

    fn empty_list(&self) -> Self::Value {
        self.create_list(Vec::new())
    }

    fn empty_map(&self) -> Self::Value {
        self.create_map(Vec::new())
    }

    fn create_numeric(&self, number: Number) -> Self::Value;

    fn create_byte(&self, value: i8) -> Self::Value {
        self.create_numeric(Number::Byte(value))
    }

    fn create_short(&self, value: i16) -> Self::Value {
        self.create_numeric(Number::Short(value))
    }

    fn create_int(&self, value: i32) -> Self::Value {
        self.create_numeric(Number::Int(value))
    }

    fn create_long(&self, value: i64) -> Self::Value {
        self.create_numeric(Number::Long(value))
    }

    fn create_float(&self, value: f32) -> Self::Value {
        self.create_numeric(Number::Float(value))
    }

    fn create_double(&self, value: f64) -> Self::Value {
        self.create_numeric(Number::Double(value))
    }

    fn create_boolean(&self, value: bool) -> Self::Value {
        self.create_byte(i8::from(value))
    }

    fn create_string(&self, value: &str) -> Self::Value;

    fn create_list(&self, values: Vec<Self::Value>) -> Self::Value;

    fn create_map(&self, entries: Vec<(Self::Value, Self::Value)>) -> Self::Value;

    fn create_byte_list(&self, values: &[i8]) -> Self::Value {
        self.create_list(values.iter().map(|value| self.create_byte(*value)).collect())
    }

    fn create_int_list(&self, values: &[i32]) -> Self::Value {
        self.create_list(values.iter().map(|value| self.create_int(*value)).collect())
    }

    fn create_long_list(&self, values: &[i64]) -> Self::Value {
        self.create_list(values.iter().map(|value| self.create_long(*value)).collect())
    }

    fn get_number_value(&self, input: &Self::Value) -> DataResult<Number>;

    fn get_number_value_or(&self, input: &Self::Value, fallback: Number) -> Number {
        self.get_number_value(input).unwrap_or(fallback)
    }

    fn get_boolean_value(&self, input: &Self::Value) -> DataResult<bool> {
        self.get_number_value(input)
            .map(Number::as_boolean)
            .map_err(OpsError::retype)
    }

    fn get_string_value(&self, input: &Self::Value) -> DataResult<String>;

    fn get_stream(&self, input: &Self::Value) -> DataResult<Vec<Self::Value>>;

    fn get_byte_buffer(&self, input: &Self::Value) -> DataResult<Vec<i8>> {
        let values = self.get_stream(input).map_err(OpsError::retype::<Vec<i8>>)?;
        values
            .iter()
            .map(|value| self.get_number_value(value).ok().map(Number::byte_value))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| OpsError::wrong_shape(format!("Some elements are not bytes: {input}")))
    }

    fn get_int_stream(&self, input: &Self::Value) -> DataResult<Vec<i32>> {
        let values = self.get_stream(input).map_err(OpsError::retype::<Vec<i32>>)?;
        values
            .iter()
            .map(|value| self.get_number_value(value).ok().map(Number::int_value))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| OpsError::wrong_shape(format!("Some elements are not ints: {input}")))
    }

    fn get_long_stream(&self, input: &Self::Value) -> DataResult<Vec<i64>> {
        let values = self.get_stream(input).map_err(OpsError::retype::<Vec<i64>>)?;
        values
            .iter()
            .map(|value| self.get_number_value(value).ok().map(Number::long_value))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| OpsError::wrong_shape(format!("Some elements are not longs: {input}")))
    }

    fn get_map_values(&self, input: &Self::Value) -> DataResult<Vec<(Self::Value, Self::Value)>>;

    /// Feeds every `(key, value)` pair of a map to `consumer`.
    fn get_map_entries<F>(&self, input: &Self::Value, mut consumer: F) -> DataResult<()>
    where
        F: FnMut(Self::Value, Self::Value),
    {
        let entries = self.get_map_values(input).map_err(OpsError::retype::<()>)?;
        for (key, value) in entries {
            consumer(key, value);
        }
        Ok(())
    }

    fn get_map<'a>(
        &'a self,
        input: &'a Self::Value,
    ) -> DataResult<Box<dyn MapLike<Self::Value> + 'a>> {
        let entries = self
            .get_map_values(input)
            .map_err(OpsError::retype::<Box<dyn MapLike<Self::Value> + 'a>>)?;
        Ok(Box::new(EntryMap::new(self, entries)))
    }

    /// Appends `value` to the list-shaped `list`; an empty `list` starts one.
    fn merge_to_list(&self, list: Self::Value, value: Self::Value) -> DataResult<Self::Value>;

    fn merge_to_list_all(
        &self,
        list: Self::Value,
        values: Vec<Self::Value>,
    ) -> DataResult<Self::Value> {
        values
            .into_iter()
            .try_fold(list, |acc, value| self.merge_to_list(acc, value))
    }

    fn merge_to_map(
        &self,
        map: Self::Value,
        key: Self::Value,
        value: Self::Value,
    ) -> DataResult<Self::Value>;

    fn merge_to_map_entries(
        &self,
        map: Self::Value,
        entries: Vec<(Self::Value, Self::Value)>,
    ) -> DataResult<Self::Value>;

    fn merge_to_map_like(
        &self,
        map: Self::Value,
        values: &dyn MapLike<Self::Value>,
    ) -> DataResult<Self::Value> {
        self.merge_to_map_entries(map, values.entries())
    }

    /// Copy of `input` without `key`; non-maps come back unchanged.
    fn remove(&self, input: &Self::Value, key: &str) -> Self::Value;

    fn map_builder(&self) -> MapBuilder<'_, Self>
    where
        Self: Sized,
    {
        MapBuilder::new(self)
    }

    fn convert_to<U: DynamicOps>(&self, out: &U, input: &Self::Value) -> U::Value;

    fn convert_list<U: DynamicOps>(&self, out: &U, input: &Self::Value) -> U::Value {
        let values = self.get_stream(input).unwrap_or_default();
        out.create_list(
            values
                .iter()
                .map(|value| self.convert_to(out, value))
                .collect(),
        )
    }

    fn convert_map<U: DynamicOps>(&self, out: &U, input: &Self::Value) -> U::Value {
        let entries = self.get_map_values(input).unwrap_or_default();
        out.create_map(
            entries
                .iter()
                .map(|(key, value)| (self.convert_to(out, key), self.convert_to(out, value)))
                .collect(),
        )
    }
}

/// Re-expresses `value` from `from`'s representation in `to`'s.
pub fn convert<A, B>(from: &A, to: &B, value: &A::Value) -> B::Value
where
    A: DynamicOps,
    B: DynamicOps,
{
    from.convert_to(to, value)
}

/// Accumulates record fields, then merges them onto an initial map.
pub struct MapBuilder<'a, O: DynamicOps> {
    ops: &'a O,
    entries: Vec<(O::Value, O::Value)>,
    errors: Vec<String>,
}

impl<'a, O: DynamicOps> MapBuilder<'a, O> {
    pub fn new(ops: &'a O) -> Self {
        Self {
            ops,
            entries: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn add(&mut self, key: &str, value: O::Value) -> &mut Self {
        let key = self.ops.create_string(key);
        self.entries.push((key, value));
        self
    }

    pub fn add_value(&mut self, key: O::Value, value: O::Value) -> &mut Self {
        self.entries.push((key, value));
        self
    }

    /// Records the error of a failed field, keeping any partial value.
    pub fn add_result(&mut self, key: &str, value: DataResult<O::Value>) -> &mut Self {
        match value {
            Ok(value) => self.add(key, value),
            Err(err) => {
                self.errors.push(err.message().to_string());
                match err.into_partial() {
                    Some(partial) => self.add(key, partial),
                    None => self,
                }
            }
        }
    }

    pub fn with_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.errors.push(message.into());
        self
    }

    /// Merges the fields onto `initial`; absent or empty starts a fresh map.
    pub fn build(self, initial: Option<O::Value>) -> DataResult<O::Value> {
        let base = initial.unwrap_or_else(|| self.ops.empty());
        let merged = self.ops.merge_to_map_entries(base, self.entries);
        if self.errors.is_empty() {
            return merged;
        }
        let partial = match merged {
            Ok(value) => Some(value),
            Err(err) => err.into_partial(),
        };
        Err(OpsError::builder(self.errors.join("; "), partial))
    }
}

#[cfg(test)]
#[path = "../tests/ops_tests.rs"]
mod tests;
