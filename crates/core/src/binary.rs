//! Big-endian binary tag encoding.
//!
//! Layout per kind:
//! - numbers: fixed-width big-endian two's complement / IEEE 754
//! - strings: u16 byte length, then Java modified UTF-8
//! - arrays: i32 element count, then the elements
//! - lists: element type id, i32 count, then bare payloads
//! - compounds: `type id, name, payload` entries closed by a zero byte
//!
//! A list whose elements disagree in kind is written as a compound list,
//! each element wrapped as `{"": element}`. Decoding unwraps any
//! single-entry compound keyed by `""`, so a compound of that exact shape
//! is itself wrapped when it appears in a compound list.

use crate::compound::Compound;
use crate::error::{binary_format_error, NbtResult};
use crate::limits::SizeTracker;
use crate::list::List;
use crate::tag::{utf16_len, Tag, TagKind};

const WRAPPED_KEY: &str = "";

/// Root with a name: `type id, name, payload`. The usual file form.
pub fn write_named(out: &mut Vec<u8>, name: &str, tag: &Tag) -> NbtResult<()> {
    out.push(tag.type_id());
    if tag.kind() == TagKind::End {
        return Ok(());
    }
    write_string(out, name)?;
    write_payload(out, tag)
}

/// Root without a name: `type id, payload`.
pub fn write_unnamed(out: &mut Vec<u8>, tag: &Tag) -> NbtResult<()> {
    out.push(tag.type_id());
    if tag.kind() == TagKind::End {
        return Ok(());
    }
    write_payload(out, tag)
}

/// Named root with an empty name.
pub fn to_bytes(compound: &Compound) -> NbtResult<Vec<u8>> {
    let mut out = Vec::new();
    write_named(&mut out, "", &Tag::Compound(compound.clone()))?;
    tracing::debug!(bytes = out.len(), "encoded tag tree");
    Ok(out)
}

/// Reads a named compound root; the input must end with it.
pub fn from_bytes(input: &[u8], mut tracker: SizeTracker) -> NbtResult<Compound> {
    tracing::debug!(bytes = input.len(), "decoding tag tree");
    let (_, root) = read_named(input, &mut tracker)?;
    match root {
        Tag::Compound(compound) => Ok(compound),
        other => Err(binary_format_error(format!(
            "root tag must be a compound, found {}",
            other.kind()
        ))),
    }
}

pub fn read_named(input: &[u8], tracker: &mut SizeTracker) -> NbtResult<(String, Tag)> {
    let mut decoder = Decoder::new(input, tracker);
    let kind = decoder.kind()?;
    let named = if kind == TagKind::End {
        decoder.tracker.account(Tag::End.size_in_bytes())?;
        (String::new(), Tag::End)
    } else {
        let name = decoder.string()?;
        (name, decoder.payload(kind)?)
    };
    decoder.finish()?;
    Ok(named)
}

pub fn read_unnamed(input: &[u8], tracker: &mut SizeTracker) -> NbtResult<Tag> {
    let mut decoder = Decoder::new(input, tracker);
    let kind = decoder.kind()?;
    let tag = decoder.payload(kind)?;
    decoder.finish()?;
    Ok(tag)
}

fn write_length(out: &mut Vec<u8>, len: usize) -> NbtResult<()> {
    let len = i32::try_from(len)
        .map_err(|_| binary_format_error(format!("length {len} does not fit in an i32")))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn write_string(out: &mut Vec<u8>, value: &str) -> NbtResult<()> {
    let encoded = encode_modified_utf8(value);
    let len = u16::try_from(encoded.len()).map_err(|_| {
        binary_format_error(format!("string of {} bytes is too long", encoded.len()))
    })?;
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&encoded);
    Ok(())
}

fn write_payload(out: &mut Vec<u8>, tag: &Tag) -> NbtResult<()> {
    match tag {
        Tag::End => {}
        Tag::Byte(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::Short(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::Long(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::Float(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::Double(v) => out.extend_from_slice(&v.to_be_bytes()),
        Tag::String(v) => write_string(out, v)?,
        Tag::ByteArray(array) => {
            write_length(out, array.len())?;
            out.extend(array.iter().map(|v| *v as u8));
        }
        Tag::IntArray(array) => {
            write_length(out, array.len())?;
            for v in array.iter() {
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        Tag::LongArray(array) => {
            write_length(out, array.len())?;
            for v in array.iter() {
                out.extend_from_slice(&v.to_be_bytes());
            }
        }
        Tag::List(list) => write_list(out, list)?,
        Tag::Compound(compound) => {
            for (key, value) in compound.iter() {
                out.push(value.type_id());
                write_string(out, key)?;
                write_payload(out, value)?;
            }
            out.push(TagKind::End.id());
        }
    }
    Ok(())
}

fn write_list(out: &mut Vec<u8>, list: &List) -> NbtResult<()> {
    let kind = list.value_type();
    out.push(kind.id());
    write_length(out, list.len())?;
    for item in list.iter() {
        if kind == TagKind::Compound && needs_wrapping(item) {
            out.push(item.type_id());
            write_string(out, WRAPPED_KEY)?;
            write_payload(out, item)?;
            out.push(TagKind::End.id());
        } else {
            write_payload(out, item)?;
        }
    }
    Ok(())
}

fn needs_wrapping(item: &Tag) -> bool {
    match item {
        Tag::Compound(compound) => is_wrapped_entry(compound),
        _ => true,
    }
}

fn is_wrapped_entry(compound: &Compound) -> bool {
    compound.len() == 1 && compound.contains(WRAPPED_KEY)
}

struct Decoder<'a, 't> {
    input: &'a [u8],
    pos: usize,
    tracker: &'t mut SizeTracker,
}

impl<'a, 't> Decoder<'a, 't> {
    fn new(input: &'a [u8], tracker: &'t mut SizeTracker) -> Self {
        Self {
            input,
            pos: 0,
            tracker,
        }
    }

    fn finish(&self) -> NbtResult<()> {
        let left = self.input.len() - self.pos;
        if left != 0 {
            return Err(binary_format_error(format!(
                "{left} trailing bytes after root tag"
            )));
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> NbtResult<&'a [u8]> {
        let input = self.input;
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= input.len())
            .ok_or_else(|| binary_format_error("unexpected end of input"))?;
        let bytes = &input[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> NbtResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn kind(&mut self) -> NbtResult<TagKind> {
        let [id] = self.array::<1>()?;
        TagKind::from_id(id).ok_or_else(|| binary_format_error(format!("unknown tag type {id}")))
    }

    fn length(&mut self) -> NbtResult<usize> {
        let len = i32::from_be_bytes(self.array()?);
        usize::try_from(len).map_err(|_| binary_format_error(format!("negative length {len}")))
    }

    fn string(&mut self) -> NbtResult<String> {
        let len = u16::from_be_bytes(self.array()?);
        decode_modified_utf8(self.take(usize::from(len))?)
    }

    /// Accounts `header + len * width` before taking the elements.
    fn elements(&mut self, header: u64, width: usize) -> NbtResult<&'a [u8]> {
        let len = self.length()?;
        self.tracker
            .account(header.saturating_add((len as u64).saturating_mul(width as u64)))?;
        let bytes = len
            .checked_mul(width)
            .ok_or_else(|| binary_format_error("array length overflows"))?;
        self.take(bytes)
    }

    fn payload(&mut self, kind: TagKind) -> NbtResult<Tag> {
        let tag = match kind {
            TagKind::End => {
                self.tracker.account(Tag::End.size_in_bytes())?;
                Tag::End
            }
            TagKind::Byte => Tag::Byte(i8::from_be_bytes(self.array()?)),
            TagKind::Short => Tag::Short(i16::from_be_bytes(self.array()?)),
            TagKind::Int => Tag::Int(i32::from_be_bytes(self.array()?)),
            TagKind::Long => Tag::Long(i64::from_be_bytes(self.array()?)),
            TagKind::Float => Tag::Float(f32::from_be_bytes(self.array()?)),
            TagKind::Double => Tag::Double(f64::from_be_bytes(self.array()?)),
            TagKind::String => {
                let value = self.string()?;
                self.tracker.account(36 + 2 * utf16_len(&value))?;
                return Ok(Tag::String(value));
            }
            TagKind::ByteArray => {
                let bytes = self.elements(24, 1)?;
                return Ok(Tag::ByteArray(bytes.iter().map(|b| *b as i8).collect()));
            }
            TagKind::IntArray => {
                let bytes = self.elements(24, 4)?;
                return Ok(Tag::IntArray(
                    bytes
                        .chunks_exact(4)
                        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
                        .collect(),
                ));
            }
            TagKind::LongArray => {
                let bytes = self.elements(24, 8)?;
                return Ok(Tag::LongArray(
                    bytes
                        .chunks_exact(8)
                        .map(|c| {
                            i64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                        })
                        .collect(),
                ));
            }
            TagKind::List => return self.list(),
            TagKind::Compound => return self.compound().map(Tag::Compound),
        };
        self.tracker.account(tag.size_in_bytes())?;
        Ok(tag)
    }

    fn list(&mut self) -> NbtResult<Tag> {
        self.tracker.push_depth()?;
        let element = self.kind()?;
        let len = self.length()?;
        self.tracker.account(36 + 4 * len as u64)?;
        if element == TagKind::End && len > 0 {
            return Err(binary_format_error(format!(
                "list of {len} elements has no element type"
            )));
        }
        let remaining = self.input.len() - self.pos;
        let mut items = Vec::with_capacity(len.min(remaining));
        for _ in 0..len {
            let item = self.payload(element)?;
            items.push(match item {
                Tag::Compound(mut compound) if is_wrapped_entry(&compound) => {
                    compound.remove(WRAPPED_KEY).unwrap_or_default()
                }
                other => other,
            });
        }
        self.tracker.pop_depth();
        Ok(Tag::List(List::from(items)))
    }

    fn compound(&mut self) -> NbtResult<Compound> {
        self.tracker.push_depth()?;
        self.tracker.account(48)?;
        let mut compound = Compound::new();
        loop {
            let kind = self.kind()?;
            if kind == TagKind::End {
                break;
            }
            let name = self.string()?;
            self.tracker.account(28 + 2 * utf16_len(&name) + 36)?;
            let value = self.payload(kind)?;
            compound.put(name, value);
        }
        self.tracker.pop_depth();
        Ok(compound)
    }
}

/// Java's modified UTF-8: UTF-16 units, `U+0000` as two bytes, no 4-byte
/// sequences.
pub fn encode_modified_utf8(value: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.len());
    for unit in value.encode_utf16() {
        match unit {
            0x0001..=0x007F => out.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                out.push(0xC0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                out.push(0xE0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                out.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    out
}

pub fn decode_modified_utf8(bytes: &[u8]) -> NbtResult<String> {
    let malformed = || binary_format_error("malformed modified UTF-8");
    let continuation = |byte: Option<&u8>| match byte {
        Some(byte) if byte & 0xC0 == 0x80 => Ok(u16::from(byte & 0x3F)),
        _ => Err(malformed()),
    };
    let mut units = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter();
    while let Some(&byte) = iter.next() {
        let unit = match byte {
            0x00..=0x7F => u16::from(byte),
            0xC0..=0xDF => (u16::from(byte & 0x1F) << 6) | continuation(iter.next())?,
            0xE0..=0xEF => {
                let high = (u16::from(byte & 0x0F) << 12) | (continuation(iter.next())? << 6);
                high | continuation(iter.next())?
            }
            _ => return Err(malformed()),
        };
        units.push(unit);
    }
    String::from_utf16(&units).map_err(|_| malformed())
}

#[cfg(test)]
#[path = "tests/binary_tests.rs"]
mod tests;
