//! Stringified tags: a parser that targets any ops backend, the compact
//! writer and the ordered multi-line writer.

mod ordered;
mod reader;
mod writer;

use crate::compound::Compound;
use crate::error::{point, NbtError, NbtResult};
use crate::ops::{DynamicOps, NbtOps};
use crate::tag::Tag;

pub use ordered::to_ordered_string;
pub use reader::SnbtReader;
pub use writer::{escape_special_char, quote_string, write};

/// Parses one value; anything but whitespace after it is an error.
pub fn read(src: &str) -> NbtResult<Tag> {
    read_with(&NbtOps, src)
}

pub fn read_with<O: DynamicOps>(ops: &O, src: &str) -> NbtResult<O::Value> {
    let mut reader = SnbtReader::new(ops, src);
    let value = reader.read_value()?;
    reader.skip_whitespace();
    if !reader.at_end() {
        return Err(NbtError::TrailingData {
            src: src.to_string(),
            span: point(src, reader.offset()),
        });
    }
    Ok(value)
}

pub fn read_compound(src: &str) -> NbtResult<Compound> {
    match read(src)? {
        Tag::Compound(compound) => Ok(compound),
        other => {
            let start = src.len() - src.trim_start().len();
            let end = src.trim_end().len().max(start);
            Err(NbtError::ExpectedCompound {
                found: other.kind(),
                src: src.to_string(),
                span: (start, end - start).into(),
            })
        }
    }
}

/// Reads a value without requiring the input to end after it, for use
/// inside a larger grammar.
pub fn read_fragment<O: DynamicOps>(reader: &mut SnbtReader<'_, O>) -> NbtResult<O::Value> {
    reader.read_value()
}

#[cfg(test)]
#[path = "../tests/snbt_tests.rs"]
mod tests;
