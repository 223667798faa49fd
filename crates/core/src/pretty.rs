//! Human-oriented dump of a tag tree.
//!
//! Unlike SNBT the output is not meant to be parsed back: arrays are shown
//! as hex blocks, lists and arrays carry their length, and compound keys are
//! padded into a column. Indentation is two spaces per depth, measured from
//! the start of the current line so that a container opened after a key
//! lines up with its siblings.

use std::fmt::Write;

use crate::compound::Compound;
use crate::list::List;
use crate::tag::Tag;

const VALUES_PER_LINE: usize = 16;
const SKIPPED_ARRAY: &str = " // Skipped, supply withBinaryBlobs true";

/// Renders `tag`; array values are only printed with `with_array_contents`.
pub fn to_formatted_string(tag: &Tag, with_array_contents: bool) -> String {
    let mut printer = PrettyPrinter {
        out: String::new(),
        with_array_contents,
    };
    printer.tag(tag, 0);
    printer.out
}

struct PrettyPrinter {
    out: String,
    with_array_contents: bool,
}

impl PrettyPrinter {
    fn column(&self) -> usize {
        let line_start = self.out.rfind('\n').map_or(0, |index| index + 1);
        self.out[line_start..].chars().count()
    }

    /// Pads the current line up to `2 * depth` columns; never removes.
    fn indent(&mut self, depth: usize) -> &mut String {
        let wanted = 2 * depth;
        let column = self.column();
        if wanted > column {
            self.out.extend(std::iter::repeat(' ').take(wanted - column));
        }
        &mut self.out
    }

    fn tag(&mut self, tag: &Tag, depth: usize) {
        match tag {
            Tag::End => {}
            Tag::ByteArray(array) => {
                let hex = array.iter().map(|value| format!("0x{:02X}", *value as u8));
                self.array("byte", array.len(), hex, depth);
            }
            Tag::IntArray(array) => {
                let width = array.iter().map(|v| format!("{v:X}").len()).max().unwrap_or(0);
                let hex = array.iter().map(|value| format!("0x{value:0width$X}"));
                self.array("int", array.len(), hex, depth);
            }
            Tag::LongArray(array) => {
                let width = array.iter().map(|v| format!("{v:X}").len()).max().unwrap_or(0);
                let hex = array.iter().map(|value| format!("0x{value:0width$X}"));
                self.array("long", array.len(), hex, depth);
            }
            Tag::List(list) => self.list(list, depth),
            Tag::Compound(compound) => self.compound(compound, depth),
            primitive => self.out.push_str(&primitive.to_snbt()),
        }
    }

    fn array(&mut self, label: &str, len: usize, hex: impl Iterator<Item = String>, depth: usize) {
        let _ = writeln!(self.indent(depth), "{label}[{len}] {{");
        if self.with_array_contents {
            self.indent(depth + 1);
            for (index, value) in hex.enumerate() {
                if index != 0 {
                    self.out.push(',');
                }
                if index % VALUES_PER_LINE == 0 && index > 0 {
                    self.out.push('\n');
                    self.indent(depth + 1);
                } else if index != 0 {
                    self.out.push(' ');
                }
                self.out.push_str(&value);
            }
        } else {
            self.indent(depth + 1).push_str(SKIPPED_ARRAY);
        }
        self.out.push('\n');
        self.indent(depth).push('}');
    }

    fn list(&mut self, list: &List, depth: usize) {
        let _ = write!(self.indent(depth), "list[{}] [", list.len());
        if !list.is_empty() {
            self.out.push('\n');
        }
        for (index, item) in list.iter().enumerate() {
            if index != 0 {
                self.out.push_str(",\n");
            }
            self.indent(depth + 1);
            self.tag(item, depth + 1);
        }
        if !list.is_empty() {
            self.out.push('\n');
        }
        self.indent(depth).push(']');
    }

    fn compound(&mut self, compound: &Compound, depth: usize) {
        self.indent(depth).push('{');
        // A compound opened mid-line (after a key) starts its entries below.
        if self.column() + 1 > 2 * (depth + 1) {
            self.out.push('\n');
            self.indent(depth + 1);
        }
        let key_width = compound.keys().map(|key| key.chars().count()).max().unwrap_or(0);
        for (index, (key, value)) in compound.iter().enumerate() {
            if index != 0 {
                self.out.push_str(",\n");
            }
            let padding = key_width - key.chars().count();
            let _ = write!(self.indent(depth + 1), "\"{key}\"{:padding$}: ", "");
            self.tag(value, depth + 1);
        }
        if !compound.is_empty() {
            self.out.push('\n');
        }
        self.indent(depth).push('}');
    }
}

#[cfg(test)]
#[path = "tests/pretty_tests.rs"]
mod tests;
