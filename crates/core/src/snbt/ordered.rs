//! Deterministic multi-line SNBT for authored structure files.
//!
//! Layout depends on the path of each container from the root: `{}` for a
//! compound, the key for a compound entry and `[]` for a list, joined with
//! dots. A handful of paths are kept on one line and a few compounds list
//! well-known keys first.

use std::fmt::Write;

use crate::compound::Compound;
use crate::list::List;
use crate::snbt::writer::quote_string;
use crate::tag::Tag;

const INDENT: &str = "    ";

const INLINE_PATHS: [&str; 4] = [
    "{}.size.[]",
    "{}.data.[].{}",
    "{}.palette.[].{}",
    "{}.entities.[].{}",
];

fn key_priority(path: &str) -> Option<&'static [&'static str]> {
    match path {
        "{}" => Some(&[
            "DataVersion",
            "author",
            "size",
            "data",
            "entities",
            "palette",
            "palettes",
        ]),
        "{}.data.[].{}" => Some(&["pos", "state", "nbt"]),
        "{}.entities.[].{}" => Some(&["blockPos", "pos"]),
        _ => None,
    }
}

/// Keys matching `[A-Za-z0-9._+-]+` stay bare.
fn escape_name(name: &str) -> String {
    let simple = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
    if simple {
        name.to_string()
    } else {
        quote_string(name)
    }
}

pub fn to_ordered_string(tag: &Tag) -> String {
    let mut formatter = OrderedFormatter {
        path: Vec::new(),
    };
    formatter.format(tag, INDENT, 0)
}

struct OrderedFormatter {
    path: Vec<String>,
}

impl OrderedFormatter {
    fn joined_path(&self) -> String {
        self.path.join(".")
    }

    /// Indent unit for the container just pushed; empty keeps it on one line.
    fn indent_for_current<'p>(&self, inherited: &'p str) -> &'p str {
        let path = self.joined_path();
        if INLINE_PATHS.contains(&path.as_str()) {
            ""
        } else {
            inherited
        }
    }

    fn format(&mut self, tag: &Tag, indent: &str, depth: usize) -> String {
        match tag {
            Tag::End => "END".to_string(),
            Tag::Byte(v) => format!("{v}b"),
            Tag::Short(v) => format!("{v}s"),
            Tag::Int(v) => v.to_string(),
            Tag::Long(v) => format!("{v}L"),
            Tag::Float(v) => format!("{v:?}f"),
            Tag::Double(v) => format!("{v:?}d"),
            Tag::String(v) => quote_string(v),
            Tag::ByteArray(array) => typed_array("B", array.iter().map(|v| format!("{v}B"))),
            Tag::IntArray(array) => typed_array("I", array.iter().map(i32::to_string)),
            Tag::LongArray(array) => typed_array("L", array.iter().map(|v| format!("{v}L"))),
            Tag::List(list) => self.format_list(list, indent, depth),
            Tag::Compound(compound) => self.format_compound(compound, indent, depth),
        }
    }

    fn format_list(&mut self, list: &List, indent: &str, depth: usize) -> String {
        if list.is_empty() {
            return "[]".to_string();
        }
        self.path.push("[]".to_string());
        let indent = self.indent_for_current(indent);
        let mut out = String::from("[");
        if !indent.is_empty() {
            out.push('\n');
        }
        for (index, item) in list.iter().enumerate() {
            out.push_str(&indent.repeat(depth + 1));
            let rendered = self.format(item, indent, depth + 1);
            out.push_str(&rendered);
            if index + 1 != list.len() {
                out.push_str(if indent.is_empty() { ", " } else { ",\n" });
            }
        }
        if !indent.is_empty() {
            out.push('\n');
            out.push_str(&indent.repeat(depth));
        }
        out.push(']');
        self.path.pop();
        out
    }

    fn sorted_keys<'c>(&self, compound: &'c Compound) -> Vec<&'c str> {
        let mut rest: Vec<&str> = compound.keys().collect();
        let mut keys = Vec::with_capacity(rest.len());
        if let Some(priority) = key_priority(&self.joined_path()) {
            for name in priority {
                if let Some(found) = rest.iter().position(|key| key == name) {
                    keys.push(rest.remove(found));
                }
            }
        }
        rest.sort_unstable();
        keys.extend(rest);
        keys
    }

    fn format_compound(&mut self, compound: &Compound, indent: &str, depth: usize) -> String {
        if compound.is_empty() {
            return "{}".to_string();
        }
        self.path.push("{}".to_string());
        let indent = self.indent_for_current(indent);
        let entry_indent = indent.repeat(depth + 1);
        let keys = self.sorted_keys(compound);
        let mut out = String::from("{");
        if !indent.is_empty() {
            out.push('\n');
        }
        for (index, key) in keys.iter().enumerate() {
            let Some(value) = compound.get(key) else {
                continue;
            };
            self.path.push((*key).to_string());
            let rendered = self.format(value, indent, depth + 1);
            self.path.pop();
            let _ = write!(out, "{entry_indent}{}: {rendered}", escape_name(key));
            if index + 1 != keys.len() {
                out.push_str(if indent.is_empty() { ", " } else { ",\n" });
            }
        }
        if !indent.is_empty() {
            out.push('\n');
            out.push_str(&indent.repeat(depth));
        }
        out.push('}');
        self.path.pop();
        out
    }
}

fn typed_array(prefix: &str, values: impl ExactSizeIterator<Item = String>) -> String {
    let len = values.len();
    let mut out = format!("[{prefix};");
    for (index, value) in values.enumerate() {
        out.push(' ');
        out.push_str(&value);
        if index + 1 != len {
            out.push(',');
        }
    }
    out.push(']');
    out
}
