use std::fmt::{self, Write};

use crate::compound::Compound;
use crate::tag::Tag;

/// Escape body for `c` (without the backslash), if it needs one.
pub fn escape_special_char(c: char) -> Option<String> {
    match c {
        '\u{8}' => Some("b".to_string()),
        '\t' => Some("t".to_string()),
        '\n' => Some("n".to_string()),
        '\u{c}' => Some("f".to_string()),
        '\r' => Some("r".to_string()),
        c if c < ' ' => Some(format!("x{:02X}", c as u32)),
        _ => None,
    }
}

/// Quotes `value`, picking whichever quote character the text does not
/// open with so that most strings need no quote escapes.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    push_quoted(&mut out, value);
    out
}

pub(crate) fn push_quoted(out: &mut String, value: &str) {
    let quote = value
        .chars()
        .find(|c| matches!(c, '"' | '\''))
        .map_or('"', |first| if first == '"' { '\'' } else { '"' });
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => match escape_special_char(c) {
                Some(escape) => {
                    out.push('\\');
                    out.push_str(&escape);
                }
                None => out.push(c),
            },
        }
    }
    out.push(quote);
}

/// `[A-Za-z._]+[A-Za-z0-9._+-]*`, the keys written without quotes.
pub(crate) fn is_bare_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || matches!(c, '.' | '_') => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
}

/// Compact SNBT: no whitespace, keys sorted.
pub fn write(tag: &Tag) -> String {
    let mut out = String::new();
    write_tag(&mut out, tag);
    out
}

fn push_fmt(out: &mut String, args: fmt::Arguments<'_>) {
    // Writing into a String cannot fail.
    let _ = out.write_fmt(args);
}

fn write_tag(out: &mut String, tag: &Tag) {
    match tag {
        Tag::End => out.push_str("END"),
        Tag::Byte(v) => push_fmt(out, format_args!("{v}b")),
        Tag::Short(v) => push_fmt(out, format_args!("{v}s")),
        Tag::Int(v) => push_fmt(out, format_args!("{v}")),
        Tag::Long(v) => push_fmt(out, format_args!("{v}L")),
        Tag::Float(v) => push_fmt(out, format_args!("{v:?}f")),
        Tag::Double(v) => push_fmt(out, format_args!("{v:?}d")),
        Tag::String(v) => push_quoted(out, v),
        Tag::ByteArray(array) => {
            out.push_str("[B;");
            write_joined(out, array.iter(), |out, v| push_fmt(out, format_args!("{v}B")));
        }
        Tag::IntArray(array) => {
            out.push_str("[I;");
            write_joined(out, array.iter(), |out, v| push_fmt(out, format_args!("{v}")));
        }
        Tag::LongArray(array) => {
            out.push_str("[L;");
            write_joined(out, array.iter(), |out, v| push_fmt(out, format_args!("{v}L")));
        }
        Tag::List(list) => {
            out.push('[');
            write_joined(out, list.iter(), write_tag);
        }
        Tag::Compound(compound) => write_compound(out, compound),
    }
}

/// Comma-separated items followed by the closing `]`.
fn write_joined<T>(
    out: &mut String,
    items: impl Iterator<Item = T>,
    mut each: impl FnMut(&mut String, T),
) {
    for (index, item) in items.enumerate() {
        if index != 0 {
            out.push(',');
        }
        each(out, item);
    }
    out.push(']');
}

fn write_compound(out: &mut String, compound: &Compound) {
    out.push('{');
    for (index, (key, value)) in compound.iter().enumerate() {
        if index != 0 {
            out.push(',');
        }
        if is_bare_key(key) {
            out.push_str(key);
        } else {
            push_quoted(out, key);
        }
        out.push(':');
        write_tag(out, value);
    }
    out.push('}');
}
