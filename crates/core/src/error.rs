use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::tag::TagKind;

pub type NbtResult<T> = Result<T, NbtError>;

#[derive(Debug, Error, Diagnostic)]
pub enum NbtError {
    #[error("snbt syntax error: {message}")]
    #[diagnostic(code("nbt.snbt_syntax"))]
    Snbt {
        message: String,
        #[source_code]
        src: String,
        #[label("here")]
        span: SourceSpan,
    },
    #[error("unexpected trailing data after value")]
    #[diagnostic(code("nbt.trailing_data"))]
    TrailingData {
        #[source_code]
        src: String,
        #[label("trailing input starts here")]
        span: SourceSpan,
    },
    #[error("expected compound, found {found}")]
    #[diagnostic(code("nbt.expected_compound"))]
    ExpectedCompound {
        found: TagKind,
        #[source_code]
        src: String,
        #[label("this value")]
        span: SourceSpan,
    },
    #[error("binary format error: {0}")]
    #[diagnostic(code("nbt.binary_format"))]
    BinaryFormat(String),
    #[error("size limit exceeded: {0}")]
    #[diagnostic(code("nbt.size_limit"))]
    SizeLimit(String),
    #[error("Entry {0} missing from palette")]
    #[diagnostic(code("nbt.missing_palette_entry"))]
    MissingPaletteEntry(String),
    #[error("provider form error: {0}")]
    #[diagnostic(code("nbt.provider_form"))]
    ProviderForm(String),
    #[error("io error: {0}")]
    #[diagnostic(code("nbt.io"))]
    Io(#[from] std::io::Error),
}

impl NbtError {
    pub(crate) fn snbt(message: impl Into<String>, src: &str, offset: usize) -> Self {
        NbtError::Snbt {
            message: message.into(),
            src: src.to_string(),
            span: point(src, offset),
        }
    }

    /// Byte offset into the source of textual errors, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            NbtError::Snbt { span, .. }
            | NbtError::TrailingData { span, .. }
            | NbtError::ExpectedCompound { span, .. } => Some(span.offset()),
            _ => None,
        }
    }
}

pub(crate) fn point(src: &str, offset: usize) -> SourceSpan {
    let offset = offset.min(src.len());
    let len = src
        .get(offset..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    (offset, len).into()
}

#[cold]
#[inline(never)]
pub(crate) fn binary_format_error(message: impl Into<String>) -> NbtError {
    NbtError::BinaryFormat(message.into())
}
