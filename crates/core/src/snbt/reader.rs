use uuid::Uuid;

use crate::error::{NbtError, NbtResult};
use crate::number::Number;
use crate::ops::DynamicOps;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IntKind {
    Byte,
    Short,
    Int,
    Long,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FloatKind {
    Float,
    Double,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArrayKind {
    Byte,
    Int,
    Long,
}

impl ArrayKind {
    fn element(self) -> IntKind {
        match self {
            ArrayKind::Byte => IntKind::Byte,
            ArrayKind::Int => IntKind::Int,
            ArrayKind::Long => IntKind::Long,
        }
    }

    /// Suffixed elements must be no wider than the array.
    fn allows(self, kind: IntKind) -> bool {
        match self {
            ArrayKind::Byte => kind == IntKind::Byte,
            ArrayKind::Int => matches!(kind, IntKind::Byte | IntKind::Short | IntKind::Int),
            ArrayKind::Long => true,
        }
    }
}

/// A scanned integer literal, decoded once its target width is known.
#[derive(Debug)]
struct IntLiteral {
    start: usize,
    negative: bool,
    radix: u32,
    digits: String,
    signed: Option<bool>,
    kind: Option<IntKind>,
}

impl IntLiteral {
    fn is_signed(&self) -> bool {
        self.signed.unwrap_or(self.radix == 10)
    }

    fn decode(&self, kind: IntKind) -> Result<Number, String> {
        if self.negative && !self.is_signed() {
            return Err("expected non-negative number".to_string());
        }
        let mut text = String::with_capacity(self.digits.len() + 1);
        if self.negative {
            text.push('-');
        }
        text.extend(self.digits.chars().filter(|c| *c != '_'));
        let radix = self.radix;
        let parsed = if self.is_signed() {
            match kind {
                IntKind::Byte => i8::from_str_radix(&text, radix).map(Number::Byte),
                IntKind::Short => i16::from_str_radix(&text, radix).map(Number::Short),
                IntKind::Int => i32::from_str_radix(&text, radix).map(Number::Int),
                IntKind::Long => i64::from_str_radix(&text, radix).map(Number::Long),
            }
        } else {
            match kind {
                IntKind::Byte => u8::from_str_radix(&text, radix).map(|v| Number::Byte(v as i8)),
                IntKind::Short => {
                    u16::from_str_radix(&text, radix).map(|v| Number::Short(v as i16))
                }
                IntKind::Int => u32::from_str_radix(&text, radix).map(|v| Number::Int(v as i32)),
                IntKind::Long => u64::from_str_radix(&text, radix).map(|v| Number::Long(v as i64)),
            }
        };
        parsed.map_err(|err| format!("number parse failure: {err}"))
    }
}

pub(crate) fn is_decimal_char(c: char) -> bool {
    matches!(c, '+' | '-' | '.' | '0'..='9')
}

pub(crate) fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

fn create_number<O: DynamicOps>(ops: &O, number: Number) -> O::Value {
    match number {
        Number::Byte(v) => ops.create_byte(v),
        Number::Short(v) => ops.create_short(v),
        Number::Int(v) => ops.create_int(v),
        Number::Long(v) => ops.create_long(v),
        Number::Float(v) => ops.create_float(v),
        Number::Double(v) => ops.create_double(v),
    }
}

/// Cursor over SNBT text producing values through an ops backend.
pub struct SnbtReader<'a, O: DynamicOps> {
    ops: &'a O,
    src: &'a str,
    pos: usize,
}

impl<'a, O: DynamicOps> SnbtReader<'a, O> {
    pub fn new(ops: &'a O, src: &'a str) -> Self {
        Self { ops, src, pos: 0 }
    }

    /// Byte offset of the next unread character.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Reads one complete value, leaving the cursor just past it.
    pub fn read_value(&mut self) -> NbtResult<O::Value> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(self.error("expected value")),
            Some(c) if is_decimal_char(c) => self.read_numeric(),
            Some('"' | '\'') => {
                let text = self.read_quoted()?;
                Ok(self.ops.create_string(&text))
            }
            Some('{') => self.read_map(),
            Some('[') => self.read_list(),
            Some(_) => self.read_unquoted_or_builtin(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_ignore_case(&mut self, expected: char) -> bool {
        match self.peek() {
            Some(c) if c.eq_ignore_ascii_case(&expected) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect(&mut self, expected: char) -> NbtResult<()> {
        self.skip_whitespace();
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{expected}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> NbtError {
        NbtError::snbt(message, self.src, self.pos)
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> NbtError {
        NbtError::snbt(message, self.src, offset)
    }

    fn read_numeric(&mut self) -> NbtResult<O::Value> {
        let start = self.pos;
        if let Some(value) = self.read_float()? {
            return Ok(value);
        }
        match self.read_int_literal()? {
            Some(literal) => {
                let number = literal
                    .decode(literal.kind.unwrap_or(IntKind::Int))
                    .map_err(|message| self.error_at(literal.start, message))?;
                Ok(create_number(self.ops, number))
            }
            None => Err(self.error_at(start, "invalid unquoted start")),
        }
    }

    fn read_sign(&mut self) -> bool {
        if self.eat('-') {
            true
        } else {
            self.eat('+');
            false
        }
    }

    /// Digits of one radix with inner underscores; `None` when there are none.
    fn scan_numeral(&mut self, accepts: fn(char) -> bool) -> NbtResult<Option<String>> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !(accepts(c) || c == '_') {
                break;
            }
            self.pos += 1;
        }
        let digits = &self.src[start..self.pos];
        if digits.is_empty() {
            return Ok(None);
        }
        if digits.starts_with('_') || digits.ends_with('_') {
            return Err(self.error_at(start, "underscore not allowed"));
        }
        Ok(Some(digits.to_string()))
    }

    fn scan_decimal(&mut self) -> NbtResult<Option<String>> {
        self.scan_numeral(|c| c.is_ascii_digit())
    }

    fn read_exponent(&mut self) -> NbtResult<Option<(bool, String)>> {
        let start = self.pos;
        if !self.eat_ignore_case('e') {
            return Ok(None);
        }
        let negative = self.read_sign();
        match self.scan_decimal()? {
            Some(digits) => Ok(Some((negative, digits))),
            None => {
                self.pos = start;
                Ok(None)
            }
        }
    }

    fn read_float_suffix(&mut self) -> Option<FloatKind> {
        if self.eat_ignore_case('f') {
            Some(FloatKind::Float)
        } else if self.eat_ignore_case('d') {
            Some(FloatKind::Double)
        } else {
            None
        }
    }

    /// Float forms: `1.`, `1.5`, `.5`, `1e3`, `1f`, each with optional
    /// exponent and `f`/`d` suffix. Restores the cursor when none match.
    fn read_float(&mut self) -> NbtResult<Option<O::Value>> {
        let start = self.pos;
        let negative = self.read_sign();
        let whole = self.scan_decimal()?;

        let (fraction, exponent, kind) = if self.eat('.') {
            let fraction = self.scan_decimal()?;
            if whole.is_none() && fraction.is_none() {
                self.pos = start;
                return Ok(None);
            }
            let exponent = self.read_exponent()?;
            (fraction, exponent, self.read_float_suffix())
        } else if whole.is_some() {
            let exponent = self.read_exponent()?;
            let kind = self.read_float_suffix();
            if exponent.is_none() && kind.is_none() {
                self.pos = start;
                return Ok(None);
            }
            (None, exponent, kind)
        } else {
            self.pos = start;
            return Ok(None);
        };

        let mut text = String::new();
        if negative {
            text.push('-');
        }
        text.extend(whole.as_deref().unwrap_or("0").chars().filter(|c| *c != '_'));
        text.push('.');
        text.extend(fraction.as_deref().unwrap_or("0").chars().filter(|c| *c != '_'));
        if let Some((exp_negative, digits)) = exponent {
            text.push('e');
            if exp_negative {
                text.push('-');
            }
            text.extend(digits.chars().filter(|c| *c != '_'));
        }

        let value = match kind.unwrap_or(FloatKind::Double) {
            FloatKind::Float => {
                let value: f32 = text
                    .parse()
                    .map_err(|err| self.error_at(start, format!("number parse failure: {err}")))?;
                if !value.is_finite() {
                    return Err(self.error_at(start, "infinity not allowed"));
                }
                self.ops.create_float(value)
            }
            FloatKind::Double => {
                let value: f64 = text
                    .parse()
                    .map_err(|err| self.error_at(start, format!("number parse failure: {err}")))?;
                if !value.is_finite() {
                    return Err(self.error_at(start, "infinity not allowed"));
                }
                self.ops.create_double(value)
            }
        };
        Ok(Some(value))
    }

    fn read_int_literal(&mut self) -> NbtResult<Option<IntLiteral>> {
        let start = self.pos;
        let negative = self.read_sign();
        let (radix, digits) = if self.eat('0') {
            if self.eat_ignore_case('x') {
                match self.scan_numeral(|c| c.is_ascii_hexdigit())? {
                    Some(digits) => (16, digits),
                    None => return Err(self.error("expected hex numeral")),
                }
            } else if matches!(self.peek(), Some('b' | 'B'))
                && matches!(self.peek_second(), Some('0' | '1' | '_'))
            {
                self.pos += 1;
                match self.scan_numeral(|c| matches!(c, '0' | '1'))? {
                    Some(digits) => (2, digits),
                    None => return Err(self.error("expected binary numeral")),
                }
            } else if self.scan_decimal()?.is_some() {
                return Err(self.error_at(start, "leading zero not allowed"));
            } else {
                (10, "0".to_string())
            }
        } else {
            match self.scan_decimal()? {
                Some(digits) => (10, digits),
                None => {
                    self.pos = start;
                    return Ok(None);
                }
            }
        };
        let (signed, kind) = self.read_int_suffix();
        Ok(Some(IntLiteral {
            start,
            negative,
            radix,
            digits,
            signed,
            kind,
        }))
    }

    /// `[u|s]?(b|s|i|l)`, case-insensitive; `s` alone means short.
    fn read_int_suffix(&mut self) -> (Option<bool>, Option<IntKind>) {
        fn kind_of(c: Option<char>) -> Option<IntKind> {
            match c.map(|c| c.to_ascii_lowercase()) {
                Some('b') => Some(IntKind::Byte),
                Some('s') => Some(IntKind::Short),
                Some('i') => Some(IntKind::Int),
                Some('l') => Some(IntKind::Long),
                _ => None,
            }
        }

        let first = self.peek().map(|c| c.to_ascii_lowercase());
        let second = kind_of(self.peek_second());
        match (first, second) {
            (Some('u'), Some(kind)) => {
                self.pos += 2;
                (Some(false), Some(kind))
            }
            (Some('s'), Some(kind)) => {
                self.pos += 2;
                (Some(true), Some(kind))
            }
            (Some(_), _) => match kind_of(self.peek()) {
                Some(kind) => {
                    self.pos += 1;
                    (None, Some(kind))
                }
                None => (None, None),
            },
            (None, _) => (None, None),
        }
    }

    fn read_quoted(&mut self) -> NbtResult<String> {
        let start = self.pos;
        let quote = match self.bump() {
            Some(c @ ('"' | '\'')) => c,
            _ => return Err(self.error_at(start, "expected quoted string")),
        };
        let mut text = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(format!("expected '{quote}'"))),
                Some(c) if c == quote => return Ok(text),
                Some('\\') => text.push(self.read_escape()?),
                Some(c) => text.push(c),
            }
        }
    }

    fn read_escape(&mut self) -> NbtResult<char> {
        let start = self.pos;
        let escaped = match self.bump() {
            Some('b') => '\u{8}',
            Some('s') => ' ',
            Some('t') => '\t',
            Some('n') => '\n',
            Some('f') => '\u{c}',
            Some('r') => '\r',
            Some(c @ ('\\' | '\'' | '"')) => c,
            Some('x') => self.read_hex_escape(2)?,
            Some('u') => self.read_hex_escape(4)?,
            Some('U') => self.read_hex_escape(8)?,
            Some('N') => {
                if !self.eat('{') {
                    return Err(self.error("expected '{'"));
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '-' || c == ' ')
                {
                    self.pos += 1;
                }
                if !self.eat('}') {
                    return Err(self.error("expected '}'"));
                }
                return Err(self.error_at(start, "invalid character name"));
            }
            _ => return Err(self.error_at(start, "invalid escape sequence")),
        };
        Ok(escaped)
    }

    fn read_hex_escape(&mut self, len: usize) -> NbtResult<char> {
        let start = self.pos;
        let digits = self.src[start..]
            .chars()
            .take(len)
            .take_while(char::is_ascii_hexdigit)
            .count();
        if digits != len {
            return Err(self.error_at(start, format!("expected hex escape of length {len}")));
        }
        self.pos += len;
        let code = u32::from_str_radix(&self.src[start..self.pos], 16)
            .map_err(|err| self.error_at(start, format!("number parse failure: {err}")))?;
        char::from_u32(code)
            .ok_or_else(|| self.error_at(start, format!("invalid codepoint: U+{code:08X}")))
    }

    fn scan_unquoted(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_unquoted_char(c)) {
            self.pos += 1;
        }
        &src[start..self.pos]
    }

    fn read_unquoted_or_builtin(&mut self) -> NbtResult<O::Value> {
        let start = self.pos;
        let word = self.scan_unquoted();
        if word.is_empty() {
            return Err(self.error("expected unquoted string"));
        }

        let before_args = self.pos;
        self.skip_whitespace();
        if self.eat('(') {
            let args = self.read_sequence(')', Self::read_value)?;
            return self.apply_builtin(start, word, args);
        }
        self.pos = before_args;

        if word.eq_ignore_ascii_case("true") {
            Ok(self.ops.create_boolean(true))
        } else if word.eq_ignore_ascii_case("false") {
            Ok(self.ops.create_boolean(false))
        } else {
            Ok(self.ops.create_string(word))
        }
    }

    fn apply_builtin(
        &self,
        start: usize,
        name: &str,
        args: Vec<O::Value>,
    ) -> NbtResult<O::Value> {
        match (name, args.as_slice()) {
            ("bool", [arg]) => self
                .ops
                .get_boolean_value(arg)
                .map(|value| self.ops.create_boolean(value))
                .map_err(|_| self.error_at(start, "expected number or boolean")),
            ("uuid", [arg]) => {
                let text = self
                    .ops
                    .get_string_value(arg)
                    .map_err(|_| self.error_at(start, "expected string"))?;
                let uuid = Uuid::parse_str(&text)
                    .map_err(|_| self.error_at(start, format!("invalid uuid: {text}")))?;
                let bits = uuid.as_u128();
                let words = [
                    (bits >> 96) as u32 as i32,
                    (bits >> 64) as u32 as i32,
                    (bits >> 32) as u32 as i32,
                    bits as u32 as i32,
                ];
                Ok(self.ops.create_int_list(&words))
            }
            _ => Err(self.error_at(
                start,
                format!("no such operation: {name}/{}", args.len()),
            )),
        }
    }

    /// Comma-separated items up to `close`, trailing comma allowed.
    fn read_sequence<T>(
        &mut self,
        close: char,
        mut item: impl FnMut(&mut Self) -> NbtResult<T>,
    ) -> NbtResult<Vec<T>> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.eat(close) {
                return Ok(items);
            }
            items.push(item(self)?);
            self.skip_whitespace();
            if !self.eat(',') {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn read_key(&mut self) -> NbtResult<String> {
        self.skip_whitespace();
        let start = self.pos;
        let key = match self.peek() {
            Some('"' | '\'') => self.read_quoted()?,
            _ => {
                let word = self.scan_unquoted();
                if word.is_empty() {
                    return Err(self.error("expected unquoted string"));
                }
                word.to_string()
            }
        };
        if key.is_empty() {
            return Err(self.error_at(start, "empty key"));
        }
        Ok(key)
    }

    fn read_map(&mut self) -> NbtResult<O::Value> {
        self.expect('{')?;
        let entries = self.read_sequence('}', |reader| {
            let key = reader.read_key()?;
            reader.expect(':')?;
            let value = reader.read_value()?;
            Ok((key, value))
        })?;
        if entries.is_empty() {
            return Ok(self.ops.empty_map());
        }
        let entries = entries
            .into_iter()
            .map(|(key, value)| (self.ops.create_string(&key), value))
            .collect();
        Ok(self.ops.create_map(entries))
    }

    fn read_array_prefix(&mut self) -> Option<ArrayKind> {
        let start = self.pos;
        let kind = match self.bump() {
            Some('B') => ArrayKind::Byte,
            Some('I') => ArrayKind::Int,
            Some('L') => ArrayKind::Long,
            _ => {
                self.pos = start;
                return None;
            }
        };
        self.skip_whitespace();
        if self.eat(';') {
            Some(kind)
        } else {
            self.pos = start;
            None
        }
    }

    fn read_list(&mut self) -> NbtResult<O::Value> {
        self.expect('[')?;
        self.skip_whitespace();
        if let Some(kind) = self.read_array_prefix() {
            return self.read_array_body(kind);
        }
        let values = self.read_sequence(']', Self::read_value)?;
        if values.is_empty() {
            return Ok(self.ops.empty_list());
        }
        Ok(self.ops.create_list(values))
    }

    fn read_array_body(&mut self, kind: ArrayKind) -> NbtResult<O::Value> {
        let literals = self.read_sequence(']', |reader| match reader.read_int_literal()? {
            Some(literal) => Ok(literal),
            None => Err(reader.error("expected integer literal")),
        })?;
        let mut numbers = Vec::with_capacity(literals.len());
        for literal in &literals {
            let element = match literal.kind {
                None => kind.element(),
                Some(suffixed) if kind.allows(suffixed) => suffixed,
                Some(_) => {
                    return Err(self.error_at(literal.start, "invalid array element type"));
                }
            };
            let number = literal
                .decode(element)
                .map_err(|message| self.error_at(literal.start, message))?;
            numbers.push(number);
        }
        Ok(match kind {
            ArrayKind::Byte => {
                let values: Vec<i8> = numbers.into_iter().map(Number::byte_value).collect();
                self.ops.create_byte_list(&values)
            }
            ArrayKind::Int => {
                let values: Vec<i32> = numbers.into_iter().map(Number::int_value).collect();
                self.ops.create_int_list(&values)
            }
            ArrayKind::Long => {
                let values: Vec<i64> = numbers.into_iter().map(Number::long_value).collect();
                self.ops.create_long_list(&values)
            }
        })
    }
}
