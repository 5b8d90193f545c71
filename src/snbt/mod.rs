//! SNBT: the JSON-like textual surface for NBT trees (component E).
//!
//! A hand-rolled recursive-descent parser over a `Vec<char>` cursor, in
//! the spirit of the reference codebase's `Lexer` (char-indexed, small
//! fixed lookahead, byte/char-offset-carrying errors) but with a
//! deliberately narrower numeric grammar: the two ABNF-like patterns
//! spelled out for unquoted tokens, not the reference's richer
//! hex/binary/underscore-separated integer grammar.

use std::fmt;

use crate::error::{NbtError, NbtResult};
use crate::settings::{EscapeSequence, HandleInvalidEscape, Indentation, SnbtParseOptions, SnbtWriteOptions};
use crate::tag::{NbtCompound, NbtList, NbtTag};

/// Parses SNBT text into a tag tree using default parse options (only
/// the baseline `\\`/`\'`/`\"` escapes enabled).
pub fn parse(text: &str) -> NbtResult<NbtTag> {
    parse_with_options(text, &SnbtParseOptions::default())
}

pub fn parse_with_options(text: &str, opts: &SnbtParseOptions) -> NbtResult<NbtTag> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
        opts,
    };
    parser.skip_whitespace();
    let tag = parser.read_value()?;
    parser.skip_whitespace();
    if parser.pos != parser.chars.len() {
        return Err(parser.error_here("unexpected trailing characters after value"));
    }
    Ok(tag)
}

/// Formats a tag tree as SNBT. Compact (`Indentation::None`) by default;
/// see [`SnbtWriteOptions`] for pretty-printing.
pub fn stringify(tag: &NbtTag, opts: &SnbtWriteOptions) -> String {
    let mut out = String::new();
    write_value(&mut out, tag, opts, 0);
    out
}

impl fmt::Display for NbtTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opts = if f.alternate() {
            SnbtWriteOptions {
                indentation: Indentation::Spaces(2),
            }
        } else {
            SnbtWriteOptions::default()
        };
        f.write_str(&stringify(self, &opts))
    }
}

// ================================
//      Parser
// ================================

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    opts: &'a SnbtParseOptions,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn error_here(&self, message: impl Into<String>) -> NbtError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, cursor: usize, message: impl Into<String>) -> NbtError {
        NbtError::SnbtSyntax {
            message: message.into(),
            cursor,
        }
    }

    fn read_value(&mut self) -> NbtResult<NbtTag> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.read_compound(),
            Some('[') => self.read_list_or_array(),
            Some('\'') | Some('"') => Ok(NbtTag::String(self.read_quoted_string()?)),
            Some(_) => self.read_unquoted_value(),
            None => Err(self.error_here("expected a value")),
        }
    }

    fn read_compound(&mut self) -> NbtResult<NbtTag> {
        self.advance(); // '{'
        let mut compound = NbtCompound::new();
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.advance();
            return Ok(NbtTag::Compound(compound));
        }
        loop {
            self.skip_whitespace();
            let key = self.read_key()?;
            self.skip_whitespace();
            if self.advance() != Some(':') {
                return Err(self.error_at(self.pos.saturating_sub(1), "expected ':' after compound key"));
            }
            let value = self.read_value()?;
            compound.insert(key, value);
            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.error_at(self.pos.saturating_sub(1), "expected ',' or '}' in compound")),
            }
        }
        Ok(NbtTag::Compound(compound))
    }

    fn read_key(&mut self) -> NbtResult<String> {
        match self.peek() {
            Some('\'') | Some('"') => self.read_quoted_string(),
            Some(c) if allowed_unquoted(c) => Ok(self.read_unquoted_run()),
            _ => Err(self.error_here("expected a compound key")),
        }
    }

    fn read_unquoted_run(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if allowed_unquoted(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_unquoted_value(&mut self) -> NbtResult<NbtTag> {
        if !matches!(self.peek(), Some(c) if allowed_unquoted(c)) {
            return Err(self.error_here(format!("unexpected character {:?}", self.peek())));
        }
        let token = self.read_unquoted_run();
        if self.opts.replace_non_finite {
            if let Some(tag) = try_parse_non_finite(&token) {
                return Ok(tag);
            }
        }
        Ok(classify_unquoted(&token))
    }

    fn read_list_or_array(&mut self) -> NbtResult<NbtTag> {
        self.advance(); // '['
        if let (Some(kind @ ('B' | 'I' | 'L')), Some(';')) = (self.peek(), self.peek_at(1)) {
            self.advance();
            self.advance();
            return self.read_typed_array(kind);
        }

        let mut list = NbtList::new();
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(NbtTag::List(list));
        }
        loop {
            let element_pos = self.pos;
            let value = self.read_value()?;
            list.push(value)
                .map_err(|_| self.error_at(element_pos, "heterogeneous list in SNBT"))?;
            self.skip_whitespace();
            match self.advance() {
                Some(',') => {
                    self.skip_whitespace();
                    continue;
                }
                Some(']') => break,
                _ => return Err(self.error_at(self.pos.saturating_sub(1), "expected ',' or ']' in list")),
            }
        }
        Ok(NbtTag::List(list))
    }

    fn read_typed_array(&mut self, kind: char) -> NbtResult<NbtTag> {
        let mut bytes = Vec::new();
        let mut ints = Vec::new();
        let mut longs = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(finish_typed_array(kind, bytes, ints, longs));
        }

        loop {
            self.skip_whitespace();
            let start = self.pos;
            if !matches!(self.peek(), Some(c) if allowed_unquoted(c)) {
                return Err(self.error_here("expected an integer element in typed array"));
            }
            let token = self.read_unquoted_run();
            let element = try_parse_integer(&token)
                .ok_or_else(|| self.error_at(start, format!("invalid integer literal {token:?} in typed array")))?;
            push_typed_element(kind, element, &mut bytes, &mut ints, &mut longs)
                .map_err(|()| self.error_at(start, format!("{token:?} is not a valid element for this array")))?;

            self.skip_whitespace();
            match self.advance() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(self.error_at(self.pos.saturating_sub(1), "expected ',' or ']' in typed array")),
            }
        }
        Ok(finish_typed_array(kind, bytes, ints, longs))
    }

    fn read_quoted_string(&mut self) -> NbtResult<String> {
        let quote = self.advance().expect("caller already peeked a quote char");
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error_here("unterminated string literal")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escape_start = self.pos - 1;
                    if let Some(c) = self.parse_escape(escape_start)? {
                        out.push(c);
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, escape_start: usize) -> NbtResult<Option<char>> {
        let Some(c) = self.advance() else {
            return Err(self.error_at(escape_start, "unterminated escape sequence"));
        };
        // `\\` and `\<quote>` are always legal, regardless of which quote
        // character is active.
        if c == '\\' || c == '\'' || c == '"' {
            return Ok(Some(c));
        }
        let (seq, replacement) = match c {
            'b' => (EscapeSequence::B, '\x08'),
            's' => (EscapeSequence::S, '\x20'),
            't' => (EscapeSequence::T, '\x09'),
            'n' => (EscapeSequence::N, '\x0a'),
            'f' => (EscapeSequence::F, '\x0c'),
            'r' => (EscapeSequence::R, '\x0d'),
            'x' => return self.parse_unicode_escape(escape_start, 2, EscapeSequence::UnicodeTwo),
            'u' => return self.parse_unicode_escape(escape_start, 4, EscapeSequence::UnicodeFour),
            'U' => return self.parse_unicode_escape(escape_start, 8, EscapeSequence::UnicodeEight),
            'N' => return self.parse_named_escape(escape_start),
            _ => return self.handle_invalid_escape(escape_start, None),
        };
        if self.opts.enabled_escape_sequences.is_enabled(seq) {
            Ok(Some(replacement))
        } else {
            self.handle_invalid_escape(escape_start, Some(replacement))
        }
    }

    fn handle_invalid_escape(
        &self,
        escape_start: usize,
        verbatim: Option<char>,
    ) -> NbtResult<Option<char>> {
        match self.opts.handle_invalid_escape {
            HandleInvalidEscape::Error => {
                Err(self.error_at(escape_start, "unsupported or unknown escape sequence"))
            }
            HandleInvalidEscape::Ignore => Ok(None),
            HandleInvalidEscape::CopyVerbatim => Ok(verbatim),
        }
    }

    fn parse_unicode_escape(
        &mut self,
        escape_start: usize,
        digits: usize,
        seq: EscapeSequence,
    ) -> NbtResult<Option<char>> {
        let mut value: u32 = 0;
        for _ in 0..digits {
            let d = self
                .advance()
                .ok_or_else(|| self.error_at(escape_start, "unterminated unicode escape"))?;
            let digit = d
                .to_digit(16)
                .ok_or_else(|| self.error_at(escape_start, "invalid hex digit in unicode escape"))?;
            value = (value << 4) | digit;
        }
        if !self.opts.enabled_escape_sequences.is_enabled(seq) {
            return self.handle_invalid_escape(escape_start, None);
        }
        char::from_u32(value)
            .map(Some)
            .ok_or_else(|| self.error_at(escape_start, "unicode escape is not a valid character"))
    }

    fn parse_named_escape(&mut self, escape_start: usize) -> NbtResult<Option<char>> {
        if self.advance() != Some('{') {
            return Err(self.error_at(escape_start, "expected '{' after \\N"));
        }
        let name_start = self.pos;
        loop {
            match self.advance() {
                Some('}') => break,
                Some(_) => continue,
                None => return Err(self.error_at(escape_start, "unterminated named unicode escape")),
            }
        }
        let name_end = self.pos - 1;
        if !self
            .opts
            .enabled_escape_sequences
            .is_enabled(EscapeSequence::UnicodeNamed)
        {
            return self.handle_invalid_escape(escape_start, None);
        }
        let name: String = self.chars[name_start..name_end].iter().collect();
        named_escape_lookup(&name)
            .map(Some)
            .ok_or_else(|| self.error_at(escape_start, format!("unknown unicode character name {name:?}")))
    }
}

fn allowed_unquoted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}

#[cfg(feature = "named_escapes")]
fn named_escape_lookup(name: &str) -> Option<char> {
    unicode_names2::character(name)
}

#[cfg(not(feature = "named_escapes"))]
fn named_escape_lookup(_name: &str) -> Option<char> {
    None
}

fn finish_typed_array(kind: char, bytes: Vec<i8>, ints: Vec<i32>, longs: Vec<i64>) -> NbtTag {
    match kind {
        'B' => NbtTag::ByteArray(bytes),
        'I' => NbtTag::IntArray(ints),
        _ => NbtTag::LongArray(longs),
    }
}

fn push_typed_element(
    kind: char,
    element: NbtTag,
    bytes: &mut Vec<i8>,
    ints: &mut Vec<i32>,
    longs: &mut Vec<i64>,
) -> Result<(), ()> {
    let widened: i64 = match element {
        NbtTag::Byte(v) => v as i64,
        NbtTag::Short(v) => v as i64,
        NbtTag::Int(v) => v as i64,
        NbtTag::Long(v) => v,
        _ => return Err(()),
    };
    match kind {
        'B' => bytes.push(widened as i8),
        'I' => ints.push(widened as i32),
        _ => longs.push(widened),
    }
    Ok(())
}

// ================================
//      Unquoted token classification
// ================================

/// Classifies an already-lexed unquoted run: integer pattern, then float
/// pattern, then the `true`/`false` literals, else a bare STRING. This
/// never fails — an unquoted token that matches no numeric or boolean
/// form is always valid as a string.
fn classify_unquoted(token: &str) -> NbtTag {
    if let Some(tag) = try_parse_integer(token) {
        return tag;
    }
    if let Some(tag) = try_parse_float(token) {
        return tag;
    }
    match token {
        "true" => NbtTag::Byte(1),
        "false" => NbtTag::Byte(0),
        _ => NbtTag::String(token.to_owned()),
    }
}

/// `^[+-]?(0|[1-9][0-9]*)([bslBSL]?)$`
fn try_parse_integer(token: &str) -> Option<NbtTag> {
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;
    let negative = match chars.first() {
        Some('+') => {
            i += 1;
            false
        }
        Some('-') => {
            i += 1;
            true
        }
        _ => false,
    };

    let digits_start = i;
    match chars.get(i) {
        Some('0') => {
            i += 1;
            if matches!(chars.get(i), Some(c) if c.is_ascii_digit()) {
                return None; // leading zero followed by more digits
            }
        }
        Some(c) if c.is_ascii_digit() => {
            while matches!(chars.get(i), Some(c) if c.is_ascii_digit()) {
                i += 1;
            }
        }
        _ => return None,
    }
    let digits_end = i;

    let suffix = match chars.get(i) {
        Some(c @ ('b' | 's' | 'l' | 'B' | 'S' | 'L')) => {
            i += 1;
            Some(*c)
        }
        _ => None,
    };

    if i != chars.len() {
        return None;
    }

    let digits: String = chars[digits_start..digits_end].iter().collect();
    let magnitude: i128 = digits.parse().ok()?;
    let value: i128 = if negative { -magnitude } else { magnitude };

    Some(match suffix {
        Some('b') | Some('B') => NbtTag::Byte(value as i8),
        Some('s') | Some('S') => NbtTag::Short(value as i16),
        Some('l') | Some('L') => NbtTag::Long(value as i64),
        None => NbtTag::Int(value as i32),
        _ => unreachable!(),
    })
}

/// `^[+-]?([0-9]+\.?|[0-9]*\.[0-9]+)(e[+-]?[0-9]+)?([dfDF]?)$`
fn try_parse_float(token: &str) -> Option<NbtTag> {
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0;
    if matches!(chars.first(), Some('+') | Some('-')) {
        i += 1;
    }

    let int_part_start = i;
    while matches!(chars.get(i), Some(c) if c.is_ascii_digit()) {
        i += 1;
    }
    let int_part_len = i - int_part_start;

    let mut has_dot = false;
    let mut frac_len = 0;
    if chars.get(i) == Some(&'.') {
        has_dot = true;
        i += 1;
        let frac_start = i;
        while matches!(chars.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        frac_len = i - frac_start;
    }

    let mantissa_valid = int_part_len > 0 || (has_dot && frac_len > 0);
    if !mantissa_valid {
        return None;
    }

    if chars.get(i) == Some(&'e') {
        i += 1;
        if matches!(chars.get(i), Some('+') | Some('-')) {
            i += 1;
        }
        let exp_start = i;
        while matches!(chars.get(i), Some(c) if c.is_ascii_digit()) {
            i += 1;
        }
        if i == exp_start {
            return None;
        }
    }

    let mantissa_end = i;
    let suffix = match chars.get(i) {
        Some(c @ ('d' | 'f' | 'D' | 'F')) => {
            i += 1;
            Some(*c)
        }
        _ => None,
    };
    if i != chars.len() {
        return None;
    }

    let numeric_str: String = chars[0..mantissa_end].iter().collect();
    let value: f64 = numeric_str.parse().ok()?;

    Some(match suffix {
        Some('f') | Some('F') => NbtTag::Float(value as f32),
        _ => NbtTag::Double(value),
    })
}

/// Recognizes the `NaN`/`Infinity`/`-Infinity` literals (with an optional
/// `f`/`F`/`d`/`D` suffix, defaulting to DOUBLE like any other unsuffixed
/// float literal) that [`write_value`] emits for non-finite floats.
/// Outside spec.md's ABNF numeric grammar, gated behind
/// [`SnbtParseOptions::replace_non_finite`] since a bare `NaN` is
/// otherwise just a STRING.
fn try_parse_non_finite(token: &str) -> Option<NbtTag> {
    let (sign, base) = match token.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, token),
    };
    let (magnitude, suffix) = if let Some(suffix) = base.strip_prefix("Infinity") {
        (f64::INFINITY, suffix)
    } else if let Some(suffix) = base.strip_prefix("NaN") {
        (f64::NAN, suffix)
    } else {
        return None;
    };
    let value = sign * magnitude;
    match suffix {
        "" | "d" | "D" => Some(NbtTag::Double(value)),
        "f" | "F" => Some(NbtTag::Float(value as f32)),
        _ => None,
    }
}

// ================================
//      Formatter
// ================================

fn write_value(out: &mut String, tag: &NbtTag, opts: &SnbtWriteOptions, depth: usize) {
    match tag {
        NbtTag::Byte(v) => out.push_str(&format!("{v}b")),
        NbtTag::Short(v) => out.push_str(&format!("{v}s")),
        NbtTag::Int(v) => out.push_str(&v.to_string()),
        NbtTag::Long(v) => out.push_str(&format!("{v}l")),
        NbtTag::Float(v) => match non_finite_literal(*v as f64) {
            Some(token) => {
                out.push_str(token);
                out.push('f');
            }
            None => out.push_str(&format!("{v}f")),
        },
        NbtTag::Double(v) => match non_finite_literal(*v) {
            Some(token) => out.push_str(token),
            None => write_double(out, *v),
        },
        NbtTag::String(s) => write_quoted(out, s),
        NbtTag::ByteArray(values) => {
            write_typed_array_literal(out, "B", values.iter().map(|v| format!("{v}b")));
        }
        NbtTag::IntArray(values) => {
            write_typed_array_literal(out, "I", values.iter().map(|v| v.to_string()));
        }
        NbtTag::LongArray(values) => {
            write_typed_array_literal(out, "L", values.iter().map(|v| format!("{v}l")));
        }
        NbtTag::List(list) => write_list(out, list, opts, depth),
        NbtTag::Compound(compound) => write_compound(out, compound, opts, depth),
    }
}

/// The canonical non-finite token for a value, or `None` for any finite
/// value. [`try_parse_non_finite`] is this function's inverse.
fn non_finite_literal(v: f64) -> Option<&'static str> {
    if v.is_nan() {
        Some("NaN")
    } else if v == f64::INFINITY {
        Some("Infinity")
    } else if v == f64::NEG_INFINITY {
        Some("-Infinity")
    } else {
        None
    }
}

fn write_double(out: &mut String, v: f64) {
    let s = format!("{v}");
    if s.contains('.') || s.contains('e') {
        out.push_str(&s);
    } else {
        out.push_str(&s);
        out.push_str(".0");
    }
}

fn write_typed_array_literal(out: &mut String, kind: &str, elements: impl Iterator<Item = String>) {
    out.push('[');
    out.push_str(kind);
    out.push(';');
    let mut first = true;
    for element in elements {
        if !first {
            out.push(',');
        }
        first = false;
        out.push_str(&element);
    }
    out.push(']');
}

fn is_complex(tag: &NbtTag) -> bool {
    matches!(
        tag,
        NbtTag::List(_) | NbtTag::Compound(_) | NbtTag::ByteArray(_) | NbtTag::IntArray(_) | NbtTag::LongArray(_)
    )
}

fn write_list(out: &mut String, list: &NbtList, opts: &SnbtWriteOptions, depth: usize) {
    if list.is_empty() {
        out.push_str("[]");
        return;
    }
    let pretty = opts.indentation.is_pretty() && list.iter().any(is_complex);
    out.push('[');
    if pretty {
        let unit = opts.indentation.unit();
        for (index, element) in list.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push('\n');
            out.push_str(&unit.repeat(depth + 1));
            write_value(out, element, opts, depth + 1);
        }
        out.push('\n');
        out.push_str(&opts.indentation.unit().repeat(depth));
    } else {
        for (index, element) in list.iter().enumerate() {
            if index > 0 {
                out.push_str(", ");
            }
            write_value(out, element, opts, depth);
        }
    }
    out.push(']');
}

fn write_compound(out: &mut String, compound: &NbtCompound, opts: &SnbtWriteOptions, depth: usize) {
    if compound.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    let pretty = opts.indentation.is_pretty();
    if pretty {
        let unit = opts.indentation.unit();
        for (index, (key, value)) in compound.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            out.push('\n');
            out.push_str(&unit.repeat(depth + 1));
            write_key(out, key);
            out.push_str(": ");
            write_value(out, value, opts, depth + 1);
        }
        out.push('\n');
        out.push_str(&opts.indentation.unit().repeat(depth));
    } else {
        for (index, (key, value)) in compound.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            write_key(out, key);
            out.push(':');
            write_value(out, value, opts, depth);
        }
    }
    out.push('}');
}

fn write_key(out: &mut String, key: &str) {
    if !key.is_empty() && key.chars().all(allowed_unquoted) {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

/// Chooses whichever quote style produces fewer escapes, ties to double
/// quotes.
fn write_quoted(out: &mut String, s: &str) {
    let single_escapes = s.chars().filter(|&c| c == '\'' || c == '\\').count();
    let double_escapes = s.chars().filter(|&c| c == '"' || c == '\\').count();
    let quote = if single_escapes < double_escapes { '\'' } else { '"' };
    out.push(quote);
    for c in s.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Indentation;

    #[test]
    fn parses_typed_byte_array() {
        let tag = parse("{a:[B;1b,-1b,127b]}").unwrap();
        let compound = tag.as_compound().unwrap();
        assert_eq!(
            compound.get("a").unwrap(),
            &NbtTag::ByteArray(vec![1, -1, 127])
        );
    }

    #[test]
    fn typed_array_round_trips_with_indentation() {
        let tag = parse("{a:[B;1b,-1b,127b]}").unwrap();
        let pretty = stringify(
            &tag,
            &SnbtWriteOptions {
                indentation: Indentation::Spaces(2),
            },
        );
        let reparsed = parse(&pretty).unwrap();
        assert_eq!(tag, reparsed);
    }

    #[test]
    fn integer_pattern_rejects_leading_zero() {
        assert!(try_parse_integer("0123").is_none());
        assert_eq!(try_parse_integer("0"), Some(NbtTag::Int(0)));
    }

    #[test]
    fn unsuffixed_decimal_is_double() {
        assert_eq!(parse("1.5").unwrap(), NbtTag::Double(1.5));
        assert_eq!(parse("5").unwrap(), NbtTag::Int(5));
        assert_eq!(parse("5f").unwrap(), NbtTag::Float(5.0));
    }

    #[test]
    fn true_false_literals() {
        assert_eq!(parse("true").unwrap(), NbtTag::Byte(1));
        assert_eq!(parse("false").unwrap(), NbtTag::Byte(0));
    }

    #[test]
    fn non_finite_tokens_round_trip_by_default() {
        match parse("NaN").unwrap() {
            NbtTag::Double(v) => assert!(v.is_nan()),
            other => panic!("expected Double(NaN), got {other:?}"),
        }
        assert_eq!(parse("Infinity").unwrap(), NbtTag::Double(f64::INFINITY));
        assert_eq!(parse("-Infinity").unwrap(), NbtTag::Double(f64::NEG_INFINITY));
        assert_eq!(parse("Infinityf").unwrap(), NbtTag::Float(f32::INFINITY));

        let text = stringify(&NbtTag::Double(f64::INFINITY), &SnbtWriteOptions::default());
        assert_eq!(text, "Infinity");
        assert_eq!(parse(&text).unwrap(), NbtTag::Double(f64::INFINITY));

        let nan_text = stringify(&NbtTag::Float(f32::NAN), &SnbtWriteOptions::default());
        assert_eq!(nan_text, "NaNf");
    }

    #[test]
    fn non_finite_tokens_are_plain_strings_when_disabled() {
        let opts = SnbtParseOptions {
            replace_non_finite: false,
            ..SnbtParseOptions::default()
        };
        assert_eq!(
            parse_with_options("Infinity", &opts).unwrap(),
            NbtTag::String("Infinity".to_owned())
        );
    }

    #[test]
    fn quote_style_minimizes_escapes() {
        let tag = NbtTag::String("it's".to_owned());
        let s = stringify(&tag, &SnbtWriteOptions::default());
        assert_eq!(s, "\"it's\"");
    }

    #[test]
    fn empty_list_round_trips() {
        let tag = parse("{L:[]}").unwrap();
        let compound = tag.as_compound().unwrap();
        assert_eq!(compound.get("L").unwrap(), &NbtTag::List(NbtList::new()));
        let text = stringify(&tag, &SnbtWriteOptions::default());
        assert_eq!(parse(&text).unwrap(), tag);
    }
}
