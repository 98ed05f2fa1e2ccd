//! Level file parsing support
//!
//! The level format is a flat, newline-delimited text stream with a fixed
//! section order: title, background color, player, platforms, goals, lava,
//! back-platforms, boxes, labels, regions, then the raw script body (every
//! remaining byte, untouched). Each layer encodes and decodes its own
//! section; this module provides the line cursor, the hex color codec and
//! the error types they share.

use std::fmt;
use std::io;

use macroquad::prelude::Color;

/// Maximum length of an entity id field
pub const MAX_ID_LEN: usize = 36;
/// Maximum entity count a single section may declare
pub const MAX_ENTITIES: usize = 1000;

/// Malformed count line or field in a layer section. Fatal to the whole
/// load; there is no partial recovery.
#[derive(Debug)]
pub struct ParseError {
    /// 1-based line number in the level source
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Error type for loading a level from disk
#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(ParseError),
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "parse error: {}", e),
        }
    }
}

/// Forward-only cursor over the lines of a level source.
///
/// Tracks the byte position so that, once the fixed sections are consumed,
/// `rest` hands back the script body verbatim.
pub struct LineCursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 0 }
    }

    /// Build a `ParseError` pointing at the most recently read line
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, message)
    }

    /// Next line, without its terminator
    pub fn next_line(&mut self) -> Result<&'a str, ParseError> {
        if self.pos >= self.src.len() {
            return Err(ParseError::new(self.line + 1, "unexpected end of file"));
        }
        self.line += 1;
        let rest = &self.src[self.pos..];
        let (line, consumed) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        Ok(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Everything after the last consumed line, byte-for-byte
    pub fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }
}

/// Parse a 6-digit hex color (`rrggbb`), alpha fixed at 1.0
pub fn color_from_hex(s: &str) -> Option<Color> {
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;
    Some(Color::from_rgba(r, g, b, 255))
}

/// Encode a color as 6 lowercase hex digits, dropping alpha
pub fn color_to_hex(c: Color) -> String {
    format!(
        "{:02x}{:02x}{:02x}",
        (c.r * 255.0).round() as u8,
        (c.g * 255.0).round() as u8,
        (c.b * 255.0).round() as u8
    )
}

/// Parse the section's leading entity-count line
pub fn parse_count(cursor: &mut LineCursor) -> Result<usize, ParseError> {
    let line = cursor.next_line()?;
    let count: usize = line
        .trim()
        .parse()
        .map_err(|_| cursor.error(format!("invalid entity count `{}`", line)))?;
    if count > MAX_ENTITIES {
        return Err(cursor.error(format!(
            "too many entities ({} > {})",
            count, MAX_ENTITIES
        )));
    }
    Ok(count)
}

/// Validate an entity id field (present, bounded, preserved verbatim)
pub fn parse_id(cursor: &LineCursor, field: &str) -> Result<String, ParseError> {
    if field.len() > MAX_ID_LEN {
        return Err(cursor.error(format!(
            "id `{}` longer than {} characters",
            field, MAX_ID_LEN
        )));
    }
    Ok(field.to_string())
}

/// Parse one float field
pub fn parse_float(cursor: &LineCursor, field: &str) -> Result<f32, ParseError> {
    field
        .parse()
        .map_err(|_| cursor.error(format!("invalid number `{}`", field)))
}

/// Parse one color field
pub fn parse_color(cursor: &LineCursor, field: &str) -> Result<Color, ParseError> {
    color_from_hex(field).ok_or_else(|| cursor.error(format!("invalid color `{}`", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_cursor_rest_is_verbatim() {
        let src = "title\n2\nrest of the file\nwith (script stuff)\n";
        let mut cursor = LineCursor::new(src);
        assert_eq!(cursor.next_line().unwrap(), "title");
        assert_eq!(cursor.next_line().unwrap(), "2");
        assert_eq!(cursor.rest(), "rest of the file\nwith (script stuff)\n");
    }

    #[test]
    fn test_line_cursor_crlf() {
        let mut cursor = LineCursor::new("one\r\ntwo\n");
        assert_eq!(cursor.next_line().unwrap(), "one");
        assert_eq!(cursor.next_line().unwrap(), "two");
        assert!(cursor.next_line().is_err());
    }

    #[test]
    fn test_line_cursor_eof_line_number() {
        let mut cursor = LineCursor::new("only\n");
        cursor.next_line().unwrap();
        let err = cursor.next_line().unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_color_hex_round_trip() {
        for hex in ["000000", "ffffff", "fffda5", "ff8080", "1a2b3c"] {
            let color = color_from_hex(hex).unwrap();
            assert_eq!(color_to_hex(color), hex);
        }
    }

    #[test]
    fn test_color_hex_rejects_malformed() {
        assert!(color_from_hex("fff").is_none());
        assert!(color_from_hex("zzzzzz").is_none());
        assert!(color_from_hex("ff80801").is_none());
    }

    #[test]
    fn test_parse_count_rejects_garbage() {
        let mut cursor = LineCursor::new("banana\n");
        assert!(parse_count(&mut cursor).is_err());

        let mut cursor = LineCursor::new("100000\n");
        assert!(parse_count(&mut cursor).is_err());

        let mut cursor = LineCursor::new("3\n");
        assert_eq!(parse_count(&mut cursor).unwrap(), 3);
    }
}
