//! Stream - Indentable text output sink
//!
//! Line-oriented string buffer that tracks an indentation level. Printers write
//! straight into it; whatever was written before a failure stays valid.

use std::fmt;

/// Number of spaces per indentation level
const INDENT_WIDTH: usize = 2;

/// String-backed output stream with indentation support
#[derive(Debug, Default, Clone)]
pub struct Stream {
    buffer: String,
    indent_level: usize,
}

impl Stream {
    /// Create an empty stream at indentation level zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Current indentation level (in levels, not spaces)
    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Set the indentation level
    pub fn set_indent_level(&mut self, level: usize) {
        self.indent_level = level;
    }

    /// Increase the indentation level by one
    pub fn indent_more(&mut self) {
        self.indent_level += 1;
    }

    /// Decrease the indentation level by one
    pub fn indent_less(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write the current indentation followed by `s`
    pub fn indent(&mut self, s: &str) {
        let width = self.indent_level * INDENT_WIDTH;
        self.buffer.extend(std::iter::repeat(' ').take(width));
        self.buffer.push_str(s);
    }

    pub fn put_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn put_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    /// Write `s` surrounded by double quotes
    pub fn quoted(&mut self, s: &str) {
        self.buffer.push('"');
        self.buffer.push_str(s);
        self.buffer.push('"');
    }

    /// End the current line
    pub fn eol(&mut self) {
        self.buffer.push('\n');
    }

    /// Write a byte as two lowercase hex digits
    pub fn put_hex8(&mut self, byte: u8) {
        self.buffer.push_str(&hex::encode([byte]));
    }

    /// Write every byte of `bytes` as raw hex
    pub fn put_bytes_as_raw_hex8(&mut self, bytes: &[u8]) {
        self.buffer.push_str(&hex::encode(bytes));
    }

    /// Whether the last character written ends a line
    pub fn at_line_start(&self) -> bool {
        self.buffer.is_empty() || self.buffer.ends_with('\n')
    }

    /// Write `s` as a separate token: a space is inserted unless the output
    /// already ends in whitespace
    pub fn put_token(&mut self, s: &str) {
        if !matches!(self.buffer.chars().last(), None | Some('\n') | Some(' ')) {
            self.buffer.push(' ');
        }
        self.buffer.push_str(s);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop all output and reset indentation
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.indent_level = 0;
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl fmt::Write for Stream {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buffer.push_str(s);
        Ok(())
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_put_char() {
        let mut s = Stream::new();
        s.put_char('a');
        assert_eq!(s.as_str(), "a");
        s.put_char('1');
        assert_eq!(s.as_str(), "a1");
    }

    #[test]
    fn test_put_char_whitespace() {
        let mut s = Stream::new();
        s.put_char(' ');
        assert_eq!(s.as_str(), " ");
        s.eol();
        assert_eq!(s.as_str(), " \n");
        s.put_char('\t');
        assert_eq!(s.as_str(), " \n\t");
    }

    #[test]
    fn test_put_str() {
        let mut s = Stream::new();
        s.put_str("");
        assert_eq!(s.as_str(), "");
        s.put_str("foobar");
        assert_eq!(s.as_str(), "foobar");
        s.put_str(" ");
        assert_eq!(s.as_str(), "foobar ");
    }

    #[test]
    fn test_quoted() {
        let mut s = Stream::new();
        s.quoted("foo");
        assert_eq!(s.as_str(), "\"foo\"");
        s.quoted("bar");
        assert_eq!(s.as_str(), "\"foo\"\"bar\"");
        s.quoted(" ");
        assert_eq!(s.as_str(), "\"foo\"\"bar\"\" \"");
    }

    #[test]
    fn test_put_hex8() {
        let mut s = Stream::new();
        s.put_hex8(0x37);
        assert_eq!(s.as_str(), "37");
        s.put_hex8(0xff);
        assert_eq!(s.as_str(), "37ff");
        s.put_hex8(0);
        assert_eq!(s.as_str(), "37ff00");
    }

    #[test]
    fn test_put_bytes_as_raw_hex8() {
        let mut s = Stream::new();
        s.put_bytes_as_raw_hex8(b"\0foobar");
        assert_eq!(s.as_str(), "00666f6f626172");
    }

    #[test]
    fn test_indentation() {
        let mut s = Stream::new();
        s.indent("a {\n");
        s.indent_more();
        s.indent("b\n");
        s.indent_more();
        s.indent("c\n");
        s.indent_less();
        s.indent_less();
        s.indent_less();
        s.indent("}\n");
        assert_eq!(s.as_str(), "a {\n  b\n    c\n}\n");
        assert_eq!(s.indent_level(), 0);
    }

    #[test]
    fn test_put_token() {
        let mut s = Stream::new();
        s.put_token("x =");
        s.put_token("1");
        s.eol();
        s.indent_more();
        s.indent("");
        s.put_token("{...}");
        assert_eq!(s.as_str(), "x = 1\n  {...}");
    }

    #[test]
    fn test_fmt_write() {
        let mut s = Stream::new();
        write!(s, "({}) {} =", "int", "x").unwrap();
        assert_eq!(s.as_str(), "(int) x =");
        assert!(!s.at_line_start());
        s.eol();
        assert!(s.at_line_start());
    }
}
