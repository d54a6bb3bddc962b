//! Maps token positions to character offsets in a source text
//!
//! Offsets count characters of the text with every line terminator counted
//! as a single character, so `\r\n` advances the offset by one. Token
//! columns are display columns: a tab spans `tab_width` of them, as the
//! lexer counts it.

use memchr::memchr3_iter;

use crate::api::Token;
use crate::error::{Error, Result};
use crate::lexer::DEFAULT_TAB_WIDTH;

#[derive(Debug, Clone)]
pub struct LineOffsets {
    /// Offset of the first character of each line, line 1 first
    line_starts: Vec<usize>,
    /// Character columns of the tabs of each line
    tab_columns: Vec<Vec<usize>>,
    tab_width: usize,
    end_offset: usize,
}

impl LineOffsets {
    pub fn new(code: &str) -> Self {
        Self::with_tab_width(code, DEFAULT_TAB_WIDTH)
    }

    pub fn with_tab_width(code: &str, tab_width: usize) -> Self {
        let bytes = code.as_bytes();
        let mut line_starts = vec![0];
        let mut tab_columns = vec![Vec::new()];
        let mut offset = 0;
        let mut scanned = 0;
        let mut skip_lf_at = None;
        for pos in memchr3_iter(b'\n', b'\r', b'\t', bytes) {
            if skip_lf_at == Some(pos) {
                scanned = pos + 1;
                continue;
            }
            offset += code[scanned..pos].chars().count();
            scanned = pos + 1;
            if bytes[pos] == b'\t' {
                let line_start = line_starts.last().copied().unwrap_or(0);
                if let Some(tabs) = tab_columns.last_mut() {
                    tabs.push(offset - line_start);
                }
                offset += 1;
                continue;
            }
            offset += 1;
            if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                skip_lf_at = Some(pos + 1);
            }
            line_starts.push(offset);
            tab_columns.push(Vec::new());
        }
        let end_offset = offset + code[scanned..].chars().count();
        LineOffsets {
            line_starts,
            tab_columns,
            tab_width,
            end_offset,
        }
    }

    /// Offset of `(line, column)`, clamped to the end of the text
    ///
    /// A column falling inside the span of a tab maps to the tab.
    pub fn offset(&self, line: usize, column: usize) -> Result<usize> {
        if line < 1 {
            return Err(Error::Config(format!("Line must be strictly positive: {}", line)));
        }
        Ok(match self.line_starts.get(line - 1) {
            Some(start) => (start + self.char_column(line - 1, column)).min(self.end_offset),
            None => self.end_offset,
        })
    }

    fn char_column(&self, line_index: usize, column: usize) -> usize {
        let Some(tabs) = self.tab_columns.get(line_index) else {
            return column;
        };
        let mut extra = 0;
        for &tab in tabs {
            let tab_start = tab + extra;
            if column <= tab_start {
                break;
            }
            if column < tab_start + self.tab_width {
                return tab;
            }
            extra += self.tab_width.saturating_sub(1);
        }
        column - extra
    }

    fn display_width(&self, text: &str) -> usize {
        text.chars().map(|c| if c == '\t' { self.tab_width } else { 1 }).sum()
    }

    pub fn start_offset(&self, token: &Token) -> Result<usize> {
        self.offset(token.line(), token.column())
    }

    /// Offset just past the last character of `token`
    pub fn end_offset(&self, token: &Token) -> Result<usize> {
        let value = token.original_value();
        let lines = split_lines(value);
        let last = lines.last().map_or(0, |l| self.display_width(l));
        let last_line = token.line() + lines.len() - 1;
        let last_column = if lines.len() > 1 { last } else { token.column() + last };
        self.offset(last_line, last_column)
    }
}

/// Splits on `\r\n`, `\n` and `\r`, keeping a trailing empty line
fn split_lines(value: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = value;
    while let Some(pos) = rest.find(['\n', '\r']) {
        lines.push(&rest[..pos]);
        let terminator = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + terminator..];
    }
    lines.push(rest);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenericTokenType;

    fn token(line: usize, column: usize, value: &str) -> Token {
        Token::builder()
            .token_type(GenericTokenType::IDENTIFIER)
            .value_and_original_value(value)
            .line(line)
            .column(column)
            .build()
            .unwrap()
    }

    #[test]
    fn test_start_offset() {
        let offsets = LineOffsets::new("foo\n??bar");
        assert_eq!(offsets.start_offset(&token(1, 0, "foo")).unwrap(), 0);
        assert_eq!(offsets.start_offset(&token(2, 2, "bar")).unwrap(), 6);
    }

    #[test]
    fn test_end_offset_single_line() {
        let offsets = LineOffsets::new("foo\n??bar...");
        assert_eq!(offsets.end_offset(&token(1, 0, "foo")).unwrap(), 3);
        assert_eq!(offsets.end_offset(&token(2, 2, "bar")).unwrap(), 9);
    }

    #[test]
    fn test_end_offset_multi_line() {
        for (code, value) in [
            ("foo\n??bar\nbaz...", "bar\nbaz"),
            ("foo\n??bar\r\nbaz...", "bar\r\nbaz"),
            ("foo\n??bar\rbaz...", "bar\rbaz"),
        ] {
            let offsets = LineOffsets::new(code);
            assert_eq!(offsets.end_offset(&token(1, 0, "foo")).unwrap(), 3);
            assert_eq!(offsets.end_offset(&token(2, 2, value)).unwrap(), 13, "{:?}", code);
        }
    }

    #[test]
    fn test_offset_is_clamped() {
        let offsets = LineOffsets::new("int a = 0;\nint b = 0;");
        assert_eq!(offsets.offset(2, 4).unwrap(), 15);
        assert_eq!(offsets.offset(2, 100).unwrap(), 21);
        assert_eq!(offsets.offset(100, 100).unwrap(), 21);
    }

    #[test]
    fn test_line_terminators() {
        let offsets = LineOffsets::new("\rfoo");
        assert_eq!(offsets.offset(1, 0).unwrap(), 0);
        assert_eq!(offsets.offset(2, 0).unwrap(), 1);

        let offsets = LineOffsets::new("\r\nfoo");
        assert_eq!(offsets.offset(2, 0).unwrap(), 1);
        assert_eq!(offsets.offset(2, 3).unwrap(), 4);
    }

    #[test]
    fn test_multibyte_characters() {
        let offsets = LineOffsets::new("é\nü");
        assert_eq!(offsets.offset(2, 0).unwrap(), 2);
        assert_eq!(offsets.offset(2, 1).unwrap(), 3);
    }

    #[test]
    fn test_tab_width() {
        let offsets = LineOffsets::with_tab_width("\tint a;\n\t\tb", 4);
        assert_eq!(offsets.start_offset(&token(1, 4, "int")).unwrap(), 1);
        assert_eq!(offsets.end_offset(&token(1, 4, "int")).unwrap(), 4);
        assert_eq!(offsets.start_offset(&token(1, 8, "a")).unwrap(), 5);
        assert_eq!(offsets.end_offset(&token(1, 8, "a")).unwrap(), 6);
        assert_eq!(offsets.start_offset(&token(2, 8, "b")).unwrap(), 10);
        assert_eq!(offsets.offset(2, 2).unwrap(), 8);
        assert_eq!(offsets.offset(2, 5).unwrap(), 9);
    }

    #[test]
    fn test_tab_inside_token() {
        let offsets = LineOffsets::with_tab_width("/*\t*/ x", 4);
        assert_eq!(offsets.end_offset(&token(1, 0, "/*\t*/")).unwrap(), 5);
        assert_eq!(offsets.start_offset(&token(1, 9, "x")).unwrap(), 6);
    }

    #[test]
    fn test_line_zero() {
        assert!(LineOffsets::new("").offset(0, 0).is_err());
    }
}
