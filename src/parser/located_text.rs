//! Text with line information
//!
//! Parse positions are byte offsets; locations report 1-based lines and
//! 1-based columns counted in characters.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Offsets just past each line terminator (`\n`, `\r\n`, lone `\r`)
pub(crate) fn line_ends(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut ends = Vec::new();
    for pos in memchr::memchr2_iter(b'\n', b'\r', bytes) {
        if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
            continue;
        }
        ends.push(pos + 1);
    }
    ends
}

/// Number of characters in `text[from..to]`
pub(crate) fn char_distance(text: &str, from: usize, to: usize) -> usize {
    text.get(from..to).map_or(to - from, |s| s.chars().count())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLocation {
    file: Option<PathBuf>,
    line: usize,
    column: usize,
}

impl TextLocation {
    pub fn new(file: Option<PathBuf>, line: usize, column: usize) -> Self {
        TextLocation { file, line, column }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "TextLocation{{{}:{}:{}}}", file.display(), self.line, self.column),
            None => write!(f, "TextLocation{{{}:{}}}", self.line, self.column),
        }
    }
}

/// Source text that can map offsets back to lines and columns
#[derive(Debug, Clone)]
pub struct LocatedText<'a> {
    file: Option<PathBuf>,
    text: &'a str,
    lines: Vec<usize>,
}

impl<'a> LocatedText<'a> {
    pub fn new(file: Option<PathBuf>, text: &'a str) -> Self {
        LocatedText {
            file,
            text,
            lines: line_ends(text),
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Location of the byte offset `index`; `index == len()` is the end of input
    pub fn location(&self, index: usize) -> Result<TextLocation> {
        if index > self.text.len() {
            return Err(Error::grammar(format!(
                "Index {} is out of bounds for text of length {}",
                index,
                self.text.len()
            )));
        }
        let line = match self.lines.binary_search(&index) {
            Ok(i) => i + 2,
            Err(i) => i + 1,
        };
        let line_start = if line == 1 { 0 } else { self.lines[line - 2] };
        let column = char_distance(self.text, line_start, index) + 1;
        Ok(TextLocation::new(self.file.clone(), line, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(text: &LocatedText, index: usize) -> (usize, usize) {
        let location = text.location(index).unwrap();
        (location.line(), location.column())
    }

    #[test]
    fn test_empty() {
        let text = LocatedText::new(None, "");
        assert!(text.is_empty());
        assert_eq!(position(&text, 0), (1, 1));
    }

    #[test]
    fn test_line_terminators() {
        let text = LocatedText::new(None, "a\nb\r\nc\rd");
        assert_eq!(position(&text, 0), (1, 1));
        assert_eq!(position(&text, 1), (1, 2));
        assert_eq!(position(&text, 2), (2, 1));
        assert_eq!(position(&text, 4), (2, 3));
        assert_eq!(position(&text, 5), (3, 1));
        assert_eq!(position(&text, 7), (4, 1));
        assert_eq!(position(&text, 8), (4, 2));
    }

    #[test]
    fn test_columns_count_characters() {
        let text = LocatedText::new(None, "\u{e9}t\u{e9} x");
        // "é" is two bytes
        assert_eq!(position(&text, 6), (1, 5));
    }

    #[test]
    fn test_out_of_bounds() {
        let text = LocatedText::new(None, "abc");
        assert!(text.location(3).is_ok());
        assert!(text.location(4).is_err());
    }

    #[test]
    fn test_file_is_kept() {
        let text = LocatedText::new(Some(PathBuf::from("foo.c")), "x");
        let location = text.location(0).unwrap();
        assert_eq!(location.file(), Some(Path::new("foo.c")));
        assert_eq!(location.to_string(), "TextLocation{foo.c:1:1}");
    }
}
