//! Character reader with a line/column cursor
//!
//! Lines start at 1 and columns at 0. A `\n`, or a `\r` not followed by
//! `\n`, starts a new line; a tab advances the column by the tab width.

use std::fmt;

use regex::Regex;

use crate::error::Result;

pub const DEFAULT_TAB_WIDTH: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor { line: 1, column: 0 }
    }
}

/// Compiles `regexp` so that it only matches at the start of the input
pub fn anchored(regexp: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{})", regexp))?)
}

pub struct CodeReader<'a> {
    code: &'a str,
    /// Byte offset of the next character
    position: usize,
    cursor: Cursor,
    previous_cursor: Cursor,
    tab_width: usize,
    last_char: Option<char>,
}

impl<'a> CodeReader<'a> {
    pub fn new(code: &'a str) -> Self {
        Self::with_tab_width(code, DEFAULT_TAB_WIDTH)
    }

    pub fn with_tab_width(code: &'a str, tab_width: usize) -> Self {
        CodeReader {
            code,
            position: 0,
            cursor: Cursor::default(),
            previous_cursor: Cursor::default(),
            tab_width,
            last_char: None,
        }
    }

    /// Input not consumed yet
    pub fn remaining(&self) -> &'a str {
        &self.code[self.position..]
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.code.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Up to `length` characters ahead of the cursor
    pub fn peek_n(&self, length: usize) -> &'a str {
        let remaining = self.remaining();
        let end = remaining
            .char_indices()
            .nth(length)
            .map_or(remaining.len(), |(i, _)| i);
        &remaining[..end]
    }

    /// Character `index` positions ahead of the cursor
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.remaining().chars().nth(index)
    }

    pub fn pop(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        match c {
            '\n' => self.new_line(),
            '\r' if self.peek() != Some('\n') => self.new_line(),
            '\t' => self.cursor.column += self.tab_width,
            _ => self.cursor.column += 1,
        }
        self.last_char = Some(c);
        Some(c)
    }

    fn new_line(&mut self) {
        self.cursor.line += 1;
        self.cursor.column = 0;
    }

    /// Consumes the text matched by `regex` at the cursor; `regex` must be anchored
    ///
    /// The cursor before the match is kept as the previous cursor.
    pub fn pop_to(&mut self, regex: &Regex) -> Option<&'a str> {
        let remaining = self.remaining();
        let found = regex.find(remaining).filter(|m| m.start() == 0)?;
        self.previous_cursor = self.cursor;
        let end = self.position + found.end();
        while self.position < end {
            self.pop();
        }
        Some(&remaining[..found.end()])
    }

    pub fn last_char(&self) -> Option<char> {
        self.last_char
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn previous_cursor(&self) -> Cursor {
        self.previous_cursor
    }

    pub fn line(&self) -> usize {
        self.cursor.line
    }

    pub fn column(&self) -> usize {
        self.cursor.column
    }

    pub fn set_line(&mut self, line: usize) {
        self.cursor.line = line;
    }

    pub fn set_column(&mut self, column: usize) {
        self.cursor.column = column;
    }
}

impl fmt::Display for CodeReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CodeReader(line:{}|column:{}|cursor value:'{}')",
            self.cursor.line,
            self.cursor.column,
            self.peek().unwrap_or('\u{ffff}')
        )
    }
}
