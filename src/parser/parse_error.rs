//! Parse errors and their human readable rendering

use std::fmt::Write;

use super::located_text::{char_distance, line_ends};
use crate::api::token::line_span;
use crate::api::Token;

/// Lines shown around the error line
const LINE_SNIPPET_SIZE: usize = 10;
/// Tokens shown around the error token
const TOKEN_SNIPPET_SIZE: usize = 30;

/// Failure of a lexerless parse: the input and the furthest failure offset
#[derive(Debug, Clone)]
pub struct ParseError<'a> {
    text: &'a str,
    error_index: usize,
    /// Line boundaries: 0, each line end, then the text length
    lines: Vec<usize>,
}

impl<'a> ParseError<'a> {
    pub fn new(text: &'a str, error_index: usize) -> Self {
        let mut lines = Vec::with_capacity(16);
        lines.push(0);
        lines.extend(line_ends(text));
        lines.push(text.len());
        ParseError {
            text,
            error_index,
            lines,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn error_index(&self) -> usize {
        self.error_index
    }

    pub fn line_count(&self) -> usize {
        self.lines.len() - 1
    }

    pub fn line_number(&self, index: usize) -> usize {
        let line = match self.lines.binary_search(&index) {
            Ok(i) => i + 1,
            Err(i) => i,
        };
        line.min(self.line_count())
    }

    /// (line, column) of `index`, both 1-based
    pub fn position(&self, index: usize) -> (usize, usize) {
        let line = self.line_number(index);
        let start = self.lines[line - 1];
        (line, char_distance(self.text, start, index) + 1)
    }

    /// Content of the 1-based line `line`, terminator included
    fn line_text(&self, line: usize) -> &'a str {
        &self.text[self.lines[line - 1]..self.lines[line]]
    }
}

/// Renders a [`ParseError`] with a snippet of the surrounding lines
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseErrorFormatter;

impl ParseErrorFormatter {
    pub fn format(&self, error: &ParseError) -> String {
        let (line, column) = error.position(error.error_index());
        let mut out = String::new();
        let _ = write!(out, "Parse error at line {} column {}:\n\n", line, column);

        let start_line = line.saturating_sub(LINE_SNIPPET_SIZE).max(1);
        let end_line = (line + LINE_SNIPPET_SIZE).min(error.line_count());
        let padding = end_line.to_string().len();
        for i in start_line..=end_line {
            let content = error.line_text(i).trim_end_matches(['\r', '\n']).replace('\t', " ");
            let _ = writeln!(out, "{:>width$}: {}", i, content, width = padding);
            if i == line {
                out.push_str(&" ".repeat(column + padding + 1));
                out.push_str("^\n");
            }
        }
        out
    }
}

/// Renders lexerful parse errors by laying tokens back out on their lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LexerfulParseErrorFormatter;

impl LexerfulParseErrorFormatter {
    /// `tokens` must not be empty
    pub fn format(&self, tokens: &[Token], error_index: usize) -> String {
        let (line, column) = error_position(tokens, error_index);
        let mut out = String::new();
        let _ = write!(out, "Parse error at line {} column {}:\n\n", line, column);
        append_snippet(&mut out, tokens, error_index, line);
        out
    }
}

/// Line of the error, as reported by recognition errors
pub(crate) fn lexerful_error_line(tokens: &[Token], error_index: usize) -> usize {
    match tokens.get(error_index) {
        Some(token) => token.line(),
        None => tokens.last().map_or(1, |t| t.line()),
    }
}

fn error_position(tokens: &[Token], error_index: usize) -> (usize, usize) {
    if let Some(token) = tokens.get(error_index) {
        return (token.line(), token.column());
    }
    let Some(last) = tokens.last() else {
        return (1, 0);
    };
    let (lines, last_len) = line_span(last.original_value());
    if lines == 1 {
        (last.line(), last.column() + last_len)
    } else {
        (last.line() + lines - 1, last_len)
    }
}

fn split_lines(value: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let bytes = value.as_bytes();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                pieces.push(&value[start..i]);
                i += 2;
                start = i;
            }
            b'\r' | b'\n' => {
                pieces.push(&value[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    pieces.push(&value[start..]);
    pieces
}

fn line_prefix(line: usize, error_line: usize) -> String {
    if line == error_line {
        format!("{:>5}  ", "-->")
    } else {
        format!("{:>5}: ", line)
    }
}

fn append_snippet(out: &mut String, tokens: &[Token], error_index: usize, error_line: usize) {
    let start = error_index.saturating_sub(TOKEN_SNIPPET_SIZE);
    let end = (error_index + TOKEN_SNIPPET_SIZE).min(tokens.len());
    let Some(snippet) = tokens.get(start..end).filter(|s| !s.is_empty()) else {
        out.push('\n');
        return;
    };

    let mut line = snippet[0].line();
    let mut column = snippet[0].column();
    out.push_str(&line_prefix(line, error_line));
    for token in snippet {
        while line < token.line() {
            line += 1;
            column = 0;
            out.push('\n');
            out.push_str(&line_prefix(line, error_line));
        }
        while column < token.column() {
            out.push(' ');
            column += 1;
        }
        let pieces = split_lines(token.original_value());
        out.push_str(pieces[0]);
        column += pieces[0].chars().count();
        for piece in &pieces[1..] {
            line += 1;
            out.push('\n');
            out.push_str(&line_prefix(line, error_line));
            out.push_str(piece);
            column = piece.chars().count();
        }
    }
    out.push('\n');
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
    fn test_format() {
        let error = ParseError::new("\t2+4*10-0*\n", 10);
        let expected = "Parse error at line 1 column 11:\n\n1:  2+4*10-0*\n             ^\n2: \n";
        assert_eq!(ParseErrorFormatter.format(&error), expected);
    }

    #[test]
    fn test_position() {
        let error = ParseError::new("ab\ncd\r\nef", 8);
        assert_eq!(error.line_count(), 3);
        assert_eq!(error.position(0), (1, 1));
        assert_eq!(error.position(3), (2, 1));
        assert_eq!(error.position(8), (3, 2));
    }

    #[test]
    fn test_snippet_is_limited_to_ten_lines_around_the_error() {
        let text: String = (1..=30).map(|i| format!("line{}\n", i)).collect();
        let index = text.find("line15").unwrap();
        let message = ParseErrorFormatter.format(&ParseError::new(&text, index));
        assert!(message.starts_with("Parse error at line 15 column 1:\n\n 5: line5\n"));
        assert!(message.ends_with("25: line25\n"));
        assert!(message.contains("15: line15\n    ^\n"));
    }

    #[test]
    fn test_lexerful_format() {
        let tokens = vec![
            token(2, 1, "foo\nbar\nbaz"),
            token(4, 6, "qux"),
            token(6, 3, "end"),
        ];
        let expected = "Parse error at line 4 column 6:\n\n    2: foo\n    3: bar\n  -->  baz   qux\n    5: \n    6:    end\n";
        assert_eq!(LexerfulParseErrorFormatter.format(&tokens, 1), expected);
    }

    #[test]
    fn test_lexerful_error_after_last_token() {
        let tokens = vec![token(1, 0, "foo"), token(1, 4, "bar")];
        let message = LexerfulParseErrorFormatter.format(&tokens, 2);
        assert_eq!(
            message,
            "Parse error at line 1 column 7:\n\n  -->  foo bar\n"
        );
        assert_eq!(lexerful_error_line(&tokens, 2), 1);

        let multiline = vec![token(1, 0, "/*\nabc")];
        assert_eq!(error_position(&multiline, 1), (2, 3));
    }
}
