//! Tokens and token types

use std::fmt;

use super::trivia::Trivia;
use crate::error::{Error, Result};

/// Kind of a token
///
/// `class` groups the token types of one family (keywords, punctuators, ...)
/// so that lexerful grammars can match a whole family at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenType {
    class: &'static str,
    name: &'static str,
    value: &'static str,
    skipped: bool,
}

impl TokenType {
    pub const fn new(class: &'static str, name: &'static str, value: &'static str) -> Self {
        TokenType {
            class,
            name,
            value,
            skipped: false,
        }
    }

    /// Same token type, but removed from the AST after parsing
    pub const fn skipped_from_ast(self) -> Self {
        TokenType {
            skipped: true,
            ..self
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> &'static str {
        self.value
    }

    pub fn has_to_be_skipped_from_ast(&self) -> bool {
        self.skipped
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Token types every lexer knows about
pub struct GenericTokenType;

impl GenericTokenType {
    const CLASS: &'static str = "GenericTokenType";

    pub const COMMENT: TokenType = TokenType::new(Self::CLASS, "COMMENT", "COMMENT");
    pub const IDENTIFIER: TokenType = TokenType::new(Self::CLASS, "IDENTIFIER", "IDENTIFIER");
    pub const LITERAL: TokenType = TokenType::new(Self::CLASS, "LITERAL", "LITERAL");
    pub const CONSTANT: TokenType = TokenType::new(Self::CLASS, "CONSTANT", "CONSTANT");
    pub const EOF: TokenType = TokenType::new(Self::CLASS, "EOF", "EOF");
    pub const EOL: TokenType = TokenType::new(Self::CLASS, "EOL", "EOL");
    pub const UNKNOWN_CHAR: TokenType = TokenType::new(Self::CLASS, "UNKNOWN_CHAR", "UNKNOWN_CHAR");
}

/// A lexeme with its position and attached trivia
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    token_type: TokenType,
    value: String,
    original_value: String,
    line: usize,
    column: usize,
    end_line: usize,
    end_column: usize,
    generated_code: bool,
    trivia: Vec<Trivia>,
}

impl Token {
    pub fn builder() -> TokenBuilder {
        TokenBuilder::default()
    }

    /// Builder initialized with all the fields of this token
    pub fn to_builder(&self) -> TokenBuilder {
        TokenBuilder {
            token_type: Some(self.token_type),
            value: self.value.clone(),
            original_value: self.original_value.clone(),
            line: self.line,
            column: Some(self.column),
            generated_code: self.generated_code,
            trivia: self.trivia.clone(),
        }
    }

    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Value before any normalization done by the lexer (e.g. case folding)
    pub fn original_value(&self) -> &str {
        &self.original_value
    }

    /// 1-based line
    pub fn line(&self) -> usize {
        self.line
    }

    /// 0-based column
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    pub fn end_column(&self) -> usize {
        self.end_column
    }

    pub fn is_generated_code(&self) -> bool {
        self.generated_code
    }

    pub fn trivia(&self) -> &[Trivia] {
        &self.trivia
    }

    pub fn has_trivia(&self) -> bool {
        !self.trivia.is_empty()
    }

    /// Same token carrying `trivia` instead of its own
    pub fn with_trivia(mut self, trivia: Vec<Trivia>) -> Token {
        self.trivia = trivia;
        self
    }

    pub fn is_on_same_line_than(&self, other: Option<&Token>) -> bool {
        other.is_some_and(|o| o.line == self.line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.token_type, self.value)
    }
}

/// Splits `value` on line terminators (`\r\n`, `\r`, `\n`) and returns
/// the number of lines and the char length of the last one.
pub(crate) fn line_span(value: &str) -> (usize, usize) {
    let bytes = value.as_bytes();
    let mut lines = 1;
    let mut last_start = 0;
    let mut i = 0;
    while let Some(pos) = memchr::memchr2(b'\n', b'\r', &bytes[i..]) {
        let at = i + pos;
        let len = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
            2
        } else {
            1
        };
        lines += 1;
        i = at + len;
        last_start = i;
    }
    (lines, value[last_start..].chars().count())
}

/// Builder for [`Token`]
#[derive(Debug, Clone, Default)]
pub struct TokenBuilder {
    token_type: Option<TokenType>,
    value: String,
    original_value: String,
    line: usize,
    column: Option<usize>,
    generated_code: bool,
    trivia: Vec<Trivia>,
}

impl TokenBuilder {
    pub fn token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = Some(token_type);
        self
    }

    pub fn value_and_original_value(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        self.original_value = value.clone();
        self.value = value;
        self
    }

    pub fn value(mut self, value: impl Into<String>, original_value: impl Into<String>) -> Self {
        self.value = value.into();
        self.original_value = original_value.into();
        self
    }

    pub fn line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }

    pub fn column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn generated_code(mut self, generated_code: bool) -> Self {
        self.generated_code = generated_code;
        self
    }

    pub fn trivia(mut self, trivia: Vec<Trivia>) -> Self {
        self.trivia = trivia;
        self
    }

    pub fn add_trivia(mut self, trivia: Trivia) -> Self {
        self.trivia.push(trivia);
        self
    }

    pub fn build(self) -> Result<Token> {
        let token_type = self
            .token_type
            .ok_or_else(|| Error::Lexer("token type must be set".to_string()))?;
        if self.line < 1 {
            return Err(Error::Lexer("line must be greater or equal than 1".to_string()));
        }
        let column = self
            .column
            .ok_or_else(|| Error::Lexer("column must be greater or equal than 0".to_string()))?;

        let (lines, last_line_length) = line_span(&self.value);
        let end_line = self.line + lines - 1;
        let end_column = if end_line != self.line {
            last_line_length
        } else {
            column + self.value.chars().count()
        };

        Ok(Token {
            token_type,
            value: self.value,
            original_value: self.original_value,
            line: self.line,
            column,
            end_line,
            end_column,
            generated_code: self.generated_code,
            trivia: self.trivia,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(value: &str, line: usize, column: usize) -> Token {
        Token::builder()
            .token_type(GenericTokenType::IDENTIFIER)
            .value_and_original_value(value)
            .line(line)
            .column(column)
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_line_end_position() {
        let t = token("foo", 1, 4);
        assert_eq!(t.end_line(), 1);
        assert_eq!(t.end_column(), 7);
    }

    #[test]
    fn test_multi_line_end_position() {
        for value in ["foo\nbar", "foo\r\nbar", "foo\rbar"] {
            let t = token(value, 3, 5);
            assert_eq!(t.end_line(), 4, "{:?}", value);
            assert_eq!(t.end_column(), 3, "{:?}", value);
        }
        let t = token("foo\n", 1, 0);
        assert_eq!(t.end_line(), 2);
        assert_eq!(t.end_column(), 0);
    }

    #[test]
    fn test_builder_validation() {
        let err = Token::builder()
            .token_type(GenericTokenType::EOF)
            .column(0)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "line must be greater or equal than 1");

        let err = Token::builder()
            .token_type(GenericTokenType::EOF)
            .line(1)
            .build()
            .unwrap_err();
        assert_eq!(err.to_string(), "column must be greater or equal than 0");
    }

    #[test]
    fn test_to_builder_copies_fields() {
        let t = token("x", 2, 3);
        let copy = t.to_builder().value("X", "x").build().unwrap();
        assert_eq!(copy.value(), "X");
        assert_eq!(copy.original_value(), "x");
        assert_eq!(copy.line(), 2);
        assert_eq!(copy.column(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(token("foo", 1, 0).to_string(), "IDENTIFIER: foo");
    }

    #[test]
    fn test_skipped_token_type() {
        let ws = TokenType::new("Test", "WS", " ").skipped_from_ast();
        assert!(ws.has_to_be_skipped_from_ast());
        assert!(!GenericTokenType::EOF.has_to_be_skipped_from_ast());
    }
}
