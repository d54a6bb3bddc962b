//! Tokens of XPath expressions
//!
//! Names are classified as they are read: an operator keyword, an axis
//! when `::` follows, a node type or function name when `(` follows.

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Slash,
    DoubleSlash,
    Dot,
    DoubleDot,
    At,
    Pipe,
    Plus,
    Minus,
    Star,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Mod,
    Div,

    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,

    Number(f64),
    String(String),

    /// Rule, token type or function name
    Name(String),
    /// `prefix:name` or `prefix:*`
    NameTest(String),
    /// `node`, `text`, `comment` or `processing-instruction` before `(`
    NodeType(String),
    Axis(String),

    DoubleColon,
    Comma,
    Dollar,

    Eof,
}

fn punctuation(c: char) -> Option<Token> {
    Some(match c {
        '@' => Token::At,
        '|' => Token::Pipe,
        '+' => Token::Plus,
        '-' => Token::Minus,
        '*' => Token::Star,
        '=' => Token::Eq,
        '(' => Token::LeftParen,
        ')' => Token::RightParen,
        '[' => Token::LeftBracket,
        ']' => Token::RightBracket,
        ',' => Token::Comma,
        '$' => Token::Dollar,
        _ => return None,
    })
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn lookahead(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// `pos` is a byte index; callers step over whole characters
    fn bump(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    fn eat(&mut self, c: char) -> bool {
        let found = self.current() == Some(c);
        if found {
            self.bump(c.len_utf8());
        }
        found
    }

    fn skip_blanks(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn unexpected(&self, c: char) -> Error {
        Error::xpath(format!(
            "Unexpected character '{}' at position {} in \"{}\"",
            c, self.pos, self.input
        ))
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_blanks();
        let Some(c) = self.current() else {
            return Ok(Token::Eof);
        };
        if let Some(token) = punctuation(c) {
            self.bump(1);
            return Ok(token);
        }
        Ok(match c {
            '/' => {
                self.bump(1);
                if self.eat('/') { Token::DoubleSlash } else { Token::Slash }
            }
            '.' if self.lookahead(1).is_some_and(|d| d.is_ascii_digit()) => self.number(),
            '.' => {
                self.bump(1);
                if self.eat('.') { Token::DoubleDot } else { Token::Dot }
            }
            '<' => {
                self.bump(1);
                if self.eat('=') { Token::LtEq } else { Token::Lt }
            }
            '>' => {
                self.bump(1);
                if self.eat('=') { Token::GtEq } else { Token::Gt }
            }
            '!' if self.lookahead(1) == Some('=') => {
                self.bump(2);
                Token::NotEq
            }
            ':' if self.lookahead(1) == Some(':') => {
                self.bump(2);
                Token::DoubleColon
            }
            '"' | '\'' => self.literal(c)?,
            '0'..='9' => self.number(),
            _ if is_name_start_char(c) => self.name(),
            _ => return Err(self.unexpected(c)),
        })
    }

    /// Digits with an optional fraction: `12`, `1.`, `.5`
    fn number(&mut self) -> Token {
        let start = self.pos;
        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        self.bump(digits(self.rest()));
        if self.eat('.') {
            self.bump(digits(self.rest()));
        }
        Token::Number(self.input[start..self.pos].parse().unwrap_or(f64::NAN))
    }

    fn literal(&mut self, quote: char) -> Result<Token> {
        let opening = self.pos;
        self.bump(1);
        let Some(len) = self.rest().find(quote) else {
            return Err(Error::xpath(format!(
                "Unterminated string literal at position {} in \"{}\"",
                opening, self.input
            )));
        };
        let value = self.rest()[..len].to_string();
        self.bump(len + 1);
        Ok(Token::String(value))
    }

    fn ncname(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !is_name_char(c)).unwrap_or(rest.len());
        self.bump(len);
        &rest[..len]
    }

    fn name(&mut self) -> Token {
        let name = self.ncname();
        match name {
            "and" => return Token::And,
            "or" => return Token::Or,
            "mod" => return Token::Mod,
            "div" => return Token::Div,
            _ => {}
        }
        let end_of_name = self.pos;
        self.skip_blanks();
        if self.rest().starts_with("::") {
            return Token::Axis(name.to_string());
        }
        if self.current() == Some('(') {
            return match name {
                "node" | "text" | "comment" | "processing-instruction" => Token::NodeType(name.to_string()),
                _ => Token::Name(name.to_string()),
            };
        }
        self.pos = end_of_name;
        if self.current() == Some(':') && self.lookahead(1) != Some(':') {
            self.bump(1);
            let local = if self.eat('*') { "*" } else { self.ncname() };
            return Token::NameTest(format!("{}:{}", name, local));
        }
        Token::Name(name.to_string())
    }

    /// All tokens of the input, without the final `Eof`
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}
