//! Stock channels

use std::collections::HashMap;

use regex::Regex;

use super::channel::{Channel, LexerOutput};
use super::code_reader::{anchored, CodeReader};
use crate::api::{GenericTokenType, Token, TokenType, Trivia};
use crate::error::Result;

pub const BOM_CHAR: char = '\u{feff}';

/// Swallows whatever the regular expression matches (typically whitespace)
#[derive(Debug)]
pub struct BlackHoleChannel {
    regex: Regex,
}

impl BlackHoleChannel {
    pub fn new(regexp: &str) -> Result<Self> {
        Ok(BlackHoleChannel {
            regex: anchored(regexp)?,
        })
    }
}

impl Channel for BlackHoleChannel {
    fn consume(&self, code: &mut CodeReader<'_>, _output: &mut LexerOutput) -> Result<bool> {
        // an empty match would never advance the dispatcher
        Ok(code.pop_to(&self.regex).is_some_and(|matched| !matched.is_empty()))
    }
}

/// Drops a leading byte order mark
#[derive(Debug, Default)]
pub struct BomCharacterChannel;

impl Channel for BomCharacterChannel {
    fn consume(&self, code: &mut CodeReader<'_>, _output: &mut LexerOutput) -> Result<bool> {
        if code.peek() == Some(BOM_CHAR) {
            code.pop();
            return Ok(true);
        }
        Ok(false)
    }
}

/// Turns regular expression matches into comment trivia
#[derive(Debug)]
pub struct CommentRegexpChannel {
    regex: Regex,
}

impl CommentRegexpChannel {
    pub fn new(regexp: &str) -> Result<Self> {
        Ok(CommentRegexpChannel {
            regex: anchored(regexp)?,
        })
    }
}

impl Channel for CommentRegexpChannel {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        let Some(value) = code.pop_to(&self.regex).filter(|v| !v.is_empty()) else {
            return Ok(false);
        };
        let start = code.previous_cursor();
        let token = Token::builder()
            .token_type(GenericTokenType::COMMENT)
            .value_and_original_value(value)
            .line(start.line)
            .column(start.column)
            .build()?;
        output.add_trivia(Trivia::create_comment(token));
        Ok(true)
    }
}

/// Words, classified as keywords when they belong to a keyword set
#[derive(Debug)]
pub struct IdentifierAndKeywordChannel {
    regex: Regex,
    case_sensitive: bool,
    keywords: HashMap<String, TokenType>,
}

impl IdentifierAndKeywordChannel {
    pub fn new(regexp: &str, case_sensitive: bool, keyword_sets: &[&[TokenType]]) -> Result<Self> {
        let keywords = keyword_sets
            .iter()
            .flat_map(|set| set.iter())
            .map(|&keyword| {
                let value = if case_sensitive {
                    keyword.value().to_string()
                } else {
                    keyword.value().to_uppercase()
                };
                (value, keyword)
            })
            .collect();
        Ok(IdentifierAndKeywordChannel {
            regex: anchored(regexp)?,
            case_sensitive,
            keywords,
        })
    }
}

impl Channel for IdentifierAndKeywordChannel {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        let Some(original) = code.pop_to(&self.regex).filter(|v| !v.is_empty()) else {
            return Ok(false);
        };
        let word = if self.case_sensitive {
            original.to_string()
        } else {
            original.to_uppercase()
        };
        let token_type = self
            .keywords
            .get(&word)
            .copied()
            .unwrap_or(GenericTokenType::IDENTIFIER);
        let start = code.previous_cursor();
        let token = Token::builder()
            .token_type(token_type)
            .value(word, original)
            .line(start.line)
            .column(start.column)
            .build()?;
        output.add_token(token);
        Ok(true)
    }
}

/// Fixed punctuators, longest first
#[derive(Debug)]
pub struct PunctuatorChannel {
    punctuators: Vec<TokenType>,
}

impl PunctuatorChannel {
    pub fn new(punctuators: &[TokenType]) -> Self {
        let mut punctuators = punctuators.to_vec();
        // stable: equal lengths keep their declaration order
        punctuators.sort_by_key(|p| std::cmp::Reverse(p.value().chars().count()));
        PunctuatorChannel { punctuators }
    }
}

impl Channel for PunctuatorChannel {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        let remaining = code.remaining();
        let Some(punctuator) = self
            .punctuators
            .iter()
            .find(|p| !p.value().is_empty() && remaining.starts_with(p.value()))
        else {
            return Ok(false);
        };
        let token = Token::builder()
            .token_type(*punctuator)
            .value_and_original_value(punctuator.value())
            .line(code.line())
            .column(code.column())
            .build()?;
        output.add_token(token);
        for _ in punctuator.value().chars() {
            code.pop();
        }
        Ok(true)
    }
}

/// Tokens of one type recognized by a regular expression
#[derive(Debug)]
pub struct RegexpChannel {
    token_type: TokenType,
    regex: Regex,
}

impl RegexpChannel {
    pub fn new(token_type: TokenType, regexp: &str) -> Result<Self> {
        Ok(RegexpChannel {
            token_type,
            regex: anchored(regexp)?,
        })
    }
}

impl Channel for RegexpChannel {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        let Some(value) = code.pop_to(&self.regex).filter(|v| !v.is_empty()) else {
            return Ok(false);
        };
        let start = code.previous_cursor();
        let token = Token::builder()
            .token_type(self.token_type)
            .value_and_original_value(value)
            .line(start.line)
            .column(start.column)
            .build()?;
        output.add_token(token);
        Ok(true)
    }
}

/// Emits any remaining character as an `UNKNOWN_CHAR` token
#[derive(Debug, Default)]
pub struct UnknownCharacterChannel;

impl Channel for UnknownCharacterChannel {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        let (line, column) = (code.line(), code.column());
        let Some(c) = code.pop() else {
            return Ok(false);
        };
        let token = Token::builder()
            .token_type(GenericTokenType::UNKNOWN_CHAR)
            .value_and_original_value(c.to_string())
            .line(line)
            .column(column)
            .build()?;
        output.add_token(token);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUS: TokenType = TokenType::new("Punctuator", "PLUS", "+");
    const INCREMENT: TokenType = TokenType::new("Punctuator", "INCREMENT", "++");
    const IF: TokenType = TokenType::new("Keyword", "IF", "if");
    const NUMBER: TokenType = TokenType::new("Literal", "NUMBER", "NUMBER");

    fn consume(channel: &dyn Channel, source: &str) -> (bool, LexerOutput, usize) {
        let mut code = CodeReader::new(source);
        let mut output = LexerOutput::new();
        let consumed = channel.consume(&mut code, &mut output).unwrap();
        (consumed, output, code.column())
    }

    #[test]
    fn test_black_hole() {
        let channel = BlackHoleChannel::new("[ \\t]+").unwrap();
        let (consumed, output, column) = consume(&channel, "  \tx");
        assert!(consumed);
        assert!(output.tokens().is_empty());
        assert_eq!(column, 3);
        assert!(!consume(&channel, "x").0);
    }

    #[test]
    fn test_bom() {
        assert!(consume(&BomCharacterChannel, "\u{feff}x").0);
        assert!(!consume(&BomCharacterChannel, "x").0);
    }

    #[test]
    fn test_comment_becomes_trivia_of_next_token() {
        let channel = CommentRegexpChannel::new("//[^\\n\\r]*").unwrap();
        let mut code = CodeReader::new("// hi");
        let mut output = LexerOutput::new();
        assert!(channel.consume(&mut code, &mut output).unwrap());
        assert!(output.tokens().is_empty());
        output.add_token(
            Token::builder()
                .token_type(GenericTokenType::EOF)
                .value_and_original_value("EOF")
                .line(1)
                .column(5)
                .build()
                .unwrap(),
        );
        let trivia = &output.tokens()[0].trivia()[0];
        assert!(trivia.is_comment());
        assert_eq!(trivia.token().unwrap().value(), "// hi");
    }

    #[test]
    fn test_identifier_and_keyword() {
        let channel = IdentifierAndKeywordChannel::new("[a-zA-Z]+", false, &[&[IF]]).unwrap();
        let (_, output, _) = consume(&channel, "If");
        let token = &output.tokens()[0];
        assert_eq!(token.token_type(), IF);
        assert_eq!(token.value(), "IF");
        assert_eq!(token.original_value(), "If");

        let (_, output, _) = consume(&channel, "other");
        assert_eq!(output.tokens()[0].token_type(), GenericTokenType::IDENTIFIER);

        let sensitive = IdentifierAndKeywordChannel::new("[a-zA-Z]+", true, &[&[IF]]).unwrap();
        let (_, output, _) = consume(&sensitive, "If");
        assert_eq!(output.tokens()[0].token_type(), GenericTokenType::IDENTIFIER);
        assert_eq!(output.tokens()[0].value(), "If");
    }

    #[test]
    fn test_punctuator_longest_first() {
        let channel = PunctuatorChannel::new(&[PLUS, INCREMENT]);
        let (consumed, output, column) = consume(&channel, "+++");
        assert!(consumed);
        assert_eq!(output.tokens()[0].token_type(), INCREMENT);
        assert_eq!(column, 2);
        assert!(!consume(&channel, "-").0);
    }

    #[test]
    fn test_regexp() {
        let channel = RegexpChannel::new(NUMBER, "[0-9]+").unwrap();
        let (consumed, output, _) = consume(&channel, "42;");
        assert!(consumed);
        assert_eq!(output.tokens()[0].value(), "42");
        assert_eq!(output.tokens()[0].token_type(), NUMBER);
        assert!(RegexpChannel::new(NUMBER, "(").is_err());
    }

    #[test]
    fn test_unknown_character() {
        let (consumed, output, _) = consume(&UnknownCharacterChannel, "\u{e9}");
        assert!(consumed);
        let token = &output.tokens()[0];
        assert_eq!(token.token_type(), GenericTokenType::UNKNOWN_CHAR);
        assert_eq!((token.value(), token.column()), ("\u{e9}", 0));
        assert!(!consume(&UnknownCharacterChannel, "").0);
    }
}
