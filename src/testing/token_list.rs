//! Assertions on lexer output

use regex::Regex;

use crate::api::{GenericTokenType, Token, TokenType};
use crate::lexer::{anchored, CodeReader};

/// Checks a list of tokens, usually the output of a lexer
///
/// Every method panics with a description of the missing token.
pub struct TokenListAssert<'t> {
    tokens: &'t [Token],
}

impl<'t> TokenListAssert<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        TokenListAssert { tokens }
    }

    fn contains(&self, predicate: impl Fn(&Token) -> bool) -> bool {
        self.tokens.iter().any(predicate)
    }

    #[track_caller]
    pub fn has_token(self, value: &str, token_type: TokenType) -> Self {
        if !self.contains(|t| t.value() == value && t.token_type() == token_type) {
            panic!("Expected to have token '{}' of type {} but was not found", value, token_type);
        }
        self
    }

    #[track_caller]
    pub fn has_token_value(self, value: &str) -> Self {
        if !self.contains(|t| t.value() == value) {
            panic!("Expected to have token '{}' but was not found", value);
        }
        self
    }

    #[track_caller]
    pub fn has_token_type(self, token_type: TokenType) -> Self {
        if !self.contains(|t| t.token_type() == token_type) {
            panic!("Expected to have token of type {} but was not found", token_type);
        }
        self
    }

    #[track_caller]
    pub fn has_original_token(self, original_value: &str) -> Self {
        if !self.contains(|t| t.original_value() == original_value) {
            panic!("Expected to have original token '{}' but was not found", original_value);
        }
        self
    }

    #[track_caller]
    pub fn does_not_have_token(self, value: &str, token_type: TokenType) -> Self {
        if self.contains(|t| t.value() == value && t.token_type() == token_type) {
            panic!("Expected not to have token '{}' of type {} but it was found", value, token_type);
        }
        self
    }

    /// Exactly these token values, in order
    #[track_caller]
    pub fn has_tokens(self, values: &[&str]) -> Self {
        if self.tokens.len() != values.len() {
            panic!("Expected to have {} tokens but found {}", values.len(), self.tokens.len());
        }
        for (token, expected) in self.tokens.iter().zip(values) {
            if token.value() != *expected {
                panic!("Expected token '{}' but found '{}'", expected, token.value());
            }
        }
        self
    }

    #[track_caller]
    pub fn has_last_token(self, value: &str, token_type: TokenType) -> Self {
        let Some(last) = self.tokens.last() else {
            panic!("There must be at least one lexed token.");
        };
        if last.value() != value || last.token_type() != token_type {
            panic!("Expected to have last token '{}' of type {} but was not found", value, token_type);
        }
        self
    }

    /// A comment trivia with this value, on `line` when given
    #[track_caller]
    pub fn has_comment(self, value: &str, line: Option<usize>) -> Self {
        if !self.has_comment_matching(|c| c.value() == value, line) {
            panic!("Expected to have comment '{}' but was not found", value);
        }
        self
    }

    #[track_caller]
    pub fn has_original_comment(self, original_value: &str, line: Option<usize>) -> Self {
        if !self.has_comment_matching(|c| c.original_value() == original_value, line) {
            panic!("Expected to have original comment '{}' but was not found", original_value);
        }
        self
    }

    fn has_comment_matching(&self, predicate: impl Fn(&Token) -> bool, line: Option<usize>) -> bool {
        self.tokens
            .iter()
            .flat_map(|t| t.trivia())
            .filter(|trivia| trivia.is_comment())
            .filter_map(|trivia| trivia.token())
            .any(|c| predicate(c) && line.is_none_or(|l| c.line() == l))
    }
}

/// Token values joined by spaces, without the trailing EOF
pub fn merge(tokens: &[Token]) -> String {
    let tokens = match tokens.split_last() {
        Some((last, rest)) if last.value() == "EOF" => rest,
        _ => tokens,
    };
    tokens.iter().map(Token::value).collect::<Vec<_>>().join(" ")
}

/// Quick lexer for tests: words and operators become identifiers, any
/// other character is a token of its own, `EOF` is the EOF token
pub fn lex(source: &str) -> Vec<Token> {
    let word: Regex = match anchored("[a-zA-Z_0-9+\\-*/]+") {
        Ok(regex) => regex,
        Err(e) => panic!("{}", e),
    };
    let mut tokens = Vec::new();
    let mut reader = CodeReader::new(source);
    while let Some(next) = reader.peek() {
        let (line, column) = (reader.line(), reader.column());
        let (token_type, value) = match reader.pop_to(&word) {
            Some("EOF") => (GenericTokenType::EOF, "EOF".to_string()),
            Some(value) => (GenericTokenType::IDENTIFIER, value.to_string()),
            None if next.is_whitespace() => {
                reader.pop();
                continue;
            }
            None => {
                reader.pop();
                (GenericTokenType::IDENTIFIER, next.to_string())
            }
        };
        let token = Token::builder()
            .token_type(token_type)
            .value_and_original_value(value)
            .line(line)
            .column(column)
            .build();
        match token {
            Ok(token) => tokens.push(token),
            Err(e) => panic!("{}", e),
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Trivia;

    fn comment(value: &str, line: usize) -> Trivia {
        Trivia::create_comment(
            Token::builder()
                .token_type(GenericTokenType::COMMENT)
                .value_and_original_value(value)
                .line(line)
                .column(0)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_lex_and_merge() {
        let tokens = lex("a + b\n(c) EOF");
        TokenListAssert::new(&tokens)
            .has_tokens(&["a", "+", "b", "(", "c", ")", "EOF"])
            .has_last_token("EOF", GenericTokenType::EOF)
            .has_token("c", GenericTokenType::IDENTIFIER)
            .has_token_value("(")
            .has_token_type(GenericTokenType::EOF)
            .has_original_token("b")
            .does_not_have_token("EOF", GenericTokenType::IDENTIFIER);
        assert_eq!(tokens[3].line(), 2);
        assert_eq!(tokens[3].column(), 0);
        assert_eq!(merge(&tokens), "a + b ( c )");
    }

    #[test]
    fn test_comments() {
        let tokens = vec![lex("x")
            .remove(0)
            .with_trivia(vec![comment("/* a */", 1), comment("// b", 2)])];
        TokenListAssert::new(&tokens)
            .has_comment("/* a */", None)
            .has_comment("// b", Some(2))
            .has_original_comment("/* a */", Some(1));
    }

    #[test]
    #[should_panic(expected = "Expected to have comment '// b' but was not found")]
    fn test_comment_on_wrong_line() {
        let tokens = vec![lex("x").remove(0).with_trivia(vec![comment("// b", 2)])];
        TokenListAssert::new(&tokens).has_comment("// b", Some(3));
    }

    #[test]
    #[should_panic(expected = "Expected to have 1 tokens but found 2")]
    fn test_has_tokens_count() {
        TokenListAssert::new(&lex("a b")).has_tokens(&["a"]);
    }

    #[test]
    #[should_panic(expected = "There must be at least one lexed token.")]
    fn test_has_last_token_empty() {
        TokenListAssert::new(&[]).has_last_token("EOF", GenericTokenType::EOF);
    }
}
