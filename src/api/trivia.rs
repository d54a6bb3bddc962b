//! Trivia: comments and skipped text attached to the following token

use std::fmt;

use super::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriviaKind {
    Comment,
    SkippedText,
}

impl fmt::Display for TriviaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriviaKind::Comment => f.write_str("COMMENT"),
            TriviaKind::SkippedText => f.write_str("SKIPPED_TEXT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trivia {
    kind: TriviaKind,
    tokens: Vec<Token>,
}

impl Trivia {
    pub fn create_comment(token: Token) -> Self {
        Trivia {
            kind: TriviaKind::Comment,
            tokens: vec![token],
        }
    }

    pub fn create_skipped_text(tokens: Vec<Token>) -> Self {
        Trivia {
            kind: TriviaKind::SkippedText,
            tokens,
        }
    }

    pub fn kind(&self) -> TriviaKind {
        self.kind
    }

    /// First token of this trivia
    pub fn token(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_comment(&self) -> bool {
        self.kind == TriviaKind::Comment
    }

    pub fn is_skipped_text(&self) -> bool {
        self.kind == TriviaKind::SkippedText
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tokens.as_slice() {
            [] => write!(f, "TRIVIA kind={}", self.kind),
            [token] => write!(
                f,
                "TRIVIA kind={} line={} type={} value={}",
                self.kind,
                token.line(),
                token.token_type(),
                token.value()
            ),
            tokens => {
                write!(f, "TRIVIA kind={} value = ", self.kind)?;
                for token in tokens {
                    write!(f, "{} ", token.value())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenericTokenType;

    fn token(value: &str) -> Token {
        Token::builder()
            .token_type(GenericTokenType::COMMENT)
            .value_and_original_value(value)
            .line(2)
            .column(0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_comment() {
        let trivia = Trivia::create_comment(token("// foo"));
        assert!(trivia.is_comment());
        assert!(!trivia.is_skipped_text());
        assert_eq!(trivia.token().map(|t| t.value()), Some("// foo"));
        assert_eq!(trivia.to_string(), "TRIVIA kind=COMMENT line=2 type=COMMENT value=// foo");
    }

    #[test]
    fn test_skipped_text_with_several_tokens() {
        let trivia = Trivia::create_skipped_text(vec![token("a"), token("b")]);
        assert!(trivia.is_skipped_text());
        assert_eq!(trivia.to_string(), "TRIVIA kind=SKIPPED_TEXT value = a b ");
    }

    #[test]
    fn test_empty_trivia() {
        let trivia = Trivia::create_skipped_text(Vec::new());
        assert_eq!(trivia.to_string(), "TRIVIA kind=SKIPPED_TEXT");
    }
}
