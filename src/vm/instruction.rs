//! Machine instructions and matchers

use std::fmt;

use regex::Regex;

use crate::api::{RuleKey, TokenType, TriviaKind};
use crate::ast::SkipPolicy;

/// Index into the matcher table of a compiled grammar
pub type MatcherId = u32;

/// Instruction of the parsing machine
///
/// Offsets are relative to the address of the instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Jump(i32),
    /// Call a sub-program that produces a node for `matcher`
    Call { offset: i32, matcher: MatcherId },
    /// Push a backtrack entry
    Choice(i32),
    /// Choice whose alternative does not report errors
    PredicateChoice(i32),
    IgnoreErrors,
    /// Pop the backtrack entry, keeping the nodes matched
    Commit(i32),
    /// Commit that fails when nothing was consumed since the choice
    CommitVerify(i32),
    Ret,
    Backtrack,
    End,
    /// Pop the backtrack entry and fail
    FailTwice,
    /// Pop the backtrack entry, restoring the input position
    BackCommit(i32),
    Native(MatcherId),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Jump(offset) => write!(f, "Jump {}", offset),
            Instruction::Call { offset, .. } => write!(f, "Call {}", offset),
            Instruction::Choice(offset) => write!(f, "Choice {}", offset),
            Instruction::PredicateChoice(offset) => write!(f, "PredicateChoice {}", offset),
            Instruction::IgnoreErrors => f.write_str("IgnoreErrors"),
            Instruction::Commit(offset) => write!(f, "Commit {}", offset),
            Instruction::CommitVerify(offset) => write!(f, "CommitVerify {}", offset),
            Instruction::Ret => f.write_str("Ret"),
            Instruction::Backtrack => f.write_str("Backtrack"),
            Instruction::End => f.write_str("End"),
            Instruction::FailTwice => f.write_str("FailTwice"),
            Instruction::BackCommit(offset) => write!(f, "BackCommit {}", offset),
            Instruction::Native(matcher) => write!(f, "Native {}", matcher),
        }
    }
}

/// What a parse node was produced by
#[derive(Debug, Clone)]
pub enum Matcher {
    Rule {
        key: RuleKey,
        skip: SkipPolicy,
        memoize: bool,
    },
    Token(TokenType),
    Trivia(TriviaKind),
    /// Literal characters
    String(String),
    /// Anchored regular expression, `source` is the expression as written
    Pattern { regex: Regex, source: String },
    EndOfInput,
    Nothing,
    TokenValue(String),
    TokenType(TokenType),
    TokenTypes(Vec<TokenType>),
    TokenTypeClass(&'static str),
    AnyToken,
    TillNewLine,
    Adjacent,
    Bridge { from: TokenType, to: TokenType },
}

impl Matcher {
    pub fn rule_key(&self) -> Option<RuleKey> {
        match self {
            Matcher::Rule { key, .. } => Some(*key),
            _ => None,
        }
    }

    pub fn should_memoize(&self) -> bool {
        matches!(self, Matcher::Rule { memoize: true, .. })
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Rule { key, .. } => write!(f, "{}", key),
            Matcher::Token(token_type) => write!(f, "Token {}", token_type),
            Matcher::Trivia(kind) => write!(f, "Trivia {}", kind),
            Matcher::String(value) => write!(f, "String \"{}\"", value),
            Matcher::Pattern { source, .. } => write!(f, "Pattern \"{}\"", source),
            Matcher::EndOfInput => f.write_str("EndOfInput"),
            Matcher::Nothing => f.write_str("Nothing"),
            Matcher::TokenValue(value) => write!(f, "TokenValue \"{}\"", value),
            Matcher::TokenType(token_type) => write!(f, "{}", token_type),
            Matcher::TokenTypes(types) => {
                f.write_str("TokenTypes ")?;
                for (i, token_type) in types.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", token_type)?;
                }
                Ok(())
            }
            Matcher::TokenTypeClass(class) => write!(f, "TokenTypeClass {}", class),
            Matcher::AnyToken => f.write_str("AnyToken"),
            Matcher::TillNewLine => f.write_str("TillNewLine"),
            Matcher::Adjacent => f.write_str("Adjacent"),
            Matcher::Bridge { from, to } => write!(f, "Bridge[{},{}]", from, to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Instruction::Call { offset: 2, matcher: 0 }.to_string(), "Call 2");
        assert_eq!(Instruction::CommitVerify(-3).to_string(), "CommitVerify -3");
        assert_eq!(Instruction::FailTwice.to_string(), "FailTwice");
    }

    #[test]
    fn test_matcher_memoization() {
        let rule = Matcher::Rule {
            key: RuleKey::new("a"),
            skip: SkipPolicy::Never,
            memoize: true,
        };
        assert!(rule.should_memoize());
        assert_eq!(rule.to_string(), "a");
        assert!(!Matcher::AnyToken.should_memoize());
    }
}
