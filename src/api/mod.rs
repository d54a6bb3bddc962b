//! Core API types
//!
//! Tokens, token types, trivia and rule keys shared by the lexer, the
//! grammar builders, the parsing machine and the AST.

pub mod rule;
pub mod token;
pub mod trivia;

pub use rule::RuleKey;
pub use token::{GenericTokenType, Token, TokenBuilder, TokenType};
pub use trivia::{Trivia, TriviaKind};
