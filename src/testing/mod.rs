//! Testing Module - fluent assertions for grammar and lexer authors
//!
//! - `RuleAssert`: what a rule of a lexerless grammar matches
//! - `ParserAssert`: what the root rule of a lexerful parser matches
//! - `TokenListAssert`, `ChannelAssert`: lexer output and channels
//! - `minic`: a small C-like language wired through the whole pipeline
//!
//! Assertions panic with a description of the failure, so they read like
//! the standard `assert!` macros in tests.

mod channel_assert;
pub mod minic;
mod parser_assert;
mod rule_assert;
mod token_list;

pub use channel_assert::{ChannelAssert, CodeReaderAssert};
pub use parser_assert::ParserAssert;
pub use rule_assert::RuleAssert;
pub use token_list::{lex, merge, TokenListAssert};
