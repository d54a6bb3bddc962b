//! Parser Module - from input to AST
//!
//! Two front ends share the machine:
//! - `ParserAdapter`: lexerless grammars over text
//! - `Parser`: lexerful grammars over the tokens of a `Lexer`
//!
//! Failed parses become recognition errors whose message shows the
//! input around the furthest failure.

pub mod adapter;
pub mod ast_creator;
pub mod lexerful;
pub mod lexerful_ast_creator;
pub mod located_text;
pub mod parse_error;
pub mod runner;

use std::path::Path;

use crate::ast::Ast;
use crate::error::Result;

pub use adapter::ParserAdapter;
pub use ast_creator::{AstCreator, UNDEFINED_TOKEN_TYPE};
pub use lexerful::{Parser, ParserBuilder};
pub use lexerful_ast_creator::LexerfulAstCreator;
pub use located_text::{LocatedText, TextLocation};
pub use parse_error::{LexerfulParseErrorFormatter, ParseError, ParseErrorFormatter};
pub use runner::{ParseRunner, ParsingResult};

/// Anything that turns source text into an AST
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str) -> Result<Ast>;

    fn parse_file(&self, path: &Path) -> Result<Ast>;
}
