//! FLR - language recognition with PEG grammars
//!
//! Layers:
//! - `grammar`: rules described with lexerless or lexerful builders
//! - `vm`: grammars compiled to instructions for a backtracking machine
//! - `lexer`: channel based lexers producing tokens with trivia
//! - `parser`: parse trees turned into arena backed ASTs
//! - `xpath`: XPath 1.0 queries over ASTs
//! - `toolkit`: configurable languages, source inspection, batch queries
//! - `testing`: assertions for grammar authors, and the MiniC sample language

pub mod api;
pub mod ast;
pub mod charset;
pub mod error;
pub mod grammar;
pub mod grammars;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod testing;
pub mod toolkit;
pub mod vm;
pub mod xpath;

pub use error::{Error, Result};
