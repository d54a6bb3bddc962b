//! XPath 1.0 Engine
//!
//! XPath over syntax trees:
//! - Elements are AST nodes named after their rule or token type
//! - A synthetic `[root]` document node is the parent of the tree root
//! - `tokenLine`, `tokenColumn` and `tokenValue` attributes on nodes with a token
//! - All 13 axes, the core function library
//! - Compiled expression caching

pub mod axes;
pub mod compiler;
pub mod eval;
pub mod functions;
pub mod lexer;
pub mod parser;
pub mod query;
pub mod value;

pub use eval::evaluate;
pub use query::{AstNodeXPathQuery, XPathResult};
pub use value::{AttributeName, XNode, XPathValue};
