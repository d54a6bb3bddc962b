//! AST Module - Arena-based syntax tree
//!
//! Implements the tree produced by the parsers using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices assigned in document order
//! - Shared token table (a rule node points at its first token)
//! - Borrowed `AstNode` handles for navigation

pub mod node;
pub mod walker;
pub mod xml;

pub use node::{Ast, AstBuilder, AstNode, AstNodeType, NodeId, SkipPolicy, TokenId};
pub use walker::{AstVisitor, AstWalker};
pub use xml::AstXmlPrinter;
