//! Compiled XPath queries over syntax trees
//!
//! Queries are compiled once and can be evaluated against any node of any
//! tree. Compiled expressions are shared through a process-wide LRU cache.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, OnceLock};

use lru::LruCache;
use tracing::debug;

use super::compiler::{self, CompiledExpr};
use super::eval::{evaluate_compiled, EvalContext};
use super::value::{format_number, AttributeName, XNode, XPathValue, DOCUMENT_NODE_NAME};
use crate::ast::AstNode;
use crate::error::Result;

const CACHE_CAPACITY: usize = 256;

type ExpressionCache = Mutex<LruCache<String, Arc<CompiledExpr>>>;

fn cache() -> &'static ExpressionCache {
    static CACHE: OnceLock<ExpressionCache> = OnceLock::new();
    CACHE.get_or_init(|| {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Mutex::new(LruCache::new(capacity))
    })
}

fn compile_cached(xpath: &str) -> Result<Arc<CompiledExpr>> {
    {
        let mut cache = cache().lock().unwrap_or_else(|e| e.into_inner());
        if let Some(compiled) = cache.get(xpath) {
            debug!(xpath, "compiled xpath cache hit");
            return Ok(Arc::clone(compiled));
        }
    }
    debug!(xpath, "compiled xpath cache miss");
    let compiled = Arc::new(compiler::compile(xpath)?);
    let mut cache = cache().lock().unwrap_or_else(|e| e.into_inner());
    cache.put(xpath.to_string(), Arc::clone(&compiled));
    Ok(compiled)
}

/// One item of a query result
#[derive(Debug, Clone, PartialEq)]
pub enum XPathResult<'a> {
    /// The synthetic document node above the tree root
    Document,
    Node(AstNode<'a>),
    Attribute {
        node: AstNode<'a>,
        name: AttributeName,
        value: String,
    },
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a> XPathResult<'a> {
    pub fn as_node(&self) -> Option<AstNode<'a>> {
        match self {
            XPathResult::Node(node) => Some(*node),
            _ => None,
        }
    }

    /// Node this result belongs to: the node itself or the owner of an attribute
    pub fn owner(&self) -> Option<AstNode<'a>> {
        match self {
            XPathResult::Node(node) | XPathResult::Attribute { node, .. } => Some(*node),
            _ => None,
        }
    }
}

impl fmt::Display for XPathResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathResult::Document => f.write_str(DOCUMENT_NODE_NAME),
            XPathResult::Node(node) => write!(f, "{}", node),
            XPathResult::Attribute { name, value, .. } => write!(f, "@{}={}", name, value),
            XPathResult::String(s) => f.write_str(s),
            XPathResult::Number(n) => f.write_str(&format_number(*n)),
            XPathResult::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// A compiled XPath query, evaluated relative to a node of a syntax tree
///
/// ```text
/// A1
/// |__ C1
/// |    |__ B1
/// |__ B2
/// |__ B3
/// ```
///
/// On this tree, `/A1/B` selects `B2` and `B3` in that order, and
/// `select_single_node` returns `B2`.
#[derive(Debug, Clone)]
pub struct AstNodeXPathQuery {
    expression: String,
    compiled: Arc<CompiledExpr>,
}

impl AstNodeXPathQuery {
    /// Compiles `xpath`, reusing a cached compilation when available
    pub fn create(xpath: &str) -> Result<Self> {
        Ok(AstNodeXPathQuery {
            expression: xpath.to_string(),
            compiled: compile_cached(xpath)?,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Raw XPath value of the query evaluated from `node`
    pub fn evaluate(&self, node: AstNode<'_>) -> Result<XPathValue> {
        let ctx = EvalContext::new(node.ast(), XNode::Element(node.id()));
        evaluate_compiled(&self.compiled, &ctx)
    }

    /// All results, in document order; a scalar result is a single item
    pub fn select_nodes<'a>(&self, node: AstNode<'a>) -> Result<Vec<XPathResult<'a>>> {
        let value = self.evaluate(node)?;
        let ast = node.ast();
        Ok(match value {
            XPathValue::NodeSet(nodes) => {
                let mut results = Vec::with_capacity(nodes.len());
                for x in nodes {
                    results.push(match x {
                        XNode::Document => XPathResult::Document,
                        XNode::Element(id) => match ast.node(id) {
                            Some(n) => XPathResult::Node(n),
                            None => continue,
                        },
                        XNode::Attribute(id, name) => match ast.node(id) {
                            Some(n) => XPathResult::Attribute {
                                node: n,
                                name,
                                value: x.string_value(ast)?,
                            },
                            None => continue,
                        },
                    });
                }
                results
            }
            XPathValue::Boolean(b) => vec![XPathResult::Boolean(b)],
            XPathValue::Number(n) => vec![XPathResult::Number(n)],
            XPathValue::String(s) => vec![XPathResult::String(s)],
        })
    }

    /// First result, if any
    pub fn select_single_node<'a>(&self, node: AstNode<'a>) -> Result<Option<XPathResult<'a>>> {
        Ok(self.select_nodes(node)?.into_iter().next())
    }
}
