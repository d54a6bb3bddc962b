//! XPath Value Types
//!
//! XPath 1.0 has four data types: node-set, boolean, number, and string.
//! Nodes are the AST nodes seen as elements, the synthetic document node
//! above the AST root, and the token attributes of nodes carrying a token.

use std::cmp::Ordering;
use std::fmt;

use crate::ast::{Ast, NodeId};
use crate::error::{Error, Result};

/// Name of the synthetic document node
pub const DOCUMENT_NODE_NAME: &str = "[root]";

/// Attributes exposed by nodes carrying a token, in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeName {
    TokenLine,
    TokenColumn,
    TokenValue,
}

impl AttributeName {
    pub const ALL: [AttributeName; 3] = [
        AttributeName::TokenLine,
        AttributeName::TokenColumn,
        AttributeName::TokenValue,
    ];

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "tokenLine" => Ok(AttributeName::TokenLine),
            "tokenColumn" => Ok(AttributeName::TokenColumn),
            "tokenValue" => Ok(AttributeName::TokenValue),
            _ => Err(Error::xpath(format!("Unsupported attribute name \"{}\"", name))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttributeName::TokenLine => "tokenLine",
            AttributeName::TokenColumn => "tokenColumn",
            AttributeName::TokenValue => "tokenValue",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the XPath data model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XNode {
    Document,
    Element(NodeId),
    Attribute(NodeId, AttributeName),
}

impl XNode {
    /// Sort key in document order (AST ids are assigned in preorder)
    fn order_key(&self) -> (u64, u8) {
        match *self {
            XNode::Document => (0, 0),
            XNode::Element(id) => (id as u64 + 1, 0),
            XNode::Attribute(id, name) => (id as u64 + 1, name as u8 + 1),
        }
    }

    /// The AST node behind an element, or owning an attribute
    pub fn ast_node_id(&self) -> Option<NodeId> {
        match *self {
            XNode::Document => None,
            XNode::Element(id) | XNode::Attribute(id, _) => Some(id),
        }
    }

    pub fn name<'a>(&self, ast: &'a Ast) -> &'a str {
        match *self {
            XNode::Document => DOCUMENT_NODE_NAME,
            XNode::Element(id) => ast.node(id).map_or("", |n| n.name()),
            XNode::Attribute(_, name) => name.name(),
        }
    }

    /// XPath string-value; only attributes have one
    pub fn string_value(&self, ast: &Ast) -> Result<String> {
        match *self {
            XNode::Attribute(id, name) => {
                let token = ast.node(id).and_then(|n| n.token()).ok_or_else(|| {
                    Error::xpath(format!("The node {} has no token for attribute \"{}\"", id, name))
                })?;
                Ok(match name {
                    AttributeName::TokenLine => token.line().to_string(),
                    AttributeName::TokenColumn => token.column().to_string(),
                    AttributeName::TokenValue => token.value().to_string(),
                })
            }
            XNode::Document | XNode::Element(_) => Err(Error::xpath(
                "Implicit nodes to string conversion is not supported. Use the tokenValue attribute instead.",
            )),
        }
    }
}

impl Ord for XNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl PartialOrd for XNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// XPath value types
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum XPathValue {
    /// A set of nodes (document order, no duplicates)
    NodeSet(Vec<XNode>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl XPathValue {
    pub fn empty_nodeset() -> Self {
        XPathValue::NodeSet(Vec::new())
    }

    pub fn single_node(node: XNode) -> Self {
        XPathValue::NodeSet(vec![node])
    }

    /// Convert to boolean (XPath boolean() function semantics)
    pub fn to_boolean(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::Boolean(b) => *b,
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::String(s) => !s.is_empty(),
        }
    }

    /// Convert to string (XPath string() function semantics)
    pub fn to_string_value(&self, ast: &Ast) -> Result<String> {
        Ok(match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(first) => first.string_value(ast)?,
                None => String::new(),
            },
            XPathValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
            XPathValue::Number(n) => format_number(*n),
            XPathValue::String(s) => s.clone(),
        })
    }

    /// Convert to number (XPath number() function semantics)
    pub fn to_number(&self, ast: &Ast) -> Result<f64> {
        Ok(match self {
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => parse_number(s),
            XPathValue::NodeSet(_) => parse_number(&self.to_string_value(ast)?),
        })
    }

    pub fn is_nodeset(&self) -> bool {
        matches!(self, XPathValue::NodeSet(_))
    }

    pub fn as_nodeset(&self) -> Option<&[XNode]> {
        match self {
            XPathValue::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }
}

/// Number formatting of XPath string()
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

impl Default for XPathValue {
    fn default() -> Self {
        XPathValue::NodeSet(Vec::new())
    }
}

impl From<bool> for XPathValue {
    fn from(b: bool) -> Self {
        XPathValue::Boolean(b)
    }
}

impl From<f64> for XPathValue {
    fn from(n: f64) -> Self {
        XPathValue::Number(n)
    }
}

impl From<String> for XPathValue {
    fn from(s: String) -> Self {
        XPathValue::String(s)
    }
}

impl From<&str> for XPathValue {
    fn from(s: &str) -> Self {
        XPathValue::String(s.to_string())
    }
}

impl From<Vec<XNode>> for XPathValue {
    fn from(nodes: Vec<XNode>) -> Self {
        XPathValue::NodeSet(nodes)
    }
}
