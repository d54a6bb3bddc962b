//! Parse tree produced by the machine
//!
//! Nodes live in an arena; memoized nodes are shared by every parent that
//! reuses the memo.

use super::instruction::MatcherId;

pub type ParseNodeId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    /// First input unit covered (byte offset or token index)
    pub start: usize,
    /// One past the last input unit covered
    pub end: usize,
    pub matcher: MatcherId,
    pub children: Vec<ParseNodeId>,
}

impl ParseNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParseTree {
    nodes: Vec<ParseNode>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: ParseNode) -> ParseNodeId {
        self.nodes.push(node);
        (self.nodes.len() - 1) as ParseNodeId
    }

    pub fn get(&self, id: ParseNodeId) -> &ParseNode {
        &self.nodes[id as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
