//! Depth-first walk over an AST dispatching to visitors

use crate::api::Token;

use super::node::{AstNode, AstNodeType, TokenId};

/// Callbacks invoked by [`AstWalker`]
///
/// A visitor only receives `visit_node` / `leave_node` for the node types
/// returned by `subscribed_to`. Token callbacks are delivered when
/// `visits_tokens` returns true.
pub trait AstVisitor {
    /// Called once when the visitor is registered on a walker
    fn init(&mut self) {}

    fn subscribed_to(&self) -> Vec<AstNodeType> {
        Vec::new()
    }

    fn visits_tokens(&self) -> bool {
        false
    }

    fn visit_file(&mut self, _root: Option<AstNode<'_>>) {}

    fn leave_file(&mut self, _root: Option<AstNode<'_>>) {}

    fn visit_node(&mut self, _node: AstNode<'_>) {}

    fn leave_node(&mut self, _node: AstNode<'_>) {}

    fn visit_token(&mut self, _token: &Token) {}
}

/// Walks a tree and notifies registered visitors
///
/// Visitors are notified in registration order on the way down and in
/// reverse order on the way up.
pub struct AstWalker<'v> {
    visitors: Vec<&'v mut dyn AstVisitor>,
    subscriptions: Vec<Vec<AstNodeType>>,
    last_visited_token: Option<TokenId>,
}

impl<'v> AstWalker<'v> {
    pub fn new() -> Self {
        AstWalker {
            visitors: Vec::new(),
            subscriptions: Vec::new(),
            last_visited_token: None,
        }
    }

    pub fn with_visitors(visitors: Vec<&'v mut dyn AstVisitor>) -> Self {
        let mut walker = Self::new();
        for visitor in visitors {
            walker.add_visitor(visitor);
        }
        walker
    }

    pub fn add_visitor(&mut self, visitor: &'v mut dyn AstVisitor) {
        visitor.init();
        self.subscriptions.push(visitor.subscribed_to());
        self.visitors.push(visitor);
    }

    pub fn walk_and_visit(&mut self, root: Option<AstNode<'_>>) {
        self.last_visited_token = None;
        for visitor in self.visitors.iter_mut() {
            visitor.visit_file(root);
        }
        if let Some(node) = root {
            self.visit(node);
        }
        for visitor in self.visitors.iter_mut().rev() {
            visitor.leave_file(root);
        }
    }

    fn node_visitors(&self, node: AstNode<'_>) -> Vec<usize> {
        let node_type = node.node_type();
        self.subscriptions
            .iter()
            .enumerate()
            .filter(|(_, types)| types.contains(&node_type))
            .map(|(index, _)| index)
            .collect()
    }

    fn visit(&mut self, node: AstNode<'_>) {
        let node_visitors = self.node_visitors(node);
        for &index in &node_visitors {
            self.visitors[index].visit_node(node);
        }
        self.visit_token(node);
        for child in node.children() {
            self.visit(child);
        }
        for &index in node_visitors.iter().rev() {
            self.visitors[index].leave_node(node);
        }
    }

    fn visit_token(&mut self, node: AstNode<'_>) {
        let Some(token_id) = node.ast().token_id_of(node.id()) else {
            return;
        };
        if self.last_visited_token == Some(token_id) {
            return;
        }
        self.last_visited_token = Some(token_id);
        if let Some(token) = node.token() {
            for visitor in self.visitors.iter_mut().filter(|v| v.visits_tokens()) {
                visitor.visit_token(token);
            }
        }
    }
}

impl Default for AstWalker<'_> {
    fn default() -> Self {
        Self::new()
    }
}
