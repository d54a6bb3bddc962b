//! AST node storage and navigation

use std::fmt;

use crate::api::{RuleKey, Token, TokenType};

/// Node identifier - index into the arena
pub type NodeId = u32;

/// Token identifier - index into the token table of an [`Ast`]
pub type TokenId = u32;

/// Type of an AST node: the rule that produced it or the type of its token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstNodeType {
    Rule(RuleKey),
    Token(TokenType),
}

impl AstNodeType {
    pub fn name(&self) -> &'static str {
        match self {
            AstNodeType::Rule(key) => key.name(),
            AstNodeType::Token(token_type) => token_type.name(),
        }
    }
}

impl From<RuleKey> for AstNodeType {
    fn from(key: RuleKey) -> Self {
        AstNodeType::Rule(key)
    }
}

impl From<TokenType> for AstNodeType {
    fn from(token_type: TokenType) -> Self {
        AstNodeType::Token(token_type)
    }
}

impl fmt::Display for AstNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a rule node is kept in the AST
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipPolicy {
    #[default]
    Never,
    Always,
    IfOneChild,
}

#[derive(Debug, Clone)]
struct NodeData {
    node_type: AstNodeType,
    skip: SkipPolicy,
    token: Option<TokenId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    child_index: u32,
    from_index: usize,
    to_index: usize,
}

/// Mutable arena used while converting a parse tree into an [`Ast`]
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<NodeData>,
    tokens: Vec<Token>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder whose token table is pre-filled (lexerful parsing)
    pub fn with_tokens(tokens: Vec<Token>) -> Self {
        AstBuilder {
            nodes: Vec::new(),
            tokens,
        }
    }

    pub fn add_token(&mut self, token: Token) -> TokenId {
        self.tokens.push(token);
        (self.tokens.len() - 1) as TokenId
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id as usize]
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    fn push(&mut self, node_type: AstNodeType, skip: SkipPolicy, token: Option<TokenId>) -> NodeId {
        self.nodes.push(NodeData {
            node_type,
            skip,
            token,
            parent: None,
            children: Vec::new(),
            child_index: 0,
            from_index: 0,
            to_index: 0,
        });
        (self.nodes.len() - 1) as NodeId
    }

    /// Leaf node for a token; its type and name come from the token type
    pub fn token_node(&mut self, token: TokenId) -> NodeId {
        let token_type = self.tokens[token as usize].token_type();
        let skip = if token_type.has_to_be_skipped_from_ast() {
            SkipPolicy::Always
        } else {
            SkipPolicy::Never
        };
        self.push(AstNodeType::Token(token_type), skip, Some(token))
    }

    /// Node of an arbitrary type, optionally carrying a token
    pub fn node(&mut self, node_type: AstNodeType, skip: SkipPolicy, token: Option<TokenId>) -> NodeId {
        self.push(node_type, skip, token)
    }

    pub fn rule_node(&mut self, key: RuleKey, skip: SkipPolicy) -> NodeId {
        self.push(AstNodeType::Rule(key), skip, None)
    }

    pub fn set_token(&mut self, node: NodeId, token: Option<TokenId>) {
        self.nodes[node as usize].token = token;
    }

    pub fn node_token(&self, node: NodeId) -> Option<TokenId> {
        self.nodes[node as usize].token
    }

    pub fn set_range(&mut self, node: NodeId, from_index: usize, to_index: usize) {
        let data = &mut self.nodes[node as usize];
        data.from_index = from_index;
        data.to_index = to_index;
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node as usize].children
    }

    /// Whether `node` must be replaced by its children when attached to a parent
    pub fn has_to_be_skipped(&self, node: NodeId) -> bool {
        let data = &self.nodes[node as usize];
        match data.skip {
            SkipPolicy::Never => false,
            SkipPolicy::Always => true,
            SkipPolicy::IfOneChild => data.children.len() == 1,
        }
    }

    /// Attaches `child` to `parent`, or its children if `child` has to be skipped
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if self.has_to_be_skipped(child) {
            let grandchildren = std::mem::take(&mut self.nodes[child as usize].children);
            for grandchild in grandchildren {
                self.attach(parent, grandchild);
            }
        } else {
            self.attach(parent, child);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child as usize].parent = Some(parent);
        self.nodes[parent as usize].children.push(child);
    }

    /// Freezes the tree rooted at `root`, renumbering reachable nodes in document order
    pub fn finish(self, root: NodeId) -> Ast {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.nodes[id as usize].children.iter().rev());
        }

        let mut remap = vec![NodeId::MAX; self.nodes.len()];
        for (new_id, &old_id) in order.iter().enumerate() {
            remap[old_id as usize] = new_id as NodeId;
        }

        let mut nodes = Vec::with_capacity(order.len());
        for &old_id in &order {
            let data = &self.nodes[old_id as usize];
            nodes.push(NodeData {
                node_type: data.node_type,
                skip: data.skip,
                token: data.token,
                parent: if old_id == root {
                    None
                } else {
                    data.parent.map(|p| remap[p as usize])
                },
                children: data.children.iter().map(|&c| remap[c as usize]).collect(),
                child_index: 0,
                from_index: data.from_index,
                to_index: data.to_index,
            });
        }
        for id in 0..nodes.len() {
            let children = nodes[id].children.clone();
            for (index, child) in children.into_iter().enumerate() {
                nodes[child as usize].child_index = index as u32;
            }
        }

        Ast {
            nodes,
            tokens: self.tokens,
        }
    }
}

/// Immutable syntax tree; node 0 is the root
#[derive(Debug, Clone)]
pub struct Ast {
    nodes: Vec<NodeData>,
    tokens: Vec<Token>,
}

impl Ast {
    pub fn root(&self) -> AstNode<'_> {
        AstNode { ast: self, id: 0 }
    }

    /// Handle for a node id, if it exists
    pub fn node(&self, id: NodeId) -> Option<AstNode<'_>> {
        if (id as usize) < self.nodes.len() {
            Some(AstNode { ast: self, id })
        } else {
            None
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All tokens known to the tree, in input order
    pub fn token_table(&self) -> &[Token] {
        &self.tokens
    }

    pub(crate) fn parent_id(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id as usize].parent
    }

    pub(crate) fn children_ids(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id as usize].children
    }

    pub(crate) fn token_of(&self, id: NodeId) -> Option<&Token> {
        self.nodes[id as usize].token.map(|t| &self.tokens[t as usize])
    }

    pub(crate) fn token_id_of(&self, id: NodeId) -> Option<TokenId> {
        self.nodes[id as usize].token
    }

    pub(crate) fn type_of(&self, id: NodeId) -> AstNodeType {
        self.nodes[id as usize].node_type
    }

    pub(crate) fn next_sibling_id(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_id(id)?;
        let index = self.nodes[id as usize].child_index as usize;
        self.children_ids(parent).get(index + 1).copied()
    }

    pub(crate) fn previous_sibling_id(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_id(id)?;
        let index = self.nodes[id as usize].child_index as usize;
        if index == 0 {
            None
        } else {
            self.children_ids(parent).get(index - 1).copied()
        }
    }

    /// All descendants of `id` in document order (ids are contiguous in preorder)
    pub(crate) fn descendant_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children_ids(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children_ids(current).iter().rev());
        }
        result
    }
}

/// Borrowed handle on a node of an [`Ast`]
#[derive(Clone, Copy)]
pub struct AstNode<'a> {
    ast: &'a Ast,
    id: NodeId,
}

impl PartialEq for AstNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.ast, other.ast) && self.id == other.id
    }
}

impl Eq for AstNode<'_> {}

fn type_in<T: Copy + Into<AstNodeType>>(node_type: AstNodeType, types: &[T]) -> bool {
    types.iter().any(|&t| t.into() == node_type)
}

impl<'a> AstNode<'a> {
    fn at(&self, id: NodeId) -> AstNode<'a> {
        AstNode { ast: self.ast, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn node_type(&self) -> AstNodeType {
        self.ast.type_of(self.id)
    }

    pub fn name(&self) -> &'static str {
        self.node_type().name()
    }

    pub fn token(&self) -> Option<&'a Token> {
        self.ast.token_of(self.id)
    }

    pub fn has_token(&self) -> bool {
        self.ast.token_id_of(self.id).is_some()
    }

    /// Value of the token, empty when the node has no token
    pub fn token_value(&self) -> &'a str {
        self.token().map(|t| t.value()).unwrap_or("")
    }

    pub fn token_original_value(&self) -> &'a str {
        self.token().map(|t| t.original_value()).unwrap_or("")
    }

    pub fn token_line(&self) -> Option<usize> {
        self.token().map(|t| t.line())
    }

    pub fn from_index(&self) -> usize {
        self.ast.nodes[self.id as usize].from_index
    }

    pub fn to_index(&self) -> usize {
        self.ast.nodes[self.id as usize].to_index
    }

    pub fn parent(&self) -> Option<AstNode<'a>> {
        self.ast.parent_id(self.id).map(|p| self.at(p))
    }

    pub fn children(&self) -> impl Iterator<Item = AstNode<'a>> + 'a {
        let ast = self.ast;
        ast.children_ids(self.id)
            .iter()
            .map(move |&id| AstNode { ast, id })
    }

    pub fn number_of_children(&self) -> usize {
        self.ast.children_ids(self.id).len()
    }

    pub fn has_children(&self) -> bool {
        self.number_of_children() > 0
    }

    pub fn first_child(&self) -> Option<AstNode<'a>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<AstNode<'a>> {
        self.children().last()
    }

    /// First child of one of the given types; no types means any child
    pub fn first_child_of<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Option<AstNode<'a>> {
        self.children()
            .find(|c| types.is_empty() || type_in(c.node_type(), types))
    }

    /// Last child of one of the given types; no types means any child
    pub fn last_child_of<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Option<AstNode<'a>> {
        self.children()
            .filter(|c| types.is_empty() || type_in(c.node_type(), types))
            .last()
    }

    /// Children of the given types; no types means all children
    pub fn children_of<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Vec<AstNode<'a>> {
        self.children()
            .filter(|c| types.is_empty() || type_in(c.node_type(), types))
            .collect()
    }

    pub fn has_direct_children<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        self.first_child_of(types).is_some()
    }

    /// First descendant of one of the given types, in document order
    pub fn first_descendant<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Option<AstNode<'a>> {
        self.ast
            .descendant_ids(self.id)
            .into_iter()
            .map(|id| self.at(id))
            .find(|d| type_in(d.node_type(), types))
    }

    /// Descendants of the given types, in document order
    pub fn descendants<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Vec<AstNode<'a>> {
        self.ast
            .descendant_ids(self.id)
            .into_iter()
            .map(|id| self.at(id))
            .filter(|d| type_in(d.node_type(), types))
            .collect()
    }

    pub fn has_descendant<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        self.first_descendant(types).is_some()
    }

    pub fn has_parent<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        self.parent().is_some_and(|p| p.is(types))
    }

    pub fn first_ancestor<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> Option<AstNode<'a>> {
        let mut current = self.parent();
        while let Some(node) = current {
            if node.is(types) {
                return Some(node);
            }
            current = node.parent();
        }
        None
    }

    pub fn has_ancestor<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        self.first_ancestor(types).is_some()
    }

    pub fn is<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        type_in(self.node_type(), types)
    }

    pub fn is_not<T: Copy + Into<AstNodeType>>(&self, types: &[T]) -> bool {
        !self.is(types)
    }

    pub fn next_sibling(&self) -> Option<AstNode<'a>> {
        self.ast.next_sibling_id(self.id).map(|id| self.at(id))
    }

    pub fn previous_sibling(&self) -> Option<AstNode<'a>> {
        self.ast.previous_sibling_id(self.id).map(|id| self.at(id))
    }

    /// Next sibling, or the next AST node of the closest ancestor having one
    pub fn next_ast_node(&self) -> Option<AstNode<'a>> {
        self.next_sibling()
            .or_else(|| self.parent().and_then(|p| p.next_ast_node()))
    }

    /// Previous sibling, or the previous AST node of the closest ancestor having one
    pub fn previous_ast_node(&self) -> Option<AstNode<'a>> {
        self.previous_sibling()
            .or_else(|| self.parent().and_then(|p| p.previous_ast_node()))
    }

    /// Tokens of the leaves under this node, in input order
    pub fn tokens(&self) -> Vec<&'a Token> {
        let mut tokens = Vec::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let children = self.ast.children_ids(id);
            if children.is_empty() {
                if let Some(token) = self.ast.token_of(id) {
                    tokens.push(token);
                }
            } else {
                stack.extend(children.iter().rev());
            }
        }
        tokens
    }

    /// Token of the last leaf carrying a token
    pub fn last_token(&self) -> Option<&'a Token> {
        if !self.has_token() {
            return None;
        }
        let mut current = *self;
        while current.has_children() {
            current = current.children().filter(|c| c.has_token()).last()?;
        }
        current.token()
    }
}

impl fmt::Display for AstNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if let Some(token) = self.token() {
            write!(
                f,
                " tokenValue='{}' tokenLine={} tokenColumn={}",
                token.value(),
                token.line(),
                token.column()
            )?;
        }
        Ok(())
    }
}

impl fmt::Debug for AstNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AstNode({}, {})", self.id, self)
    }
}
