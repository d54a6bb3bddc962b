//! Conversion of lexerful parse trees into ASTs

use crate::api::{RuleKey, Token};
use crate::ast::{Ast, AstBuilder, AstNodeType, NodeId, SkipPolicy, TokenId};
use crate::error::{Error, Result};
use crate::vm::{CompiledGrammar, Matcher, ParseNodeId, ParseTree};

pub struct LexerfulAstCreator<'a> {
    grammar: &'a CompiledGrammar,
    tree: &'a ParseTree,
    builder: AstBuilder,
}

impl<'a> LexerfulAstCreator<'a> {
    /// Builds the AST rooted at `root`; the token table becomes the AST's
    pub fn create(
        grammar: &'a CompiledGrammar,
        tree: &'a ParseTree,
        root: ParseNodeId,
        tokens: Vec<Token>,
    ) -> Result<Ast> {
        let mut creator = LexerfulAstCreator {
            grammar,
            tree,
            builder: AstBuilder::with_tokens(tokens),
        };
        let root = creator
            .visit(root)
            .ok_or_else(|| Error::grammar("The root of the parse tree produced no AST node"))?;
        Ok(creator.builder.finish(root))
    }

    fn visit(&mut self, id: ParseNodeId) -> Option<NodeId> {
        match self.grammar.matcher(self.tree.get(id).matcher) {
            Matcher::Rule { key, skip, .. } => {
                let (key, skip) = (*key, *skip);
                Some(self.visit_non_terminal(id, key, skip))
            }
            _ => self.visit_terminal(id),
        }
    }

    fn visit_non_terminal(&mut self, id: ParseNodeId, key: RuleKey, skip: SkipPolicy) -> NodeId {
        let node = self.tree.get(id);
        let token = self.token_id(node.start);
        let ast_node = self.builder.node(AstNodeType::Rule(key), skip, token);
        for &child in &node.children {
            if let Some(child) = self.visit(child) {
                self.builder.add_child(ast_node, child);
            }
        }
        self.builder.set_range(ast_node, node.start, node.end);
        ast_node
    }

    fn visit_terminal(&mut self, id: ParseNodeId) -> Option<NodeId> {
        let node = self.tree.get(id);
        let token = self.token_id(node.start)?;
        if matches!(self.grammar.matcher(node.matcher), Matcher::TokenType(_))
            && self.builder.token(token).token_type().has_to_be_skipped_from_ast()
        {
            return None;
        }
        let ast_node = self.builder.token_node(token);
        self.builder.set_range(ast_node, node.start, node.end);
        Some(ast_node)
    }

    fn token_id(&self, index: usize) -> Option<TokenId> {
        (index < self.builder.token_count()).then_some(index as TokenId)
    }
}
