//! Conversion of lexerless parse trees into ASTs
//!
//! Tokens are cut out of the matched text. Comment trivia are held back
//! and attached to the next token; skipped trivia disappear.

use super::located_text::LocatedText;
use super::runner::ParsingResult;
use crate::api::{GenericTokenType, Token, TokenType, Trivia, TriviaKind};
use crate::ast::{Ast, AstBuilder, AstNodeType, NodeId, SkipPolicy};
use crate::error::{Error, Result};
use crate::vm::{CompiledGrammar, Matcher, ParseNodeId, ParseTree};

/// Type of tokens produced by terminals that are not wrapped in a token expression
pub const UNDEFINED_TOKEN_TYPE: TokenType = TokenType::new("Undefined", "TOKEN", "TOKEN");

pub struct AstCreator<'a> {
    grammar: &'a CompiledGrammar,
    tree: &'a ParseTree,
    input: &'a LocatedText<'a>,
    builder: AstBuilder,
    trivia: Vec<Trivia>,
}

impl<'a> AstCreator<'a> {
    /// Builds the AST of a successful parse
    pub fn create(grammar: &'a CompiledGrammar, result: &'a ParsingResult<'_>, input: &'a LocatedText<'a>) -> Result<Ast> {
        let root = result
            .parse_tree_root_id()
            .ok_or_else(|| Error::grammar("Cannot create an AST from a failed parse"))?;
        let mut creator = AstCreator {
            grammar,
            tree: result.tree(),
            input,
            builder: AstBuilder::new(),
            trivia: Vec::new(),
        };
        let root = creator
            .visit(root)?
            .ok_or_else(|| Error::grammar("The root of the parse tree is not a rule"))?;
        Ok(creator.builder.finish(root))
    }

    fn visit(&mut self, id: ParseNodeId) -> Result<Option<NodeId>> {
        let node = self.tree.get(id);
        match self.grammar.matcher(node.matcher) {
            Matcher::Rule { key, skip, .. } => {
                let (key, skip) = (*key, *skip);
                self.visit_non_terminal(id, AstNodeType::Rule(key), skip).map(Some)
            }
            _ => self.visit_terminal(id),
        }
    }

    fn visit_non_terminal(&mut self, id: ParseNodeId, node_type: AstNodeType, skip: SkipPolicy) -> Result<NodeId> {
        let node = self.tree.get(id);
        let ast_node = self.builder.node(node_type, skip, None);
        for &child in &node.children {
            if let Some(child) = self.visit(child)? {
                self.builder.add_child(ast_node, child);
            }
        }
        let token = self
            .builder
            .children(ast_node)
            .iter()
            .find_map(|&child| self.builder.node_token(child));
        self.builder.set_token(ast_node, token);
        self.builder.set_range(ast_node, node.start, node.end);
        Ok(ast_node)
    }

    fn visit_terminal(&mut self, id: ParseNodeId) -> Result<Option<NodeId>> {
        let node = self.tree.get(id);
        let token_type = match self.grammar.matcher(node.matcher) {
            Matcher::Trivia(TriviaKind::SkippedText) => return Ok(None),
            Matcher::Trivia(TriviaKind::Comment) => GenericTokenType::COMMENT,
            Matcher::Token(token_type) => *token_type,
            _ => UNDEFINED_TOKEN_TYPE,
        };
        if token_type == GenericTokenType::COMMENT {
            let comment = self.token(id, token_type, Vec::new())?;
            self.trivia.push(Trivia::create_comment(comment));
            return Ok(None);
        }

        let trivia = std::mem::take(&mut self.trivia);
        let token = self.token(id, token_type, trivia)?;
        let token = self.builder.add_token(token);
        let ast_node = self.builder.token_node(token);
        self.builder.set_range(ast_node, node.start, node.end);
        Ok(Some(ast_node))
    }

    fn token(&self, id: ParseNodeId, token_type: TokenType, trivia: Vec<Trivia>) -> Result<Token> {
        let node = self.tree.get(id);
        let location = self.input.location(node.start)?;
        let text = self.input.text();
        let end = node.end.min(text.len());
        let value = text.get(node.start..end).unwrap_or_default();
        Token::builder()
            .token_type(token_type)
            .value_and_original_value(value)
            .line(location.line())
            .column(location.column() - 1)
            .generated_code(false)
            .trivia(trivia)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuleKey;
    use crate::grammar::{Grammar, LexerlessGrammarBuilder};
    use crate::parser::ParseRunner;

    const A: RuleKey = RuleKey::new("A");
    const B: RuleKey = RuleKey::new("B");
    const WS: RuleKey = RuleKey::new("WS");

    fn create(grammar: &Grammar, text: &str) -> Ast {
        let runner = ParseRunner::new(grammar).unwrap();
        let result = runner.parse(text).unwrap();
        assert!(result.is_matched());
        let located = LocatedText::new(None, text);
        AstCreator::create(runner.compiled_grammar(), &result, &located).unwrap()
    }

    #[test]
    fn test_comment_trivia_is_attached_to_next_token() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is((
            b.comment_trivia(b.regexp("//[^\\n]*\\n")),
            b.token(GenericTokenType::IDENTIFIER, b.regexp("[a-z]+")),
        ));
        b.set_root_rule(A);
        let ast = create(&b.build().unwrap(), "// c\nbar");

        let root = ast.root();
        assert_eq!(root.name(), "A");
        assert_eq!((root.from_index(), root.to_index()), (0, 8));
        assert_eq!(root.number_of_children(), 1);
        let token = root.token().unwrap();
        assert_eq!(token.value(), "bar");
        assert_eq!((token.line(), token.column()), (2, 0));
        assert_eq!(token.token_type(), GenericTokenType::IDENTIFIER);
        let trivia = &token.trivia()[0];
        assert!(trivia.is_comment());
        let comment = trivia.token().unwrap();
        assert_eq!(comment.value(), "// c\n");
        assert_eq!((comment.line(), comment.column()), (1, 0));
    }

    #[test]
    fn test_untyped_terminals_and_skipped_trivia() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is(("foo", WS, "bar"));
        b.rule(WS).is(b.skipped_trivia(b.regexp("\\s*"))).skip();
        b.set_root_rule(A);
        let ast = create(&b.build().unwrap(), "foo  bar");

        let root = ast.root();
        let values: Vec<_> = root.children().map(|c| c.token_value()).collect();
        assert_eq!(values, ["foo", "bar"]);
        let bar = root.last_child().unwrap();
        assert_eq!(bar.name(), "TOKEN");
        assert_eq!(bar.token().unwrap().column(), 5);
        assert_eq!(root.token_value(), "foo");
    }

    #[test]
    fn test_skipped_rule_without_children() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is(B);
        b.rule(B).is(b.optional("x")).skip();
        b.set_root_rule(A);
        let ast = create(&b.build().unwrap(), "");

        let root = ast.root();
        assert!(!root.has_children());
        assert!(!root.has_token());
        assert_eq!(ast.len(), 1);
    }

    #[test]
    fn test_skipped_rule_children_are_lifted() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is((B, "z"));
        b.rule(B).is(("x", "y")).skip();
        b.set_root_rule(A);
        let ast = create(&b.build().unwrap(), "xyz");

        let names: Vec<_> = ast.root().children().map(|c| c.token_value()).collect();
        assert_eq!(names, ["x", "y", "z"]);
    }
}
