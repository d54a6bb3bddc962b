//! Lexerless parse runner

use tracing::trace;

use super::parse_error::ParseError;
use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::Grammar;
use crate::vm::{CompiledGrammar, Machine, ParseNode, ParseNodeId, ParseTree};

/// Compiles a rule once and runs it over any number of inputs
#[derive(Debug)]
pub struct ParseRunner {
    compiled: CompiledGrammar,
}

impl ParseRunner {
    /// Runner for the grammar's root rule
    pub fn new(grammar: &Grammar) -> Result<Self> {
        Ok(ParseRunner {
            compiled: CompiledGrammar::compile(grammar)?,
        })
    }

    pub fn for_rule(grammar: &Grammar, rule: RuleKey) -> Result<Self> {
        Ok(ParseRunner {
            compiled: CompiledGrammar::compile_rule(grammar, rule)?,
        })
    }

    pub fn compiled_grammar(&self) -> &CompiledGrammar {
        &self.compiled
    }

    /// Runs the rule over `text`; a failed match is not an error
    pub fn parse<'t>(&self, text: &'t str) -> Result<ParsingResult<'t>> {
        let outcome = Machine::parse_text(&self.compiled, text)?;
        trace!(
            matched = outcome.matched,
            nodes = outcome.tree.len(),
            error_index = outcome.error_index,
            "parse finished"
        );
        let error = (!outcome.matched).then(|| ParseError::new(text, outcome.error_index));
        Ok(ParsingResult {
            text,
            matched: outcome.matched,
            tree: outcome.tree,
            root: outcome.root,
            error,
        })
    }
}

#[derive(Debug)]
pub struct ParsingResult<'t> {
    text: &'t str,
    matched: bool,
    tree: ParseTree,
    root: Option<ParseNodeId>,
    error: Option<ParseError<'t>>,
}

impl<'t> ParsingResult<'t> {
    pub fn text(&self) -> &'t str {
        self.text
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn parse_error(&self) -> Option<&ParseError<'t>> {
        self.error.as_ref()
    }

    pub fn tree(&self) -> &ParseTree {
        &self.tree
    }

    pub fn parse_tree_root_id(&self) -> Option<ParseNodeId> {
        self.root
    }

    pub fn parse_tree_root(&self) -> Option<&ParseNode> {
        self.root.map(|id| self.tree.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::LexerlessGrammarBuilder;

    const A: RuleKey = RuleKey::new("A");
    const B: RuleKey = RuleKey::new("B");

    fn grammar() -> Grammar {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is((B, b.regexp("[0-9]+"), b.end_of_input()));
        b.rule(B).is("x");
        b.set_root_rule(A);
        b.build().unwrap()
    }

    #[test]
    fn test_matched() {
        let runner = ParseRunner::new(&grammar()).unwrap();
        let result = runner.parse("x42").unwrap();
        assert!(result.is_matched());
        assert!(result.parse_error().is_none());
        let root = result.parse_tree_root().unwrap();
        assert_eq!((root.start, root.end), (0, 3));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_not_matched() {
        let runner = ParseRunner::new(&grammar()).unwrap();
        let result = runner.parse("x4y").unwrap();
        assert!(!result.is_matched());
        assert!(result.parse_tree_root().is_none());
        assert_eq!(result.parse_error().unwrap().error_index(), 2);
    }

    #[test]
    fn test_runner_for_sub_rule() {
        let runner = ParseRunner::for_rule(&grammar(), B).unwrap();
        assert!(runner.parse("x").unwrap().is_matched());
        assert!(!runner.parse("y").unwrap().is_matched());
    }
}
