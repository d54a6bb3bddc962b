//! Lexerful parser: lexer tokens fed to a compiled grammar

use std::path::Path;

use tracing::{debug, warn};

use super::lexerful_ast_creator::LexerfulAstCreator;
use super::parse_error::{lexerful_error_line, LexerfulParseErrorFormatter};
use super::SourceParser;
use crate::api::{RuleKey, Token};
use crate::ast::Ast;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::vm::{CompiledGrammar, Machine};

#[derive(Debug)]
pub struct Parser {
    grammar: Grammar,
    lexer: Option<Lexer>,
    root_rule: RuleKey,
    compiled: CompiledGrammar,
}

impl Parser {
    pub fn builder(grammar: Grammar) -> ParserBuilder {
        ParserBuilder {
            grammar,
            lexer: None,
            root_rule: None,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn lexer(&self) -> Option<&Lexer> {
        self.lexer.as_ref()
    }

    pub fn root_rule(&self) -> RuleKey {
        self.root_rule
    }

    /// Parses from `rule` instead of the grammar's root rule from now on
    pub fn set_root_rule(&mut self, rule: RuleKey) -> Result<()> {
        self.compiled = CompiledGrammar::compile_rule(&self.grammar, rule)?;
        self.root_rule = rule;
        Ok(())
    }

    pub fn parse(&self, source: &str) -> Result<Ast> {
        let tokens = self.require_lexer()?.lex(source).map_err(lexer_failure)?;
        self.parse_tokens(tokens)
    }

    pub fn parse_file(&self, path: &Path) -> Result<Ast> {
        let tokens = self.require_lexer()?.lex_file(path).map_err(lexer_failure)?;
        let ast = self.parse_tokens(tokens)?;
        debug!(file = %path.display(), nodes = ast.len(), "file parsed");
        Ok(ast)
    }

    pub fn parse_tokens(&self, tokens: Vec<Token>) -> Result<Ast> {
        let outcome = Machine::parse_tokens(&self.compiled, &tokens)?;
        match outcome.root {
            Some(root) if outcome.matched => {
                LexerfulAstCreator::create(&self.compiled, &outcome.tree, root, tokens)
            }
            _ if tokens.is_empty() => Err(Error::recognition(1, "No tokens")),
            _ => {
                let line = lexerful_error_line(&tokens, outcome.error_index);
                warn!(line, "parse error");
                let message = LexerfulParseErrorFormatter.format(&tokens, outcome.error_index);
                Err(Error::recognition(line, message))
            }
        }
    }

    fn require_lexer(&self) -> Result<&Lexer> {
        self.lexer
            .as_ref()
            .ok_or_else(|| Error::grammar("a lexer should be provided"))
    }
}

impl SourceParser for Parser {
    fn parse(&self, source: &str) -> Result<Ast> {
        Parser::parse(self, source)
    }

    fn parse_file(&self, path: &Path) -> Result<Ast> {
        Parser::parse_file(self, path)
    }
}

fn lexer_failure(error: Error) -> Error {
    if let Error::Lexing { line, .. } = &error {
        let line = *line;
        return Error::recognition(line, error.to_string());
    }
    match error {
        Error::Lexer(message) => Error::recognition(0, message),
        other => other,
    }
}

#[derive(Debug)]
pub struct ParserBuilder {
    grammar: Grammar,
    lexer: Option<Lexer>,
    root_rule: Option<RuleKey>,
}

impl ParserBuilder {
    pub fn with_lexer(mut self, lexer: Lexer) -> Self {
        self.lexer = Some(lexer);
        self
    }

    /// Start rule, the grammar's root rule by default
    pub fn with_root_rule(mut self, rule: RuleKey) -> Self {
        self.root_rule = Some(rule);
        self
    }

    pub fn build(self) -> Result<Parser> {
        let root_rule = self
            .root_rule
            .or(self.grammar.root_rule())
            .ok_or_else(|| Error::grammar("The grammar has no root rule."))?;
        let compiled = CompiledGrammar::compile_rule(&self.grammar, root_rule)?;
        Ok(Parser {
            grammar: self.grammar,
            lexer: self.lexer,
            root_rule,
            compiled,
        })
    }
}
