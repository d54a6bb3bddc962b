//! Grammar Module - parsing expressions and rule definitions
//!
//! A grammar is described with a builder:
//! - `LexerlessGrammarBuilder` matches characters (literals, regular expressions)
//! - `LexerfulGrammarBuilder` matches tokens produced by a lexer

pub mod builder;
pub mod expression;

use std::collections::HashMap;

pub use builder::{LexerfulGrammarBuilder, LexerlessGrammarBuilder, RuleBuilder};
pub use expression::{Expression, IntoExpressions};

use crate::api::RuleKey;
use crate::ast::SkipPolicy;

/// What the machine consumes when running a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrammarMode {
    Lexerless,
    Lexerful,
}

/// Definition of one rule
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    key: RuleKey,
    expression: Expression,
    skip: SkipPolicy,
    memoize: bool,
}

impl RuleDefinition {
    pub fn key(&self) -> RuleKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn skip_policy(&self) -> SkipPolicy {
        self.skip
    }

    /// Whether matches of this rule are memoized by the machine
    pub fn memoize(&self) -> bool {
        self.memoize
    }
}

/// Immutable set of rule definitions
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: HashMap<RuleKey, RuleDefinition>,
    order: Vec<RuleKey>,
    root: Option<RuleKey>,
    mode: GrammarMode,
}

impl Grammar {
    pub fn rule(&self, key: RuleKey) -> Option<&RuleDefinition> {
        self.rules.get(&key)
    }

    /// Rules in declaration order
    pub fn rules(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.order.iter().filter_map(|key| self.rules.get(key))
    }

    pub fn root_rule(&self) -> Option<RuleKey> {
        self.root
    }

    pub fn mode(&self) -> GrammarMode {
        self.mode
    }
}
