//! Grammar builders
//!
//! Rules are declared through a shared reference so that combinators can be
//! called inline: `b.rule(A).is(b.sequence((B, "x")))`. Definition errors (a
//! rule defined twice) are recorded and reported by `build()`, together with
//! undefined rules and expressions that do not belong to the grammar's mode.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::debug;

use super::expression::{Expression, IntoExpressions};
use super::{Grammar, GrammarMode, RuleDefinition};
use crate::api::{RuleKey, TokenType, TriviaKind};
use crate::ast::SkipPolicy;
use crate::error::{Error, Result};

#[derive(Debug, Default)]
struct PendingRule {
    expression: Option<Expression>,
    skip: SkipPolicy,
    memoize: bool,
}

/// Rule table shared by both builders
#[derive(Debug, Default)]
struct Definitions {
    rules: HashMap<RuleKey, PendingRule>,
    order: Vec<RuleKey>,
    root: Option<RuleKey>,
    errors: Vec<Error>,
}

impl Definitions {
    fn from_grammar(grammar: &Grammar) -> Self {
        let mut definitions = Definitions {
            root: grammar.root_rule(),
            ..Default::default()
        };
        for rule in grammar.rules() {
            definitions.order.push(rule.key());
            definitions.rules.insert(
                rule.key(),
                PendingRule {
                    expression: Some(rule.expression().clone()),
                    skip: rule.skip_policy(),
                    memoize: rule.memoize(),
                },
            );
        }
        definitions
    }

    fn entry(&mut self, key: RuleKey) -> &mut PendingRule {
        if !self.rules.contains_key(&key) {
            self.order.push(key);
        }
        self.rules.entry(key).or_default()
    }

    fn build(self, mode: GrammarMode, memoize_all: bool) -> Result<Grammar> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }

        let mut referenced = Vec::new();
        for key in &self.order {
            if let Some(expression) = &self.rules[key].expression {
                expression.for_each(&mut |e| {
                    if let Expression::Rule(k) = e {
                        referenced.push(*k);
                    }
                });
            }
        }
        for key in self.order.iter().chain(referenced.iter()) {
            let defined = self.rules.get(key).is_some_and(|r| r.expression.is_some());
            if !defined {
                return Err(Error::grammar(format!("The rule '{}' hasn't been defined.", key)));
            }
        }

        let mut rules = HashMap::with_capacity(self.rules.len());
        let mut rules_in_order = Vec::with_capacity(self.order.len());
        let mut pending = self.rules;
        for key in self.order {
            let Some(rule) = pending.remove(&key) else {
                continue;
            };
            let Some(expression) = rule.expression else {
                continue;
            };
            check_mode(mode, &expression)?;
            rules_in_order.push(key);
            rules.insert(
                key,
                RuleDefinition {
                    key,
                    expression,
                    skip: rule.skip,
                    memoize: mode == GrammarMode::Lexerless || memoize_all || rule.memoize,
                },
            );
        }
        debug!(rules = rules.len(), ?mode, "grammar built");
        Ok(Grammar {
            rules,
            order: rules_in_order,
            root: self.root,
            mode,
        })
    }
}

fn check_mode(mode: GrammarMode, expression: &Expression) -> Result<()> {
    let mut invalid = None;
    expression.for_each(&mut |e| {
        let allowed = match mode {
            GrammarMode::Lexerless => !matches!(
                e,
                Expression::TokenType(_)
                    | Expression::TokenTypes(_)
                    | Expression::TokenTypeClass(_)
                    | Expression::AnyToken
                    | Expression::TillNewLine
                    | Expression::Adjacent
                    | Expression::Bridge(..)
            ),
            GrammarMode::Lexerful => !matches!(
                e,
                Expression::Pattern(_) | Expression::Token(..) | Expression::Trivia(..)
            ),
        };
        if !allowed && invalid.is_none() {
            invalid = Some(e.kind());
        }
    });
    match invalid {
        Some(kind) => Err(Error::grammar(format!("Incorrect type of parsing expression: {}", kind))),
        None => Ok(()),
    }
}

/// Gives a definition to one rule
pub struct RuleBuilder<'b> {
    definitions: &'b RefCell<Definitions>,
    key: RuleKey,
}

impl<'b> RuleBuilder<'b> {
    /// Defines the rule; a rule can only be defined once
    pub fn is(self, expression: impl Into<Expression>) -> Self {
        let key = self.key;
        let mut definitions = self.definitions.borrow_mut();
        let rule = definitions.entry(key);
        if rule.expression.is_some() {
            definitions.errors.push(Error::grammar(format!(
                "The rule '{}' has already been defined somewhere in the grammar.",
                key
            )));
        } else {
            rule.expression = Some(expression.into());
        }
        drop(definitions);
        self
    }

    /// Replaces any previous definition of the rule
    pub fn override_with(self, expression: impl Into<Expression>) -> Self {
        self.definitions.borrow_mut().entry(self.key).expression = Some(expression.into());
        self
    }

    /// The rule never creates an AST node, its children are attached to its parent
    pub fn skip(self) {
        self.definitions.borrow_mut().entry(self.key).skip = SkipPolicy::Always;
    }

    /// The rule creates no AST node when it has exactly one child
    pub fn skip_if_one_child(self) {
        self.definitions.borrow_mut().entry(self.key).skip = SkipPolicy::IfOneChild;
    }
}

macro_rules! common_combinators {
    () => {
        pub fn rule(&self, key: RuleKey) -> RuleBuilder<'_> {
            self.definitions.borrow_mut().entry(key);
            RuleBuilder {
                definitions: &self.definitions,
                key,
            }
        }

        pub fn set_root_rule(&self, key: RuleKey) {
            let mut definitions = self.definitions.borrow_mut();
            definitions.entry(key);
            definitions.root = Some(key);
        }

        pub fn sequence(&self, expressions: impl IntoExpressions) -> Expression {
            Expression::Sequence(expressions.into_expressions())
        }

        pub fn first_of(&self, expressions: impl IntoExpressions) -> Expression {
            Expression::FirstOf(expressions.into_expressions())
        }

        pub fn optional(&self, expression: impl Into<Expression>) -> Expression {
            Expression::Optional(Box::new(expression.into()))
        }

        pub fn one_or_more(&self, expression: impl Into<Expression>) -> Expression {
            Expression::OneOrMore(Box::new(expression.into()))
        }

        pub fn zero_or_more(&self, expression: impl Into<Expression>) -> Expression {
            Expression::ZeroOrMore(Box::new(expression.into()))
        }

        /// Positive lookahead
        pub fn next(&self, expression: impl Into<Expression>) -> Expression {
            Expression::Next(Box::new(expression.into()))
        }

        /// Negative lookahead
        pub fn next_not(&self, expression: impl Into<Expression>) -> Expression {
            Expression::NextNot(Box::new(expression.into()))
        }

        /// Always fails
        pub fn nothing(&self) -> Expression {
            Expression::Nothing
        }

        pub fn end_of_input(&self) -> Expression {
            Expression::EndOfInput
        }
    };
}

/// Builder of grammars matching characters directly
#[derive(Debug, Default)]
pub struct LexerlessGrammarBuilder {
    definitions: RefCell<Definitions>,
}

impl LexerlessGrammarBuilder {
    pub fn create() -> Self {
        Self::default()
    }

    /// Builder pre-filled with the rules of `grammar`
    pub fn create_based_on(grammar: &Grammar) -> Self {
        LexerlessGrammarBuilder {
            definitions: RefCell::new(Definitions::from_grammar(grammar)),
        }
    }

    common_combinators!();

    /// Regular expression anchored at the current position
    pub fn regexp(&self, regexp: &str) -> Expression {
        Expression::Pattern(regexp.to_string())
    }

    pub fn token(&self, token_type: TokenType, expression: impl Into<Expression>) -> Expression {
        Expression::Token(token_type, Box::new(expression.into()))
    }

    pub fn comment_trivia(&self, expression: impl Into<Expression>) -> Expression {
        Expression::Trivia(TriviaKind::Comment, Box::new(expression.into()))
    }

    pub fn skipped_trivia(&self, expression: impl Into<Expression>) -> Expression {
        Expression::Trivia(TriviaKind::SkippedText, Box::new(expression.into()))
    }

    pub fn build(self) -> Result<Grammar> {
        self.definitions.into_inner().build(GrammarMode::Lexerless, true)
    }
}

/// Builder of grammars matching the tokens produced by a lexer
#[derive(Debug, Default)]
pub struct LexerfulGrammarBuilder {
    definitions: RefCell<Definitions>,
}

impl LexerfulGrammarBuilder {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn create_based_on(grammar: &Grammar) -> Self {
        LexerfulGrammarBuilder {
            definitions: RefCell::new(Definitions::from_grammar(grammar)),
        }
    }

    common_combinators!();

    /// Matches `expression` only if its first token touches the previous one
    pub fn adjacent(&self, expression: impl Into<Expression>) -> Expression {
        Expression::Sequence(vec![Expression::Adjacent, expression.into()])
    }

    pub fn any_token(&self) -> Expression {
        Expression::AnyToken
    }

    pub fn any_token_but_not(&self, expression: impl Into<Expression>) -> Expression {
        Expression::Sequence(vec![
            Expression::NextNot(Box::new(expression.into())),
            Expression::AnyToken,
        ])
    }

    pub fn is_one_of_them(&self, types: &[TokenType]) -> Expression {
        Expression::TokenTypes(types.to_vec())
    }

    /// Matches from a `from` token to its balancing `to` token
    pub fn bridge(&self, from: TokenType, to: TokenType) -> Expression {
        Expression::Bridge(from, to)
    }

    pub fn till_new_line(&self) -> Expression {
        Expression::TillNewLine
    }

    /// Any tokens up to and including `expression`
    pub fn till(&self, expression: impl Into<Expression>) -> Expression {
        let expression = expression.into();
        Expression::Sequence(vec![
            Expression::ZeroOrMore(Box::new(Expression::Sequence(vec![
                Expression::NextNot(Box::new(expression.clone())),
                Expression::AnyToken,
            ]))),
            expression,
        ])
    }

    /// Any tokens up to, but excluding, the first of `expressions`
    pub fn exclusive_till(&self, expressions: impl IntoExpressions) -> Expression {
        let mut expressions = expressions.into_expressions();
        let stop = if expressions.len() == 1 {
            expressions.remove(0)
        } else {
            Expression::FirstOf(expressions)
        };
        Expression::ZeroOrMore(Box::new(Expression::Sequence(vec![
            Expression::NextNot(Box::new(stop)),
            Expression::AnyToken,
        ])))
    }

    pub fn token_type_class(&self, class: &'static str) -> Expression {
        Expression::TokenTypeClass(class)
    }

    pub fn build(self) -> Result<Grammar> {
        self.definitions.into_inner().build(GrammarMode::Lexerful, false)
    }

    pub fn build_with_memoization_of_matches_for_all_rules(self) -> Result<Grammar> {
        self.definitions.into_inner().build(GrammarMode::Lexerful, true)
    }
}
