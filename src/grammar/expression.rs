//! Parsing expressions

use crate::api::{RuleKey, TokenType, TriviaKind};

/// A parsing expression
///
/// Built with the combinators of the grammar builders, or directly through
/// the `From` conversions: strings and chars are literals, rule keys are
/// rule references, token types match one token and tuples are sequences.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Sequence(Vec<Expression>),
    FirstOf(Vec<Expression>),
    Optional(Box<Expression>),
    ZeroOrMore(Box<Expression>),
    OneOrMore(Box<Expression>),
    Next(Box<Expression>),
    NextNot(Box<Expression>),
    /// Everything matched by the inner expression becomes one token
    Token(TokenType, Box<Expression>),
    Trivia(TriviaKind, Box<Expression>),
    Rule(RuleKey),
    /// Characters in lexerless grammars, token value in lexerful grammars
    Literal(String),
    Pattern(String),
    EndOfInput,
    Nothing,
    TokenType(TokenType),
    TokenTypes(Vec<TokenType>),
    TokenTypeClass(&'static str),
    AnyToken,
    TillNewLine,
    Adjacent,
    Bridge(TokenType, TokenType),
}

impl Expression {
    /// Name of the variant, used in grammar error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Sequence(_) => "Sequence",
            Expression::FirstOf(_) => "FirstOf",
            Expression::Optional(_) => "Optional",
            Expression::ZeroOrMore(_) => "ZeroOrMore",
            Expression::OneOrMore(_) => "OneOrMore",
            Expression::Next(_) => "Next",
            Expression::NextNot(_) => "NextNot",
            Expression::Token(..) => "Token",
            Expression::Trivia(..) => "Trivia",
            Expression::Rule(_) => "Rule",
            Expression::Literal(_) => "Literal",
            Expression::Pattern(_) => "Pattern",
            Expression::EndOfInput => "EndOfInput",
            Expression::Nothing => "Nothing",
            Expression::TokenType(_) => "TokenType",
            Expression::TokenTypes(_) => "TokenTypes",
            Expression::TokenTypeClass(_) => "TokenTypeClass",
            Expression::AnyToken => "AnyToken",
            Expression::TillNewLine => "TillNewLine",
            Expression::Adjacent => "Adjacent",
            Expression::Bridge(..) => "Bridge",
        }
    }

    /// Direct sub-expressions
    pub fn sub_expressions(&self) -> &[Expression] {
        match self {
            Expression::Sequence(subs) | Expression::FirstOf(subs) => subs,
            Expression::Optional(sub)
            | Expression::ZeroOrMore(sub)
            | Expression::OneOrMore(sub)
            | Expression::Next(sub)
            | Expression::NextNot(sub)
            | Expression::Token(_, sub)
            | Expression::Trivia(_, sub) => std::slice::from_ref(sub.as_ref()),
            _ => &[],
        }
    }

    /// Calls `f` on this expression and every nested one, depth first
    pub fn for_each(&self, f: &mut impl FnMut(&Expression)) {
        f(self);
        for sub in self.sub_expressions() {
            sub.for_each(f);
        }
    }
}

impl From<&str> for Expression {
    fn from(value: &str) -> Self {
        Expression::Literal(value.to_string())
    }
}

impl From<String> for Expression {
    fn from(value: String) -> Self {
        Expression::Literal(value)
    }
}

impl From<char> for Expression {
    fn from(value: char) -> Self {
        Expression::Literal(value.to_string())
    }
}

impl From<RuleKey> for Expression {
    fn from(key: RuleKey) -> Self {
        Expression::Rule(key)
    }
}

impl From<TokenType> for Expression {
    fn from(token_type: TokenType) -> Self {
        Expression::TokenType(token_type)
    }
}

impl From<&Expression> for Expression {
    fn from(expression: &Expression) -> Self {
        expression.clone()
    }
}

/// A list of expressions, for the variadic combinators
pub trait IntoExpressions {
    fn into_expressions(self) -> Vec<Expression>;
}

impl<E: Into<Expression>> IntoExpressions for Vec<E> {
    fn into_expressions(self) -> Vec<Expression> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<E: Into<Expression>, const N: usize> IntoExpressions for [E; N] {
    fn into_expressions(self) -> Vec<Expression> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! tuple_expressions {
    ($($name:ident),+) => {
        impl<$($name: Into<Expression>),+> IntoExpressions for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_expressions(self) -> Vec<Expression> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }

        impl<$($name: Into<Expression>),+> From<($($name,)+)> for Expression {
            fn from(tuple: ($($name,)+)) -> Self {
                Expression::Sequence(tuple.into_expressions())
            }
        }
    };
}

tuple_expressions!(A, B);
tuple_expressions!(A, B, C);
tuple_expressions!(A, B, C, D);
tuple_expressions!(A, B, C, D, E);
tuple_expressions!(A, B, C, D, E, F);
tuple_expressions!(A, B, C, D, E, F, G);
tuple_expressions!(A, B, C, D, E, F, G, H);
tuple_expressions!(A, B, C, D, E, F, G, H, I);
tuple_expressions!(A, B, C, D, E, F, G, H, I, J);
