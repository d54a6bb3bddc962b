//! Grammars whose parse time depends on memoization of rule matches
//!
//! Every rule of a lexerless grammar is memoized, which keeps the
//! positive cases linear.

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const A: RuleKey = RuleKey::new("A");
pub const B: RuleKey = RuleKey::new("B");
pub const C: RuleKey = RuleKey::new("C");

/// Never matches, in a time exponential in the input length
pub fn requires_negative_memoization() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is(('a', b.first_of(((A, 'b'), (A, 'c')))));
    b.build()
}

/// Linear once the match of `B` is reused by the second alternative
pub fn requires_positive_memoization() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is(b.first_of(((b.optional(B), 'a'), (b.optional(B), 'b'))));
    b.rule(B).is(('(', A, ')'));
    b.build()
}

/// The match of `C` overwrites the memoized match of `B` at the same position
pub fn requires_positive_memoization_on_more_than_just_last_rule() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is(b.first_of((
        (b.optional(B), 'a'),
        (C, '!'),
        (b.optional(B), 'b'),
    )));
    b.rule(B).is(('(', A, ')'));
    b.rule(C).is(('(', b.optional(C)));
    b.build()
}
