//! Left recursion
//!
//! The parsing machine reports left recursive rules as grammar errors.
//! Each recursive grammar comes with an equivalent one where the
//! recursion has been eliminated.

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const A: RuleKey = RuleKey::new("A");
pub const B: RuleKey = RuleKey::new("B");
pub const T1: RuleKey = RuleKey::new("T1");
pub const T2: RuleKey = RuleKey::new("T2");
pub const S1: RuleKey = RuleKey::new("S1");
pub const S2: RuleKey = RuleKey::new("S2");

/// `A <- A T1 / A T2 / S1 / S2`
pub fn immediate_left_recursion() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is(b.first_of(((A, T1), (A, T2), S1, S2)));
    terminals(&b);
    b.build()
}

/// Non recursive alternatives factored out of [`immediate_left_recursion`]
pub fn eliminated_immediate_left_recursion() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is((b.first_of((S1, S2)), b.zero_or_more(b.first_of((T1, T2)))));
    terminals(&b);
    b.build()
}

/// `A <- B T1 / S1` and `B <- A T2 / S2`
pub fn indirect_left_recursion() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is(b.first_of(((B, T1), S1)));
    b.rule(B).is(b.first_of(((A, T2), S2)));
    terminals(&b);
    b.build()
}

/// [`indirect_left_recursion`] turned into immediate recursion, which is then eliminated
pub fn eliminated_indirect_left_recursion() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(A).is((b.first_of(((S2, T1), S1)), b.zero_or_more((T2, T1))));
    terminals(&b);
    b.build()
}

fn terminals(b: &LexerlessGrammarBuilder) {
    b.rule(T1).is("t1");
    b.rule(T2).is("t2");
    b.rule(S1).is("s1");
    b.rule(S2).is("s2");
}
