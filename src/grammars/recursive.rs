//! Balanced parentheses, nested as deep as the input goes

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const S: RuleKey = RuleKey::new("S");

pub fn grammar() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(S).is(("(", b.optional(S), ")"));
    b.set_root_rule(S);
    b.build()
}
