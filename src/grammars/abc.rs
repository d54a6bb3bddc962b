//! a^n b^n c^n, a language that is not context free

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const S: RuleKey = RuleKey::new("S");
pub const A: RuleKey = RuleKey::new("A");
pub const B: RuleKey = RuleKey::new("B");

pub fn grammar() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(S).is((
        b.next((A, "c")),
        b.one_or_more("a"),
        B,
        b.next_not(b.first_of(("a", "b", "c"))),
    ));
    b.rule(A).is(("a", b.optional(A), "b"));
    b.rule(B).is(("b", b.optional(B), "c"));
    b.set_root_rule(S);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RuleAssert;

    #[test]
    fn test_abc() {
        let g = grammar().unwrap();
        RuleAssert::new(&g, S)
            .matches("abc")
            .matches("aabbcc")
            .matches("aaabbbccc")
            .not_matches("aabc")
            .not_matches("aabbc")
            .not_matches("aabcc")
            .not_matches("abbc")
            .not_matches("abbcc")
            .not_matches("abcc");
    }
}
