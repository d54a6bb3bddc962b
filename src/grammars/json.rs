//! JSON

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const JSON: RuleKey = RuleKey::new("JSON");
pub const ARRAY: RuleKey = RuleKey::new("ARRAY");
pub const OBJECT: RuleKey = RuleKey::new("OBJECT");
pub const PAIR: RuleKey = RuleKey::new("PAIR");
pub const VALUE: RuleKey = RuleKey::new("VALUE");
pub const STRING: RuleKey = RuleKey::new("STRING");
pub const NUMBER: RuleKey = RuleKey::new("NUMBER");
pub const TRUE: RuleKey = RuleKey::new("TRUE");
pub const FALSE: RuleKey = RuleKey::new("FALSE");
pub const NULL: RuleKey = RuleKey::new("NULL");
pub const WHITESPACE: RuleKey = RuleKey::new("WHITESPACE");

pub fn grammar() -> Result<Grammar> {
    let b = LexerlessGrammarBuilder::create();
    b.rule(JSON).is(b.first_of((ARRAY, OBJECT)));
    b.rule(OBJECT).is((
        "{",
        WHITESPACE,
        b.optional((PAIR, b.zero_or_more((",", WHITESPACE, PAIR)))),
        "}",
        WHITESPACE,
    ));
    b.rule(PAIR).is((STRING, ":", WHITESPACE, VALUE));
    b.rule(ARRAY).is((
        "[",
        WHITESPACE,
        b.optional((VALUE, b.zero_or_more((",", WHITESPACE, VALUE)))),
        "]",
        WHITESPACE,
    ));
    b.rule(STRING).is((
        '"',
        b.regexp(r#"([^"\\]|\\(["\\/bfnrt]|u[0-9a-fA-F]{4}))*"#),
        '"',
        WHITESPACE,
    ));
    b.rule(VALUE).is((
        b.first_of((STRING, NUMBER, OBJECT, ARRAY, TRUE, FALSE, NULL)),
        WHITESPACE,
    ));
    b.rule(NUMBER).is(b.regexp(r"-?(0|[1-9][0-9]*)(\.[0-9]+)?([eE][+-]?[0-9]+)?"));
    b.rule(TRUE).is("true");
    b.rule(FALSE).is("false");
    b.rule(NULL).is("null");
    b.rule(WHITESPACE).is(b.regexp("[ \n\r\t\x0C]*"));
    b.set_root_rule(JSON);
    b.build()
}
