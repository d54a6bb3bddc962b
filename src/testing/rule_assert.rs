//! Assertions on single rules of lexerless grammars

use crate::api::RuleKey;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};
use crate::parser::{ParseErrorFormatter, ParseRunner};

/// Rule wrapped with an end of input check
const WITH_END_OF_INPUT: RuleKey = RuleKey::new("[with end of input]");

/// Checks what a rule of a lexerless grammar recognizes
///
/// ```
/// use flr::api::RuleKey;
/// use flr::grammar::LexerlessGrammarBuilder;
/// use flr::testing::RuleAssert;
///
/// const NUMBER: RuleKey = RuleKey::new("NUMBER");
///
/// let b = LexerlessGrammarBuilder::create();
/// b.rule(NUMBER).is(b.regexp("[0-9]+"));
/// let grammar = b.build().unwrap();
///
/// RuleAssert::new(&grammar, NUMBER)
///     .matches("42")
///     .not_matches("4a")
///     .matches_prefix("4", "a");
/// ```
pub struct RuleAssert<'g> {
    grammar: &'g Grammar,
    rule: RuleKey,
}

impl<'g> RuleAssert<'g> {
    pub fn new(grammar: &'g Grammar, rule: RuleKey) -> Self {
        RuleAssert { grammar, rule }
    }

    fn runner_with_end_of_input(&self) -> ParseRunner {
        let b = LexerlessGrammarBuilder::create_based_on(self.grammar);
        b.rule(WITH_END_OF_INPUT).is((self.rule, b.end_of_input()));
        let grammar = b
            .build()
            .unwrap_or_else(|e| panic!("Rule '{}' cannot be compiled: {}", self.rule, e));
        self.runner(&grammar, WITH_END_OF_INPUT)
    }

    fn runner(&self, grammar: &Grammar, rule: RuleKey) -> ParseRunner {
        ParseRunner::for_rule(grammar, rule)
            .unwrap_or_else(|e| panic!("Rule '{}' cannot be compiled: {}", self.rule, e))
    }

    /// The rule matches the whole of `input`
    #[track_caller]
    pub fn matches(self, input: &str) -> Self {
        let runner = self.runner_with_end_of_input();
        let result = runner.parse(input).unwrap_or_else(|e| panic!("{}", e));
        if let Some(error) = result.parse_error() {
            panic!(
                "Rule '{}' should match:\n{}\n{}",
                self.rule,
                input,
                ParseErrorFormatter.format(error)
            );
        }
        self
    }

    /// The rule does not match the whole of `input`
    #[track_caller]
    pub fn not_matches(self, input: &str) -> Self {
        let runner = self.runner_with_end_of_input();
        let result = runner.parse(input).unwrap_or_else(|e| panic!("{}", e));
        if result.is_matched() {
            panic!("Rule '{}' should not match:\n{}", self.rule, input);
        }
        self
    }

    /// The rule matches exactly `prefix` when followed by `remaining`
    #[track_caller]
    pub fn matches_prefix(self, prefix: &str, remaining: &str) -> Self {
        let runner = self.runner(self.grammar, self.rule);
        let input = format!("{}{}", prefix, remaining);
        let result = runner.parse(&input).unwrap_or_else(|e| panic!("{}", e));
        if let Some(error) = result.parse_error() {
            panic!(
                "Rule '{}' should match:\n{}\nwhen followed by:\n{}\n{}",
                self.rule,
                prefix,
                remaining,
                ParseErrorFormatter.format(error)
            );
        }
        let end = result.parse_tree_root().map_or(0, |root| root.end);
        if end != prefix.len() {
            panic!(
                "Rule '{}' should match:\n{}\nwhen followed by:\n{}\nbut matched:\n{}",
                self.rule,
                prefix,
                remaining,
                &input[..end]
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: RuleKey = RuleKey::new("GREETING");

    fn grammar() -> Grammar {
        let b = LexerlessGrammarBuilder::create();
        b.rule(GREETING).is(b.first_of(("foo", "bar")));
        b.build().unwrap()
    }

    #[test]
    fn test_ok() {
        let grammar = grammar();
        RuleAssert::new(&grammar, GREETING)
            .matches("foo")
            .not_matches("foo bar")
            .matches_prefix("foo", " bar");
    }

    #[test]
    #[should_panic(expected = "Rule 'GREETING' should match:\nbaz")]
    fn test_matches_failure() {
        let grammar = grammar();
        RuleAssert::new(&grammar, GREETING).matches("baz");
    }

    #[test]
    #[should_panic(expected = "Rule 'GREETING' should not match:\nfoo")]
    fn test_not_matches_failure() {
        let grammar = grammar();
        RuleAssert::new(&grammar, GREETING).not_matches("foo");
    }

    #[test]
    #[should_panic(expected = "but matched:\nfoo")]
    fn test_matches_prefix_failure() {
        let grammar = grammar();
        RuleAssert::new(&grammar, GREETING).matches_prefix("fo", "o");
    }

    #[test]
    #[should_panic(expected = "when followed by:\nbar")]
    fn test_matches_prefix_no_match() {
        let grammar = grammar();
        RuleAssert::new(&grammar, GREETING).matches_prefix("baz", "bar");
    }
}
