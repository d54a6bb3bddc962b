//! Assertions on lexerful parsers

use crate::api::{GenericTokenType, RuleKey};
use crate::error::{Error, Result};
use crate::grammar::LexerfulGrammarBuilder;
use crate::parser::Parser;

const WITH_END_OF_INPUT: RuleKey = RuleKey::new("[with end of input]");

/// Checks what the root rule of a lexerful parser recognizes
///
/// Input is lexed with the parser's lexer; the root rule must then reach
/// the end of the input or the EOF token.
pub struct ParserAssert<'p> {
    parser: &'p Parser,
}

impl<'p> ParserAssert<'p> {
    pub fn new(parser: &'p Parser) -> Self {
        ParserAssert { parser }
    }

    fn parse_with_end_of_input(&self, input: &str) -> Result<()> {
        let rule = self.parser.root_rule();
        let b = LexerfulGrammarBuilder::create_based_on(self.parser.grammar());
        b.rule(WITH_END_OF_INPUT)
            .is((rule, b.first_of((b.end_of_input(), GenericTokenType::EOF))));
        let checker = Parser::builder(b.build()?)
            .with_root_rule(WITH_END_OF_INPUT)
            .build()?;
        let lexer = self
            .parser
            .lexer()
            .unwrap_or_else(|| panic!("The parser of rule '{}' has no lexer", rule));
        checker.parse_tokens(lexer.lex(input)?)?;
        Ok(())
    }

    #[track_caller]
    pub fn matches(self, input: &str) -> Self {
        if let Err(e) = self.parse_with_end_of_input(input) {
            let cause = match e {
                Error::Lexing { .. } => format!("Lexer error: {}", e),
                _ => e.to_string(),
            };
            panic!("Rule '{}' should match:\n{}\n{}", self.parser.root_rule(), input, cause);
        }
        self
    }

    #[track_caller]
    pub fn not_matches(self, input: &str) -> Self {
        if self.parse_with_end_of_input(input).is_ok() {
            panic!("Rule '{}' should not match:\n{}", self.parser.root_rule(), input);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::minic;

    #[test]
    fn test_ok() {
        let mut parser = minic::parser().unwrap();
        parser.set_root_rule(minic::EXPRESSION).unwrap();
        ParserAssert::new(&parser)
            .matches("a = 1 + 2")
            .matches("f(1, b)")
            .not_matches("a = ")
            .not_matches("1 2");
    }

    #[test]
    fn test_compilation_unit() {
        let parser = minic::parser().unwrap();
        ParserAssert::new(&parser)
            .matches("int a;")
            .matches("")
            .not_matches("int a");
    }

    #[test]
    #[should_panic(expected = "Rule 'STATEMENT' should match:\nreturn")]
    fn test_matches_failure() {
        let mut parser = minic::parser().unwrap();
        parser.set_root_rule(minic::STATEMENT).unwrap();
        ParserAssert::new(&parser).matches("return");
    }

    #[test]
    #[should_panic(expected = "Rule 'STATEMENT' should not match:\nbreak;")]
    fn test_not_matches_failure() {
        let mut parser = minic::parser().unwrap();
        parser.set_root_rule(minic::STATEMENT).unwrap();
        ParserAssert::new(&parser).not_matches("break;");
    }

    #[test]
    #[should_panic(expected = "Rule 'COMPILATION_UNIT' should match:\n$\nLexer error: Unable to lex source code at line : 1 and column : 0")]
    fn test_lexer_failure() {
        let parser = minic::parser().unwrap();
        ParserAssert::new(&parser).matches("$");
    }
}
