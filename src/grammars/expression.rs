//! Arithmetic expressions, with whitespace kept as comment trivia

use crate::api::RuleKey;
use crate::error::Result;
use crate::grammar::{Grammar, LexerlessGrammarBuilder};

pub const WHITESPACE: RuleKey = RuleKey::new("WHITESPACE");
pub const PLUS: RuleKey = RuleKey::new("PLUS");
pub const MINUS: RuleKey = RuleKey::new("MINUS");
pub const DIV: RuleKey = RuleKey::new("DIV");
pub const MUL: RuleKey = RuleKey::new("MUL");
pub const NUMBER: RuleKey = RuleKey::new("NUMBER");
pub const VARIABLE: RuleKey = RuleKey::new("VARIABLE");
pub const LPAR: RuleKey = RuleKey::new("LPAR");
pub const RPAR: RuleKey = RuleKey::new("RPAR");
pub const EXPRESSION: RuleKey = RuleKey::new("EXPRESSION");
pub const ADDITIVE_EXPRESSION: RuleKey = RuleKey::new("ADDITIVE_EXPRESSION");
pub const MULTIPLICATIVE_EXPRESSION: RuleKey = RuleKey::new("MULTIPLICATIVE_EXPRESSION");
pub const PRIMARY: RuleKey = RuleKey::new("PRIMARY");
pub const PARENS: RuleKey = RuleKey::new("PARENS");
pub const FUNCTION_CALL: RuleKey = RuleKey::new("FUNCTION_CALL");

/// Builder with every rule defined, ready to be extended or built
pub fn grammar_builder() -> LexerlessGrammarBuilder {
    let b = LexerlessGrammarBuilder::create();
    b.rule(WHITESPACE).is(b.comment_trivia(b.regexp("\\s*"))).skip();
    b.rule(PLUS).is(('+', WHITESPACE));
    b.rule(MINUS).is(('-', WHITESPACE));
    b.rule(DIV).is(('/', WHITESPACE));
    b.rule(MUL).is(('*', WHITESPACE));
    b.rule(NUMBER).is((b.regexp("[0-9]+"), WHITESPACE));
    b.rule(VARIABLE).is((b.regexp("[\\p{L}_$][\\p{L}\\p{N}_$]*"), WHITESPACE));
    b.rule(LPAR).is(('(', WHITESPACE));
    b.rule(RPAR).is((')', WHITESPACE));
    b.rule(EXPRESSION).is((WHITESPACE, ADDITIVE_EXPRESSION, b.end_of_input()));
    b.rule(ADDITIVE_EXPRESSION).is((
        MULTIPLICATIVE_EXPRESSION,
        b.zero_or_more((b.first_of((PLUS, MINUS)), MULTIPLICATIVE_EXPRESSION)),
    ));
    b.rule(MULTIPLICATIVE_EXPRESSION)
        .is((PRIMARY, b.zero_or_more((b.first_of((DIV, MUL)), PRIMARY))))
        .skip_if_one_child();
    b.rule(PRIMARY).is(b.first_of((NUMBER, PARENS, VARIABLE))).skip_if_one_child();
    b.rule(PARENS).is((LPAR, ADDITIVE_EXPRESSION, RPAR));
    b.set_root_rule(EXPRESSION);
    b
}

pub fn grammar() -> Result<Grammar> {
    grammar_builder().build()
}

/// Expressions with worded operators and calls of functions without
/// arguments, defined by overriding rules of `base`
pub fn extended_grammar_builder(base: LexerlessGrammarBuilder) -> LexerlessGrammarBuilder {
    let b = base;
    b.rule(PLUS).override_with(("plus", WHITESPACE));
    b.rule(MINUS).override_with(("minus", WHITESPACE));
    b.rule(DIV).override_with(("div", WHITESPACE));
    b.rule(MUL).override_with(("mul", WHITESPACE));
    b.rule(PRIMARY)
        .override_with(b.first_of((NUMBER, PARENS, FUNCTION_CALL, VARIABLE)))
        .skip_if_one_child();
    b.rule(FUNCTION_CALL).is((VARIABLE, LPAR, RPAR));
    b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;
    use crate::parser::ParserAdapter;
    use crate::testing::RuleAssert;

    #[test]
    fn test_rules() {
        let g = grammar().unwrap();
        RuleAssert::new(&g, EXPRESSION)
            .matches("1 + 1")
            .not_matches("1 +")
            .matches("20 * ( 2 + 2 ) - var");
    }

    #[test]
    fn test_ast() {
        let parser = ParserAdapter::new(Charset::Utf8, grammar().unwrap()).unwrap();
        let ast = parser.parse("2 + var").unwrap();
        let root = ast.root();
        assert_eq!(root.name(), "EXPRESSION");
        assert_eq!(root.number_of_children(), 1);

        let additive = root.first_child().unwrap();
        assert_eq!(additive.name(), "ADDITIVE_EXPRESSION");
        let names = additive.children().map(|c| c.name()).collect::<Vec<_>>();
        assert_eq!(names, ["NUMBER", "PLUS", "VARIABLE"]);
    }

    #[test]
    fn test_whitespace_is_trivia() {
        let parser = ParserAdapter::new(Charset::Utf8, grammar().unwrap()).unwrap();
        let ast = parser.parse("1 +  2").unwrap();
        let tokens = ast.root().tokens();
        assert!(tokens.iter().all(|t| !t.value().trim().is_empty()));
        assert!(tokens
            .iter()
            .flat_map(|t| t.trivia())
            .any(|trivia| trivia.is_comment()));
    }

    #[test]
    fn test_extension_rules() {
        let g = extended_grammar_builder(grammar_builder()).build().unwrap();
        RuleAssert::new(&g, EXPRESSION)
            .not_matches("1 + 1")
            .matches("1 plus 1")
            .not_matches("20 * ( 2 + 2 ) - var")
            .matches("20 mul ( 2 plus 2 ) minus var")
            .matches("1 plus fun()");
    }
}
