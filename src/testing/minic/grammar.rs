//! MiniC grammar

use super::lexer::{keywords, literals, punctuators::*};
use crate::api::{GenericTokenType, RuleKey};
use crate::error::Result;
use crate::grammar::{Grammar, LexerfulGrammarBuilder};

pub const BIN_TYPE: RuleKey = RuleKey::new("BIN_TYPE");
pub const BIN_FUNCTION_DEFINITION: RuleKey = RuleKey::new("BIN_FUNCTION_DEFINITION");
pub const BIN_PARAMETER: RuleKey = RuleKey::new("BIN_PARAMETER");
pub const BIN_VARIABLE_DEFINITION: RuleKey = RuleKey::new("BIN_VARIABLE_DEFINITION");
pub const BIN_FUNCTION_REFERENCE: RuleKey = RuleKey::new("BIN_FUNCTION_REFERENCE");
pub const BIN_VARIABLE_REFERENCE: RuleKey = RuleKey::new("BIN_VARIABLE_REFERENCE");
pub const COMPILATION_UNIT: RuleKey = RuleKey::new("COMPILATION_UNIT");
pub const DEFINITION: RuleKey = RuleKey::new("DEFINITION");
pub const STRUCT_DEFINITION: RuleKey = RuleKey::new("STRUCT_DEFINITION");
pub const STRUCT_MEMBER: RuleKey = RuleKey::new("STRUCT_MEMBER");
pub const FUNCTION_DEFINITION: RuleKey = RuleKey::new("FUNCTION_DEFINITION");
pub const VARIABLE_DEFINITION: RuleKey = RuleKey::new("VARIABLE_DEFINITION");
pub const PARAMETERS_LIST: RuleKey = RuleKey::new("PARAMETERS_LIST");
pub const PARAMETER_DECLARATION: RuleKey = RuleKey::new("PARAMETER_DECLARATION");
pub const COMPOUND_STATEMENT: RuleKey = RuleKey::new("COMPOUND_STATEMENT");
pub const VARIABLE_INITIALIZER: RuleKey = RuleKey::new("VARIABLE_INITIALIZER");
pub const ARGUMENT_EXPRESSION_LIST: RuleKey = RuleKey::new("ARGUMENT_EXPRESSION_LIST");
pub const STATEMENT: RuleKey = RuleKey::new("STATEMENT");
pub const EXPRESSION_STATEMENT: RuleKey = RuleKey::new("EXPRESSION_STATEMENT");
pub const RETURN_STATEMENT: RuleKey = RuleKey::new("RETURN_STATEMENT");
pub const CONTINUE_STATEMENT: RuleKey = RuleKey::new("CONTINUE_STATEMENT");
pub const BREAK_STATEMENT: RuleKey = RuleKey::new("BREAK_STATEMENT");
pub const IF_STATEMENT: RuleKey = RuleKey::new("IF_STATEMENT");
pub const WHILE_STATEMENT: RuleKey = RuleKey::new("WHILE_STATEMENT");
pub const CONDITION_CLAUSE: RuleKey = RuleKey::new("CONDITION_CLAUSE");
pub const ELSE_CLAUSE: RuleKey = RuleKey::new("ELSE_CLAUSE");
pub const NO_COMPLEXITY_STATEMENT: RuleKey = RuleKey::new("NO_COMPLEXITY_STATEMENT");
pub const EXPRESSION: RuleKey = RuleKey::new("EXPRESSION");
pub const ASSIGNMENT_EXPRESSION: RuleKey = RuleKey::new("ASSIGNMENT_EXPRESSION");
pub const RELATIONAL_EXPRESSION: RuleKey = RuleKey::new("RELATIONAL_EXPRESSION");
pub const RELATIONAL_OPERATOR: RuleKey = RuleKey::new("RELATIONAL_OPERATOR");
pub const ADDITIVE_EXPRESSION: RuleKey = RuleKey::new("ADDITIVE_EXPRESSION");
pub const ADDITIVE_OPERATOR: RuleKey = RuleKey::new("ADDITIVE_OPERATOR");
pub const MULTIPLICATIVE_EXPRESSION: RuleKey = RuleKey::new("MULTIPLICATIVE_EXPRESSION");
pub const MULTIPLICATIVE_OPERATOR: RuleKey = RuleKey::new("MULTIPLICATIVE_OPERATOR");
pub const UNARY_EXPRESSION: RuleKey = RuleKey::new("UNARY_EXPRESSION");
pub const UNARY_OPERATOR: RuleKey = RuleKey::new("UNARY_OPERATOR");
pub const POSTFIX_EXPRESSION: RuleKey = RuleKey::new("POSTFIX_EXPRESSION");
pub const POSTFIX_OPERATOR: RuleKey = RuleKey::new("POSTFIX_OPERATOR");
pub const PRIMARY_EXPRESSION: RuleKey = RuleKey::new("PRIMARY_EXPRESSION");

pub fn grammar() -> Result<Grammar> {
    let b = LexerfulGrammarBuilder::create();
    let identifier = GenericTokenType::IDENTIFIER;

    // bins
    b.rule(BIN_TYPE).is(b.first_of((keywords::INT, keywords::VOID)));
    b.rule(BIN_PARAMETER).is(identifier);
    b.rule(BIN_FUNCTION_DEFINITION).is(identifier);
    b.rule(BIN_VARIABLE_DEFINITION).is(identifier);
    b.rule(BIN_FUNCTION_REFERENCE).is(identifier);
    b.rule(BIN_VARIABLE_REFERENCE).is(identifier);

    b.rule(COMPILATION_UNIT).is((b.zero_or_more(DEFINITION), GenericTokenType::EOF));
    b.rule(DEFINITION).is(b.first_of((STRUCT_DEFINITION, FUNCTION_DEFINITION, VARIABLE_DEFINITION)));
    b.rule(STRUCT_DEFINITION).is((
        keywords::STRUCT,
        identifier,
        BRACE_L,
        b.one_or_more((STRUCT_MEMBER, SEMICOLON)),
        BRACE_R,
    ));
    b.rule(STRUCT_MEMBER).is((BIN_TYPE, identifier));
    b.rule(FUNCTION_DEFINITION).is((
        BIN_TYPE,
        BIN_FUNCTION_DEFINITION,
        PAREN_L,
        b.optional(PARAMETERS_LIST),
        PAREN_R,
        COMPOUND_STATEMENT,
    ));
    b.rule(VARIABLE_DEFINITION).is((
        BIN_TYPE,
        BIN_VARIABLE_DEFINITION,
        b.optional(VARIABLE_INITIALIZER),
        SEMICOLON,
    ));
    b.rule(PARAMETERS_LIST).is((PARAMETER_DECLARATION, b.zero_or_more((COMMA, PARAMETER_DECLARATION))));
    b.rule(PARAMETER_DECLARATION).is((BIN_TYPE, BIN_PARAMETER));
    b.rule(COMPOUND_STATEMENT).is((
        BRACE_L,
        b.zero_or_more(VARIABLE_DEFINITION),
        b.zero_or_more(STATEMENT),
        BRACE_R,
    ));
    b.rule(VARIABLE_INITIALIZER).is((EQ, EXPRESSION));
    b.rule(ARGUMENT_EXPRESSION_LIST).is((EXPRESSION, b.zero_or_more((COMMA, EXPRESSION))));

    // statements
    b.rule(STATEMENT).is(b.first_of((
        EXPRESSION_STATEMENT,
        COMPOUND_STATEMENT,
        RETURN_STATEMENT,
        CONTINUE_STATEMENT,
        BREAK_STATEMENT,
        IF_STATEMENT,
        WHILE_STATEMENT,
        NO_COMPLEXITY_STATEMENT,
    )));
    b.rule(EXPRESSION_STATEMENT).is((EXPRESSION, SEMICOLON));
    b.rule(RETURN_STATEMENT).is((keywords::RETURN, EXPRESSION, SEMICOLON));
    b.rule(CONTINUE_STATEMENT).is((keywords::CONTINUE, SEMICOLON));
    b.rule(BREAK_STATEMENT).is((keywords::BREAK, SEMICOLON));
    b.rule(IF_STATEMENT).is((keywords::IF, CONDITION_CLAUSE, STATEMENT, b.optional(ELSE_CLAUSE)));
    b.rule(WHILE_STATEMENT).is((keywords::WHILE, CONDITION_CLAUSE, STATEMENT));
    b.rule(CONDITION_CLAUSE).is((PAREN_L, EXPRESSION, PAREN_R));
    b.rule(ELSE_CLAUSE).is((keywords::ELSE, STATEMENT));
    b.rule(NO_COMPLEXITY_STATEMENT).is(("nocomplexity", STATEMENT));

    // expressions
    b.rule(EXPRESSION).is(ASSIGNMENT_EXPRESSION);
    b.rule(ASSIGNMENT_EXPRESSION)
        .is((RELATIONAL_EXPRESSION, b.optional((EQ, RELATIONAL_EXPRESSION))))
        .skip_if_one_child();
    b.rule(RELATIONAL_EXPRESSION)
        .is((ADDITIVE_EXPRESSION, b.optional((RELATIONAL_OPERATOR, RELATIONAL_EXPRESSION))))
        .skip_if_one_child();
    b.rule(RELATIONAL_OPERATOR).is(b.first_of((EQEQ, NE, LT, LTE, GT, GTE)));
    b.rule(ADDITIVE_EXPRESSION)
        .is((MULTIPLICATIVE_EXPRESSION, b.optional((ADDITIVE_OPERATOR, ADDITIVE_EXPRESSION))))
        .skip_if_one_child();
    b.rule(ADDITIVE_OPERATOR).is(b.first_of((ADD, SUB)));
    b.rule(MULTIPLICATIVE_EXPRESSION)
        .is((UNARY_EXPRESSION, b.optional((MULTIPLICATIVE_OPERATOR, MULTIPLICATIVE_EXPRESSION))))
        .skip_if_one_child();
    b.rule(MULTIPLICATIVE_OPERATOR).is(b.first_of((MUL, DIV)));
    b.rule(UNARY_EXPRESSION)
        .is(b.first_of(((UNARY_OPERATOR, PRIMARY_EXPRESSION), POSTFIX_EXPRESSION)))
        .skip_if_one_child();
    b.rule(UNARY_OPERATOR).is(b.first_of((INC, DEC)));
    b.rule(POSTFIX_EXPRESSION)
        .is(b.first_of((
            (PRIMARY_EXPRESSION, POSTFIX_OPERATOR),
            (BIN_FUNCTION_REFERENCE, PAREN_L, b.optional(ARGUMENT_EXPRESSION_LIST), PAREN_R),
            PRIMARY_EXPRESSION,
        )))
        .skip_if_one_child();
    b.rule(POSTFIX_OPERATOR).is(b.first_of((INC, DEC)));
    b.rule(PRIMARY_EXPRESSION).is(b.first_of((
        literals::INTEGER,
        BIN_VARIABLE_REFERENCE,
        (PAREN_L, EXPRESSION, PAREN_R),
    )));

    b.set_root_rule(COMPILATION_UNIT);
    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::minic::parser;
    use crate::testing::ParserAssert;

    #[test]
    fn test_expression() {
        let mut p = parser().unwrap();
        p.set_root_rule(EXPRESSION).unwrap();
        ParserAssert::new(&p)
            .matches("1")
            .matches("1 + 1")
            .matches("1 + 1 * 1")
            .matches("(1)")
            .matches("myVariable")
            .matches("myVariable = 0")
            .not_matches("myVariable = myVariable2 = 0")
            .matches("myFunction()")
            .matches("myFunction(arg1, arg2, 1*3)")
            .matches("myVariable++")
            .matches("++myVariable")
            .not_matches("++++myVariable")
            .matches("myVariable = i++")
            .matches("myVariable = myFunction(1, 3)*2")
            .matches("++((myVariable))");
    }

    #[test]
    fn test_struct() {
        let mut p = parser().unwrap();
        p.set_root_rule(STRUCT_DEFINITION).unwrap();
        ParserAssert::new(&p)
            .matches("struct my { int a; }")
            .matches("struct my { int a; int b; }")
            .not_matches("struct my { }");
    }

    #[test]
    fn test_statements() {
        let mut p = parser().unwrap();
        p.set_root_rule(STATEMENT).unwrap();
        ParserAssert::new(&p)
            .matches("return 0;")
            .matches("while (i < 10) i++;")
            .matches("if (a == b) { c = 1; } else d = 2;")
            .matches("nocomplexity if (a) b;")
            .matches("{ int a = 1; a++; }")
            .not_matches("{ a++; int a; }");
    }

    #[test]
    fn test_skip_if_one_child() {
        let ast = parser().unwrap().parse("int a = b + 1; int c = d;").unwrap();
        let root = ast.root();
        assert!(root.has_descendant(&[ADDITIVE_EXPRESSION]));
        assert!(!root.has_descendant(&[MULTIPLICATIVE_EXPRESSION]));
        assert!(!root.has_descendant(&[ASSIGNMENT_EXPRESSION]));
        let initializers = root.descendants(&[VARIABLE_INITIALIZER]);
        let second = initializers[1].children().map(|c| c.name()).collect::<Vec<_>>();
        assert_eq!(second, ["EQ", "EXPRESSION"]);
    }
}
