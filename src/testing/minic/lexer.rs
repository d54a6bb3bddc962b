//! MiniC lexer and token types

use crate::charset::Charset;
use crate::error::Result;
use crate::lexer::{
    BlackHoleChannel, CommentRegexpChannel, IdentifierAndKeywordChannel, Lexer, LexerBuilder, PunctuatorChannel,
    RegexpChannel,
};

pub mod literals {
    use crate::api::TokenType;

    pub const INTEGER: TokenType = TokenType::new("Literal", "INTEGER", "INTEGER");
}

pub mod punctuators {
    use crate::api::TokenType;

    const CLASS: &str = "Punctuator";

    pub const PAREN_L: TokenType = TokenType::new(CLASS, "PAREN_L", "(");
    pub const PAREN_R: TokenType = TokenType::new(CLASS, "PAREN_R", ")");
    pub const BRACE_L: TokenType = TokenType::new(CLASS, "BRACE_L", "{");
    pub const BRACE_R: TokenType = TokenType::new(CLASS, "BRACE_R", "}");
    pub const EQ: TokenType = TokenType::new(CLASS, "EQ", "=");
    pub const COMMA: TokenType = TokenType::new(CLASS, "COMMA", ",");
    pub const SEMICOLON: TokenType = TokenType::new(CLASS, "SEMICOLON", ";");
    pub const ADD: TokenType = TokenType::new(CLASS, "ADD", "+");
    pub const SUB: TokenType = TokenType::new(CLASS, "SUB", "-");
    pub const MUL: TokenType = TokenType::new(CLASS, "MUL", "*");
    pub const DIV: TokenType = TokenType::new(CLASS, "DIV", "/");
    pub const EQEQ: TokenType = TokenType::new(CLASS, "EQEQ", "==");
    pub const NE: TokenType = TokenType::new(CLASS, "NE", "!=");
    pub const LT: TokenType = TokenType::new(CLASS, "LT", "<");
    pub const LTE: TokenType = TokenType::new(CLASS, "LTE", "<=");
    pub const GT: TokenType = TokenType::new(CLASS, "GT", ">");
    pub const GTE: TokenType = TokenType::new(CLASS, "GTE", ">=");
    pub const INC: TokenType = TokenType::new(CLASS, "INC", "++");
    pub const DEC: TokenType = TokenType::new(CLASS, "DEC", "--");
    pub const HASH: TokenType = TokenType::new(CLASS, "HASH", "#");

    pub const ALL: &[TokenType] = &[
        PAREN_L, PAREN_R, BRACE_L, BRACE_R, EQ, COMMA, SEMICOLON, ADD, SUB, MUL, DIV, EQEQ, NE, LT, LTE, GT, GTE,
        INC, DEC, HASH,
    ];
}

pub mod keywords {
    use crate::api::TokenType;

    const CLASS: &str = "Keyword";

    pub const STRUCT: TokenType = TokenType::new(CLASS, "STRUCT", "struct");
    pub const INT: TokenType = TokenType::new(CLASS, "INT", "int");
    pub const VOID: TokenType = TokenType::new(CLASS, "VOID", "void");
    pub const RETURN: TokenType = TokenType::new(CLASS, "RETURN", "return");
    pub const IF: TokenType = TokenType::new(CLASS, "IF", "if");
    pub const ELSE: TokenType = TokenType::new(CLASS, "ELSE", "else");
    pub const WHILE: TokenType = TokenType::new(CLASS, "WHILE", "while");
    pub const CONTINUE: TokenType = TokenType::new(CLASS, "CONTINUE", "continue");
    pub const BREAK: TokenType = TokenType::new(CLASS, "BREAK", "break");

    pub const ALL: &[TokenType] = &[STRUCT, INT, VOID, RETURN, IF, ELSE, WHILE, CONTINUE, BREAK];
}

pub fn lexer(charset: Charset) -> Result<Lexer> {
    Ok(lexer_builder(charset)?.build())
}

/// Builder with every MiniC channel registered, for further configuration
pub fn lexer_builder(charset: Charset) -> Result<LexerBuilder> {
    Ok(Lexer::builder()
        .with_charset(charset)
        .with_fail_if_no_channel_to_consume_one_character(true)
        .with_channel(IdentifierAndKeywordChannel::new(
            "[a-zA-Z]([a-zA-Z0-9_]*[a-zA-Z0-9])?",
            true,
            &[keywords::ALL],
        )?)
        .with_channel(RegexpChannel::new(literals::INTEGER, "[0-9]+")?)
        .with_channel(CommentRegexpChannel::new("(?s)/\\*.*?\\*/")?)
        .with_channel(PunctuatorChannel::new(punctuators::ALL))
        .with_channel(BlackHoleChannel::new("[ \t\r\n]+")?))
}
