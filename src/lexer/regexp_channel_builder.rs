//! Helpers assembling regular expressions for channels
//!
//! Quantifiers are greedy: the `regex` crate never backtracks into a
//! repetition, so they behave like the possessive forms channels need.

use super::channels::{CommentRegexpChannel, RegexpChannel};
use crate::api::TokenType;
use crate::error::Result;

pub const DIGIT: &str = "\\d";
pub const ANY_CHAR: &str = "[\\s\\S]";
pub const OCTAL_DIGIT: &str = "[0-7]";
pub const HEXA_DIGIT: &str = "[a-fA-F0-9]";

pub fn regexp(token_type: TokenType, pieces: &[&str]) -> Result<RegexpChannel> {
    RegexpChannel::new(token_type, &pieces.concat())
}

pub fn comment_regexp(pieces: &[&str]) -> Result<CommentRegexpChannel> {
    CommentRegexpChannel::new(&pieces.concat())
}

pub fn opt(piece: &str) -> String {
    format!("{}?", piece)
}

pub fn and(pieces: &[&str]) -> String {
    pieces.concat()
}

pub fn one2n(piece: &str) -> String {
    format!("{}+", piece)
}

pub fn o2n(piece: &str) -> String {
    format!("{}*", piece)
}

pub fn any_but_not(characters: &[&str]) -> String {
    format!("[^{}]", characters.concat())
}

pub fn g(pieces: &[&str]) -> String {
    format!("({})", pieces.concat())
}

pub fn or(pieces: &[&str]) -> String {
    format!("({})", pieces.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{Channel, CodeReader, LexerOutput};

    const HEX: TokenType = TokenType::new("Literal", "HEX", "HEX");

    #[test]
    fn test_pieces() {
        assert_eq!(opt("L"), "L?");
        assert_eq!(one2n(DIGIT), "\\d+");
        assert_eq!(o2n("a"), "a*");
        assert_eq!(and(&["a", "b"]), "ab");
        assert_eq!(any_but_not(&["\\n", "\\r"]), "[^\\n\\r]");
        assert_eq!(g(&["a", "b"]), "(ab)");
        assert_eq!(or(&["a", "b", "c"]), "(a|b|c)");
    }

    #[test]
    fn test_hexadecimal_channel() {
        let pattern = and(&["0", or(&["x", "X"]).as_str(), one2n(HEXA_DIGIT).as_str(), opt("[lL]").as_str()]);
        let channel = regexp(HEX, &[pattern.as_str()]).unwrap();
        let mut code = CodeReader::new("0xFFL+1");
        let mut output = LexerOutput::new();
        assert!(channel.consume(&mut code, &mut output).unwrap());
        assert_eq!(output.tokens()[0].value(), "0xFFL");
    }

    #[test]
    fn test_comment_regexp() {
        let channel = comment_regexp(&["/\\*", o2n(ANY_CHAR).as_str(), "?\\*/"]).unwrap();
        let mut code = CodeReader::new("/* a */ /* b */");
        let mut output = LexerOutput::new();
        assert!(channel.consume(&mut code, &mut output).unwrap());
        assert_eq!(code.column(), 7);
    }
}
