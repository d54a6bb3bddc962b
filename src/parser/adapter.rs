//! Lexerless parser over strings and files

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::ast_creator::AstCreator;
use super::located_text::LocatedText;
use super::parse_error::ParseErrorFormatter;
use super::runner::ParseRunner;
use super::SourceParser;
use crate::ast::Ast;
use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::grammar::Grammar;

/// Parses text with a lexerless grammar, starting at its root rule
#[derive(Debug)]
pub struct ParserAdapter {
    charset: Charset,
    grammar: Grammar,
    runner: ParseRunner,
}

impl ParserAdapter {
    pub fn new(charset: Charset, grammar: Grammar) -> Result<Self> {
        let runner = ParseRunner::new(&grammar)?;
        Ok(ParserAdapter {
            charset,
            grammar,
            runner,
        })
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn parse(&self, source: &str) -> Result<Ast> {
        self.parse_located(&LocatedText::new(None, source))
    }

    pub fn parse_file(&self, path: &Path) -> Result<Ast> {
        let source = self
            .charset
            .read_file(path)
            .map_err(|e| Error::recognition(0, e.to_string()))?;
        let ast = self.parse_located(&LocatedText::new(Some(PathBuf::from(path)), &source))?;
        debug!(file = %path.display(), nodes = ast.len(), "file parsed");
        Ok(ast)
    }

    fn parse_located(&self, input: &LocatedText<'_>) -> Result<Ast> {
        let result = self.runner.parse(input.text())?;
        match result.parse_error() {
            None => AstCreator::create(self.runner.compiled_grammar(), &result, input),
            Some(error) => {
                let (line, _) = error.position(error.error_index());
                let message = ParseErrorFormatter.format(error);
                warn!(line, "parse error");
                Err(Error::recognition(line, message))
            }
        }
    }
}

impl SourceParser for ParserAdapter {
    fn parse(&self, source: &str) -> Result<Ast> {
        ParserAdapter::parse(self, source)
    }

    fn parse_file(&self, path: &Path) -> Result<Ast> {
        ParserAdapter::parse_file(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuleKey;
    use crate::grammar::LexerlessGrammarBuilder;

    const NUMBERS: RuleKey = RuleKey::new("NUMBERS");
    const NUMBER: RuleKey = RuleKey::new("NUMBER");

    fn adapter() -> ParserAdapter {
        let b = LexerlessGrammarBuilder::create();
        b.rule(NUMBERS).is((b.one_or_more((NUMBER, b.regexp("\\s*"))), b.end_of_input()));
        b.rule(NUMBER).is(b.regexp("[0-9]+"));
        b.set_root_rule(NUMBERS);
        ParserAdapter::new(Charset::Utf8, b.build().unwrap()).unwrap()
    }

    #[test]
    fn test_parse() {
        let ast = adapter().parse("1 22\n333").unwrap();
        let root = ast.root();
        assert_eq!(root.name(), "NUMBERS");
        let numbers = root.children_of(&[NUMBER]);
        assert_eq!(numbers.len(), 3);
        assert_eq!(numbers[2].token_value(), "333");
        assert_eq!(numbers[2].token_line(), Some(2));
    }

    #[test]
    fn test_recognition_error() {
        let err = adapter().parse("1 2\n3 x").unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert_eq!(
            err.to_string(),
            "Parse error at line 2 column 3:\n\n1: 1 2\n2: 3 x\n     ^\n"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = adapter().parse_file(Path::new("does/not/exist.txt")).unwrap_err();
        assert_eq!(err.line(), Some(0));
    }

    #[test]
    fn test_parse_file() {
        let path = std::env::temp_dir().join(format!("flr-adapter-{}.txt", std::process::id()));
        std::fs::write(&path, "4 5").unwrap();
        let ast = adapter().parse_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(ast.root().children_of(&[NUMBER]).len(), 2);
    }
}
