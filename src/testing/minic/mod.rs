//! MiniC: a small C-like language
//!
//! Exercises the lexerful pipeline end to end and serves as the sample
//! language of the toolkit.

pub mod grammar;
pub mod lexer;

pub use grammar::*;
pub use lexer::{keywords, lexer, lexer_builder, literals, punctuators};

use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::parser::{Parser, SourceParser};
use crate::toolkit::{charset_of, charset_property, validators, ConfigurationProperty, ParserFactory};

pub const TAB_WIDTH_PROPERTY: &str = "Tab width";

/// MiniC parser reading UTF-8 sources
pub fn parser() -> Result<Parser> {
    parser_with_lexer(lexer::lexer(Charset::Utf8)?)
}

pub fn parser_with_lexer(lexer: Lexer) -> Result<Parser> {
    Parser::builder(grammar::grammar()?).with_lexer(lexer).build()
}

/// Toolkit configuration of MiniC: source charset and tab width
pub struct MiniCConfiguration {
    properties: Vec<ConfigurationProperty>,
}

impl MiniCConfiguration {
    pub fn new() -> Result<Self> {
        let tab_width = ConfigurationProperty::with_validator(
            TAB_WIDTH_PROPERTY,
            "Number of columns a tab character counts for in token positions.",
            "1",
            validators::integer_range(1, i32::MAX)?,
        )?;
        Ok(MiniCConfiguration {
            properties: vec![charset_property(Charset::Utf8)?, tab_width],
        })
    }

    pub fn tab_width(&self) -> Result<usize> {
        let property = self
            .properties
            .iter()
            .find(|p| p.name() == TAB_WIDTH_PROPERTY)
            .ok_or_else(|| Error::Config(format!("No such configuration property: {}", TAB_WIDTH_PROPERTY)))?;
        property
            .value()
            .parse()
            .map_err(|_| Error::Config(format!("Not an integer: {}", property.value())))
    }

    fn configured_lexer(&self) -> Result<Lexer> {
        Ok(lexer::lexer_builder(self.charset())?
            .with_tab_width(self.tab_width()?)
            .build())
    }
}

impl ParserFactory for MiniCConfiguration {
    fn properties(&self) -> &[ConfigurationProperty] {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut [ConfigurationProperty] {
        &mut self.properties
    }

    fn charset(&self) -> Charset {
        charset_of(&self.properties)
    }

    fn create_parser(&self) -> Result<Box<dyn SourceParser>> {
        Ok(Box::new(parser_with_lexer(self.configured_lexer()?)?))
    }

    fn create_lexer(&self) -> Result<Option<Lexer>> {
        Ok(Some(self.configured_lexer()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstNode;
    use crate::toolkit::{CachedConfigurationModel, ConfigurationModel, SourceCodeModel, CHARSET_PROPERTY};
    use crate::xpath::{AstNodeXPathQuery, XPathResult, XPathValue};

    fn lines(results: &[XPathResult<'_>]) -> Vec<usize> {
        results
            .iter()
            .filter_map(|r| r.as_node())
            .filter_map(|n: AstNode<'_>| n.token_line())
            .collect()
    }

    #[test]
    fn test_basic_queries() {
        let ast = parser().unwrap().parse("/* Basic queries */\nint a;\n\nint b;\n").unwrap();
        let root = ast.root();

        let unit = AstNodeXPathQuery::create("/COMPILATION_UNIT")
            .unwrap()
            .select_single_node(root)
            .unwrap()
            .and_then(|r| r.as_node())
            .unwrap();
        assert_eq!(unit.name(), "COMPILATION_UNIT");
        assert_eq!(unit.token_line(), Some(2));
        assert_eq!(unit.token_value(), "int");

        let definitions = AstNodeXPathQuery::create("//DEFINITION").unwrap().select_nodes(root).unwrap();
        assert_eq!(lines(&definitions), [2, 4]);

        let count = AstNodeXPathQuery::create("count(//IDENTIFIER)").unwrap().evaluate(root).unwrap();
        assert_eq!(count, XPathValue::Number(2.0));

        let names = AstNodeXPathQuery::create("//BIN_VARIABLE_DEFINITION/IDENTIFIER/@tokenValue")
            .unwrap()
            .select_nodes(root)
            .unwrap()
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, ["@tokenValue=a", "@tokenValue=b"]);
    }

    #[test]
    fn test_if_statements_without_braces() {
        let source = "void main() {\n  if (1) { a = 1; }\n  if (2) b = 2;\n  if (3) { } else c = 3;\n}\n";
        let ast = parser().unwrap().parse(source).unwrap();
        let query = AstNodeXPathQuery::create(
            "//IF_STATEMENT/STATEMENT[not(COMPOUND_STATEMENT)] | //ELSE_CLAUSE/STATEMENT[not(COMPOUND_STATEMENT)]",
        )
        .unwrap();
        assert_eq!(lines(&query.select_nodes(ast.root()).unwrap()), [3, 4]);
    }

    #[test]
    fn test_identifiers_too_long() {
        let source = "int aVeryLongIdentifierName;\nint short;\nint anotherLongName = 1;\n";
        let ast = parser().unwrap().parse(source).unwrap();
        let query = AstNodeXPathQuery::create("//IDENTIFIER[string-length(@tokenValue) > 10]").unwrap();
        assert_eq!(lines(&query.select_nodes(ast.root()).unwrap()), [1, 3]);
    }

    #[test]
    fn test_collapsible_if() {
        let source = "void f() {\n  if (a) {\n    if (b) c = 1;\n  }\n  if (d) {\n    if (e) f = 1;\n    g = 1;\n  }\n}\n";
        let ast = parser().unwrap().parse(source).unwrap();
        let query = AstNodeXPathQuery::create(
            "//IF_STATEMENT[not(ELSE_CLAUSE)]/STATEMENT/COMPOUND_STATEMENT[count(*) = 3]/STATEMENT/IF_STATEMENT[not(ELSE_CLAUSE)]",
        )
        .unwrap();
        assert_eq!(lines(&query.select_nodes(ast.root()).unwrap()), [3]);
    }

    #[test]
    fn test_source_code_model() {
        let model = CachedConfigurationModel::new(MiniCConfiguration::new().unwrap());
        let mut source = SourceCodeModel::new(model);
        assert!(source.model_mut().lexer().unwrap().is_some());

        source.set_source_code("int a;\nint b;").unwrap();
        assert_eq!(source.select("//DEFINITION").unwrap().len(), 2);
        assert!(source.xml().starts_with("<COMPILATION_UNIT"));

        let node = source.node_at_offset(11).unwrap().unwrap();
        assert_eq!(node.token_value(), "b");
        assert_eq!(source.text_range(node).unwrap(), Some(11..12));

        assert!(source.set_source_code("int").is_err());
        assert_eq!(source.source_code(), "int a;\nint b;");

        source.model_mut().set_property(CHARSET_PROPERTY, "US-ASCII").unwrap();
        assert_eq!(source.model().charset(), Charset::UsAscii);
        source.set_source_code("void f() { return 1; }").unwrap();
        assert_eq!(source.select("//RETURN_STATEMENT").unwrap().len(), 1);
    }

    #[test]
    fn test_tab_width() {
        let mut model = CachedConfigurationModel::new(MiniCConfiguration::new().unwrap());
        assert!(model.set_property(TAB_WIDTH_PROPERTY, "0").is_err());
        model.set_property(TAB_WIDTH_PROPERTY, "4").unwrap();
        assert_eq!(model.factory().tab_width().unwrap(), 4);

        let tokens = model.lexer().unwrap().unwrap().lex("\tint a;").unwrap();
        assert_eq!(tokens[0].value(), "int");
        assert_eq!(tokens[0].column(), 4);
    }

    #[test]
    fn test_text_range_after_tabs() {
        let mut model = CachedConfigurationModel::new(MiniCConfiguration::new().unwrap());
        model.set_property(TAB_WIDTH_PROPERTY, "4").unwrap();
        let mut source = SourceCodeModel::new(model);
        source.set_source_code("\tint a;\n\t\tint b;\n").unwrap();

        let identifiers = source.select("//IDENTIFIER").unwrap();
        let a = identifiers[0].as_node().unwrap();
        assert_eq!(a.token().map(|t| t.column()), Some(8));
        assert_eq!(source.text_range(a).unwrap(), Some(5..6));
        let b = identifiers[1].as_node().unwrap();
        assert_eq!(source.text_range(b).unwrap(), Some(14..15));

        assert_eq!(source.node_at_offset(5).unwrap().map(|n| n.token_value()), Some("a"));
        assert_eq!(source.node_at_offset(13).unwrap().map(|n| n.token_value()), Some("b"));
    }
}
