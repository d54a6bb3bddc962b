//! Source code under inspection: its text, AST and their mapping

use std::ops::Range;
use std::path::Path;

use tracing::debug;

use super::line_offsets::LineOffsets;
use super::model::ConfigurationModel;
use crate::ast::{Ast, AstNode, AstXmlPrinter, NodeId};
use crate::error::Result;
use crate::lexer::DEFAULT_TAB_WIDTH;
use crate::xpath::{AstNodeXPathQuery, XPathResult};

pub struct SourceCodeModel<M> {
    model: M,
    source_code: String,
    line_offsets: LineOffsets,
    ast: Option<Ast>,
}

impl<M: ConfigurationModel> SourceCodeModel<M> {
    pub fn new(model: M) -> Self {
        SourceCodeModel {
            model,
            source_code: String::new(),
            line_offsets: LineOffsets::new(""),
            ast: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Parses `source_code` with the current configuration
    ///
    /// On a parse error the previous source and AST are kept.
    pub fn set_source_code(&mut self, source_code: &str) -> Result<()> {
        let ast = self.model.parser()?.parse(source_code)?;
        self.replace(source_code.to_string(), ast)
    }

    /// Reads and parses a file with the configured charset
    pub fn set_source_file(&mut self, path: &Path) -> Result<()> {
        let source_code = self.model.charset().read_file(path)?;
        let ast = self.model.parser()?.parse(&source_code)?;
        debug!(file = %path.display(), "source file loaded");
        self.replace(source_code, ast)
    }

    fn replace(&mut self, source_code: String, ast: Ast) -> Result<()> {
        let tab_width = self.model.lexer()?.map_or(DEFAULT_TAB_WIDTH, |lexer| lexer.tab_width());
        self.line_offsets = LineOffsets::with_tab_width(&source_code, tab_width);
        self.source_code = source_code;
        self.ast = Some(ast);
        Ok(())
    }

    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    pub fn ast(&self) -> Option<&Ast> {
        self.ast.as_ref()
    }

    pub fn line_offsets(&self) -> &LineOffsets {
        &self.line_offsets
    }

    /// XML rendering of the AST, empty before the first parse
    pub fn xml(&self) -> String {
        self.ast
            .as_ref()
            .map(|ast| AstXmlPrinter::print(ast.root()))
            .unwrap_or_default()
    }

    /// Token leaf at or after `offset`: the first one ending past it
    pub fn node_at_offset(&self, offset: usize) -> Result<Option<AstNode<'_>>> {
        let Some(ast) = &self.ast else {
            return Ok(None);
        };
        for id in 0..ast.len() as NodeId {
            let Some(node) = ast.node(id) else {
                continue;
            };
            if node.has_children() {
                continue;
            }
            if let Some(token) = node.token() {
                if self.line_offsets.end_offset(token)? > offset {
                    return Ok(Some(node));
                }
            }
        }
        Ok(None)
    }

    /// Character range of the source covered by `node`
    pub fn text_range(&self, node: AstNode<'_>) -> Result<Option<Range<usize>>> {
        let tokens = node.tokens();
        let (Some(first), Some(last)) = (tokens.first(), tokens.last()) else {
            return Ok(None);
        };
        let start = self.line_offsets.start_offset(first)?;
        let end = self.line_offsets.end_offset(last)?;
        Ok(Some(start..end.max(start)))
    }

    /// Evaluates `xpath` from the root of the AST
    pub fn select(&self, xpath: &str) -> Result<Vec<XPathResult<'_>>> {
        let query = AstNodeXPathQuery::create(xpath)?;
        match &self.ast {
            Some(ast) => query.select_nodes(ast.root()),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuleKey;
    use crate::grammar::{Grammar, LexerlessGrammarBuilder};
    use crate::toolkit::model::{CachedConfigurationModel, LexerlessConfiguration};

    const NUMBERS: RuleKey = RuleKey::new("NUMBERS");
    const NUMBER: RuleKey = RuleKey::new("NUMBER");

    fn grammar() -> Result<Grammar> {
        let b = LexerlessGrammarBuilder::create();
        b.rule(NUMBERS).is((b.one_or_more((NUMBER, b.regexp("\\s*"))), b.end_of_input()));
        b.rule(NUMBER).is(b.regexp("[0-9]+"));
        b.set_root_rule(NUMBERS);
        b.build()
    }

    fn model() -> SourceCodeModel<CachedConfigurationModel<LexerlessConfiguration>> {
        SourceCodeModel::new(CachedConfigurationModel::new(LexerlessConfiguration::new(grammar).unwrap()))
    }

    #[test]
    fn test_set_source_code() {
        let mut model = model();
        assert_eq!(model.xml(), "");
        model.set_source_code("1 22\n333").unwrap();
        assert_eq!(model.source_code(), "1 22\n333");
        assert_eq!(model.ast().map(|a| a.root().name()), Some("NUMBERS"));
        assert!(model.xml().starts_with("<NUMBERS"));
    }

    #[test]
    fn test_parse_error_keeps_previous_source() {
        let mut model = model();
        model.set_source_code("1").unwrap();
        assert!(model.set_source_code("x").is_err());
        assert_eq!(model.source_code(), "1");
    }

    #[test]
    fn test_node_at_offset() {
        let mut model = model();
        model.set_source_code("1 22\n333").unwrap();
        let node = model.node_at_offset(3).unwrap().unwrap();
        assert_eq!(node.token_value(), "22");
        assert!(node.has_parent(&[NUMBER]));
        assert!(model.node_at_offset(100).unwrap().is_none());
    }

    #[test]
    fn test_text_range() {
        let mut model = model();
        model.set_source_code("1 22\n333").unwrap();
        let ast = model.ast().unwrap();
        let numbers = ast.root().children_of(&[NUMBER]);
        assert_eq!(model.text_range(numbers[1]).unwrap(), Some(2..4));
        assert_eq!(model.text_range(numbers[2]).unwrap(), Some(5..8));
    }

    #[test]
    fn test_select() {
        let mut model = model();
        assert!(model.select("//NUMBER").unwrap().is_empty());
        model.set_source_code("1 22\n333").unwrap();
        let results = model.select("//NUMBER[@tokenValue = '22']").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_node().map(|n| n.token_value()), Some("22"));
    }

    #[test]
    fn test_set_source_file() {
        let path = std::env::temp_dir().join(format!("flr-source-model-{}.txt", std::process::id()));
        std::fs::write(&path, "7 8").unwrap();
        let mut model = model();
        let loaded = model.set_source_file(&path);
        std::fs::remove_file(&path).unwrap();
        loaded.unwrap();
        assert_eq!(model.source_code(), "7 8");
    }
}
