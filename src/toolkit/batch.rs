//! Parallel batch processing
//!
//! Uses Rayon to parse many files, and to evaluate many XPath queries
//! against one tree.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::ast::AstNode;
use crate::error::Result;
use crate::parser::SourceParser;
use crate::xpath::{AstNodeXPathQuery, XPathResult, XPathValue};

/// Evaluate multiple XPath expressions in parallel
pub fn evaluate_parallel(node: AstNode<'_>, xpaths: &[&str]) -> Vec<Result<XPathValue>> {
    xpaths
        .par_iter()
        .map(|xpath| AstNodeXPathQuery::create(xpath)?.evaluate(node))
        .collect()
}

/// Evaluate keyed XPath expressions in parallel, failing on the first error
pub fn xmap(node: AstNode<'_>, queries: &[(&str, &str)]) -> Result<Vec<(String, XPathValue)>> {
    queries
        .par_iter()
        .map(|(key, xpath)| {
            let value = AstNodeXPathQuery::create(xpath)?.evaluate(node)?;
            Ok((key.to_string(), value))
        })
        .collect()
}

/// One query result, detached from its tree
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub text: String,
}

impl Match {
    pub fn from_result(result: &XPathResult<'_>) -> Self {
        let token = result.owner().and_then(|node| node.token());
        Match {
            line: token.map(|t| t.line()),
            column: token.map(|t| t.column()),
            text: result.to_string(),
        }
    }
}

/// Outcome of one query on one tree; evaluation errors stay per query
#[derive(Debug)]
pub struct QueryMatches {
    pub expression: String,
    pub matches: Result<Vec<Match>>,
}

/// Outcome of one file: an error only when the file could not be parsed
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<Vec<QueryMatches>>,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn parsed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.parsed()
    }

    fn queries(&self) -> impl Iterator<Item = &QueryMatches> {
        self.files
            .iter()
            .filter_map(|f| f.outcome.as_ref().ok())
            .flatten()
    }

    pub fn total_matches(&self) -> usize {
        self.queries()
            .filter_map(|q| q.matches.as_ref().ok())
            .map(Vec::len)
            .sum()
    }

    /// Query evaluations that failed on a parsed file
    pub fn query_errors(&self) -> usize {
        self.queries().filter(|q| q.matches.is_err()).count()
    }
}

/// Parses `files` in parallel and runs every query against each tree
///
/// Reports come back in the order of `files`.
pub fn run(parser: &dyn SourceParser, files: &[PathBuf], queries: &[AstNodeXPathQuery]) -> BatchReport {
    info!(files = files.len(), queries = queries.len(), "batch started");
    let files: Vec<FileReport> = files
        .par_iter()
        .map(|path| {
            let outcome = process_file(parser, path, queries);
            match &outcome {
                Err(e) => warn!(file = %path.display(), error = %e, "file failed"),
                Ok(results) => {
                    for query in results {
                        if let Err(e) = &query.matches {
                            warn!(file = %path.display(), query = %query.expression, error = %e, "query failed");
                        }
                    }
                }
            }
            FileReport {
                path: path.clone(),
                outcome,
            }
        })
        .collect();
    let report = BatchReport { files };
    info!(
        parsed = report.parsed(),
        failed = report.failed(),
        query_errors = report.query_errors(),
        "batch finished"
    );
    report
}

fn process_file(parser: &dyn SourceParser, path: &Path, queries: &[AstNodeXPathQuery]) -> Result<Vec<QueryMatches>> {
    let ast = parser.parse_file(path)?;
    Ok(queries
        .iter()
        .map(|query| QueryMatches {
            expression: query.expression().to_string(),
            matches: query
                .select_nodes(ast.root())
                .map(|results| results.iter().map(Match::from_result).collect()),
        })
        .collect())
}

/// Files under `root`, recursively, optionally filtered by extension, sorted
pub fn collect_files(root: &Path, extension: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if root.is_file() {
        files.push(root.to_path_buf());
        return Ok(files);
    }
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if extension.is_none_or(|ext| path.extension().is_some_and(|e| e == ext)) {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}
