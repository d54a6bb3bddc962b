//! Error types for flr

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed grammar: undefined or redefined rules, left recursion, empty loops
    #[error("{0}")]
    Grammar(String),

    /// Input could not be recognized by the grammar
    #[error("{message}")]
    Recognition { line: usize, message: String },

    /// Lexer failure (no channel consumed a character, invalid token)
    #[error("{0}")]
    Lexer(String),

    /// Failure of a channel while lexing, with the position reached
    #[error("Unable to lex source code at line : {line} and column : {column}: {source}")]
    Lexing {
        line: usize,
        column: usize,
        source: Box<Error>,
    },

    /// XPath syntax or evaluation error
    #[error("{0}")]
    XPath(String),

    /// Invalid configuration value
    #[error("{0}")]
    Config(String),

    /// Regular expression failed to compile
    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    pub(crate) fn grammar(message: impl Into<String>) -> Self {
        Error::Grammar(message.into())
    }

    pub(crate) fn xpath(message: impl Into<String>) -> Self {
        Error::XPath(message.into())
    }

    pub(crate) fn recognition(line: usize, message: impl Into<String>) -> Self {
        Error::Recognition {
            line,
            message: message.into(),
        }
    }

    /// Line of a recognition or lexing error, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Recognition { line, .. } | Error::Lexing { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
