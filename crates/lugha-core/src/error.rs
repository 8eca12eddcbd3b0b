//! Front-end error types for the Lugha language.

use thiserror::Error;

use crate::Span;

/// Errors produced while turning source text into an AST, plus host I/O
/// failures surfaced by the CLI. Runtime errors live in the interpreter
/// crate because they carry the execution context chain.
#[derive(Debug, Error)]
pub enum LughaError {
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        message: String,
        line: u32,
        column: u32,
    },

    #[error("Parse error at {span}: {message}")]
    ParseError { message: String, span: Span },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of input")]
    UnexpectedEof { span: Span },

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl LughaError {
    /// Get the span associated with this error, if any.
    pub fn span(&self) -> Option<&Span> {
        match self {
            LughaError::LexerError { .. } => None,
            LughaError::ParseError { span, .. } => Some(span),
            LughaError::UnexpectedToken { span, .. } => Some(span),
            LughaError::UnexpectedEof { span } => Some(span),
            LughaError::IoError { .. } => None,
        }
    }

    /// Check whether this error means the input stopped mid-construct.
    ///
    /// The REPL uses this to keep reading lines instead of reporting.
    pub fn is_incomplete_input(&self) -> bool {
        matches!(self, LughaError::UnexpectedEof { .. })
    }
}

impl From<std::io::Error> for LughaError {
    fn from(err: std::io::Error) -> Self {
        LughaError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for front-end operations.
pub type LughaResult<T> = Result<T, LughaError>;
