//! Runtime error types for the Lugha interpreter.
//!
//! Runtime errors are values, not panics: every visitor returns
//! `RuntimeResult` and the first error propagates to the top unchanged.
//! Each error carries the context that was active when it was created so
//! the top-level reporter can render a traceback from the caller chain.

use crate::Context;
use lugha_core::{SourceFile, Span};
use thiserror::Error;

/// The category of a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An operation applied to operands that do not support it
    IllegalOperation,
    /// A name with no binding in the scope chain
    UnboundName,
    /// Wrong number of call arguments
    ArityMismatch,
    /// Arithmetic that cannot produce a value (division by zero)
    Overflow,
    /// Runaway loop or call recursion
    CallStackExceeded,
    /// A value of the wrong variant where a specific one is required
    TypeError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::IllegalOperation => "Illegal operation",
            ErrorKind::UnboundName => "Unbound name",
            ErrorKind::ArityMismatch => "Arity mismatch",
            ErrorKind::Overflow => "Overflow",
            ErrorKind::CallStackExceeded => "Call stack exceeded",
            ErrorKind::TypeError => "Type error",
        };
        write!(f, "{}", name)
    }
}

/// A runtime error with its source span and the activation it occurred in.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub context: Context,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            context: context.clone(),
        }
    }

    pub fn illegal_operation(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::IllegalOperation, message, span, context)
    }

    pub fn unbound_name(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::UnboundName, message, span, context)
    }

    pub fn arity_mismatch(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::ArityMismatch, message, span, context)
    }

    pub fn overflow(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::Overflow, message, span, context)
    }

    pub fn call_stack_exceeded(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::CallStackExceeded, message, span, context)
    }

    pub fn type_error(message: impl Into<String>, span: Span, context: &Context) -> Self {
        Self::new(ErrorKind::TypeError, message, span, context)
    }

    /// Render the caller chain as a traceback, oldest frame first.
    ///
    /// Each frame line shows where execution was in that activation: the
    /// error span for the innermost frame, the callee's entry span for the
    /// frames above it. `sources` resolves span source ids to file names;
    /// unknown ids render as `<?>`.
    pub fn traceback(&self, sources: &[SourceFile]) -> String {
        let mut frames = Vec::new();
        let mut span = self.span;
        let mut context = Some(self.context.clone());

        while let Some(ctx) = context {
            frames.push((span, ctx.display_name().to_string()));
            span = ctx.entry_span().unwrap_or(span);
            context = ctx.parent().cloned();
        }

        let mut out = String::from("Traceback (most recent call last):\n");
        for (span, name) in frames.iter().rev() {
            let file = sources
                .iter()
                .find(|s| s.id == span.source)
                .map(|s| s.name.as_str())
                .unwrap_or("<?>");
            out.push_str(&format!(
                "  File {}, line {}, in {}\n",
                file, span.start.line, name
            ));
        }
        out
    }
}

/// Result type alias for interpreter operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
