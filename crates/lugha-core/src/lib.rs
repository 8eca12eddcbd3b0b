//! Core types shared across all Lugha crates.
//!
//! This crate provides fundamental types like source positions, spans,
//! front-end error types, and source registration used throughout the
//! Lugha language implementation.

mod error;
mod span;

pub use error::*;
pub use span::*;

/// Source file identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(pub u32);

impl SourceId {
    pub const REPL: SourceId = SourceId(0);
}

/// A source file with its content
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: SourceId,
    pub name: String,
    pub content: String,
    /// Byte offsets of line starts for fast line lookup
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub fn new(id: SourceId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            id,
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Get the content of a specific line (0-based)
    pub fn line_content(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|&e| e.saturating_sub(1))
            .unwrap_or(self.content.len());
        Some(&self.content[start..end])
    }

    /// Get total number of lines
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
