//! Parser for the Lugha programming language.
//!
//! This crate provides the parser that transforms tokens into an Abstract
//! Syntax Tree (AST).

mod ast;
mod parser;

pub use ast::*;
pub use parser::*;

use lugha_core::{LughaError, SourceId};

/// Parse source code into a program (a block of statements).
pub fn parse(source_id: SourceId, source: &str) -> Result<Node, LughaError> {
    let lexer = lugha_lexer::Lexer::new(source_id, source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    parser.parse_program()
}

/// Parse a single expression.
pub fn parse_expression(source_id: SourceId, source: &str) -> Result<Node, LughaError> {
    let lexer = lugha_lexer::Lexer::new(source_id, source);
    let tokens = lexer.tokenize()?;
    let mut parser = Parser::new(tokens);
    parser.parse_single_expression()
}
