//! GraphQL parser for page queries and type definitions.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder.
//!
//! - Zero-copy lexing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia buffering: whitespace, commas and comments are attached as leading trivia
//! - Checkpoint-based wrapping: `Type!`, descriptions and `extend` are wrapped retroactively
//!
//! # Recovery Strategy
//!
//! The parser is resilient and always produces a tree:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Unclosed delimiters are reported against the opening token
//!
//! Fuel exhaustion (exec_fuel, recursion_fuel) returns an actual error immediately.

pub mod ast;
pub mod cst;
pub mod lexer;
pub mod printer;
pub mod visit;

mod core;
mod grammar;

#[cfg(test)]
mod lexer_tests;

pub use ast::{Definition, Document, OperationType, Selection, Type, Value};
pub use core::{ParseResult, Parser};
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::PassResult;
use lexer::lex;

pub const DEFAULT_EXEC_FUEL: u32 = 1_000_000;
pub const DEFAULT_RECURSION_FUEL: u32 = 1024;

/// Main entry point with default fuel. Returns Err on fuel exhaustion.
pub fn parse(source: &str) -> PassResult<Document> {
    parse_with_fuel(source, Some(DEFAULT_EXEC_FUEL), Some(DEFAULT_RECURSION_FUEL))
}

pub fn parse_with_fuel(
    source: &str,
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
) -> PassResult<Document> {
    let result = Parser::new(source, lex(source))
        .with_exec_fuel(exec_fuel)
        .with_recursion_fuel(recursion_fuel)
        .parse()?;
    Ok((result.document, result.diagnostics))
}
