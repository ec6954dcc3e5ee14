//! # Introduction
//!
//! MiniLang is a small dynamically typed scripting language with integers,
//! strings, booleans, first-class functions and lexical closures. This crate
//! lexes, parses and interprets MiniLang source text by walking its syntax
//! tree directly.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Interpreter → Terminal
//! ```
//!
//! 1. [`parser`]: [`parser::lexer::Lexer`] turns text into tokens and
//!    [`parser::parse::Parser`] builds the AST, recovering from syntax errors
//!    at statement boundaries.
//! 2. [`interpreter`]: evaluates statements against a chain of scopes and
//!    tracks the value of the most recent statement.
//! 3. [`memory`]: runtime [`memory::value::Value`]s and the shared
//!    [`memory::environment::Environment`] scopes closures capture.
//! 4. [`terminal`]: where `print` writes and `input` reads; either real
//!    handles or an in-memory capture.
//!
//! ## Language summary
//!
//! Statements: expression statements, `print EXPR`, `{ ... }` blocks,
//! `if COND then STMT [else STMT]`, `while COND do STMT`,
//! `function NAME(params) { body }`, `return [EXPR]`. Semicolons are optional.
//! Built-ins: `print(value)`, `input(prompt)`.

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod terminal;

use interpreter::engine::Interpreter;
use interpreter::errors::RuntimeError;
use parser::lexer::{LexError, Lexer};
use parser::parse::{ParseError, Parser};
use thiserror::Error;

/// Any error that ends a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A fatal syntax error, with the errors recovered from before it
    #[error("{fatal}")]
    Parse {
        fatal: ParseError,
        recovered: Vec<ParseError>,
    },
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Lex, parse and execute `source` on `interpreter`.
///
/// Returns the syntax errors that were recovered from; the statements around
/// them still ran.
pub fn run(source: &str, interpreter: &mut Interpreter) -> Result<Vec<ParseError>, Error> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program().map_err(|fatal| Error::Parse {
        fatal,
        recovered: parser.take_diagnostics(),
    })?;
    interpreter.interpret(&program.statements)?;
    Ok(parser.take_diagnostics())
}
