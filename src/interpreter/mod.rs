//! MiniLang interpreter execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Main interpreter, options and statement dispatch
//! - [`errors`]: Runtime error types
//! - [`constants`]: Default limits and fixed output text
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Statements report how they finished
//! through [`engine::ControlFlow`], so a `return` unwinds through blocks and
//! loops as an ordinary value until the function call that started it.
//!
//! # Built-in Functions
//!
//! `print` and `input` are native function values installed in the global
//! scope when an interpreter is created (see `builtins`).

pub mod constants;
pub mod engine;
pub mod errors;

mod builtins;
mod expressions;
mod jumps;
mod loops;
mod ops;
mod statements;
