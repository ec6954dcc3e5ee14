//! Runtime error types for the MiniLang interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to lexical or parse errors).
//!
//! All runtime errors are fatal: the first one ends the run.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Read of a name bound in no scope
    #[error("[Runtime] line {}: Undefined variable '{name}'.", .location.line)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Operator applied to values of the wrong kind
    #[error("[Runtime] line {}: '{operator}' expects integer operands, got {got}.", .location.line)]
    TypeError {
        operator: String,
        got: String,
        location: SourceLocation,
    },

    #[error("[Runtime] line {}: Division by zero.", .location.line)]
    DivisionByZero { location: SourceLocation },

    /// Result does not fit in a 64-bit signed integer
    #[error("[Runtime] line {}: Integer overflow in {operation}.", .location.line)]
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    /// Operator the evaluator has no rule for
    #[error("[Runtime] line {}: Unsupported operator '{operator}'.", .location.line)]
    UnsupportedOperator {
        operator: String,
        location: SourceLocation,
    },

    /// Call of a value that is not a function
    #[error("[Runtime] line {}: Can only call functions, got {type_name}.", .location.line)]
    NotCallable {
        type_name: &'static str,
        location: SourceLocation,
    },

    /// Function argument count mismatch
    #[error("[Runtime] line {}: Function '{function}' expects {expected} arguments but got {got}.", .location.line)]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    /// Nested calls exceeded the configured depth
    #[error("[Runtime] line {}: Stack overflow: call depth exceeds {limit}.", .location.line)]
    StackOverflow {
        limit: usize,
        location: SourceLocation,
    },

    /// `return` executed outside of any function body
    #[error("[Runtime] line {}: Can't return from top-level code.", .location.line)]
    ReturnOutsideFunction { location: SourceLocation },

    /// The terminal failed to write output or read input
    #[error("[Runtime] line {}: I/O error: {message}", .location.line)]
    Io {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::DivisionByZero { location }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::UnsupportedOperator { location, .. }
            | RuntimeError::NotCallable { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::StackOverflow { location, .. }
            | RuntimeError::ReturnOutsideFunction { location }
            | RuntimeError::Io { location, .. } => *location,
        }
    }

    pub(crate) fn io(error: std::io::Error, location: SourceLocation) -> Self {
        RuntimeError::Io {
            message: error.to_string(),
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let error = RuntimeError::UndefinedVariable {
            name: "y".to_string(),
            location: SourceLocation { line: 4, column: 7 },
        };
        assert_eq!(error.to_string(), "[Runtime] line 4: Undefined variable 'y'.");
        assert_eq!(error.location().column, 7);
    }

    #[test]
    fn test_argument_mismatch_message() {
        let error = RuntimeError::ArgumentCountMismatch {
            function: "add".to_string(),
            expected: 2,
            got: 1,
            location: SourceLocation { line: 1, column: 4 },
        };
        assert_eq!(
            error.to_string(),
            "[Runtime] line 1: Function 'add' expects 2 arguments but got 1."
        );
    }
}
