//! Statement execution implementation
//!
//! This module handles the execution of the simple MiniLang statements:
//!
//! - Expression statements
//! - `print` statements
//! - Variable declarations
//! - `if` / `else`
//!
//! Loops live in `loops`, `return` in `jumps`, and blocks and function
//! declarations are dispatched directly by the engine.
//!
//! # Implementation
//!
//! All statement execution methods are implemented as `pub(crate)` methods
//! on the [`Interpreter`] struct, allowing them to access and modify the
//! interpreter's state (environment, terminal, last value).

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{Expr, Stmt};
use crate::parser::lexer::Token;

impl Interpreter {
    pub(crate) fn execute_expression_statement(
        &mut self,
        expr: &Expr,
    ) -> Result<ControlFlow, RuntimeError> {
        self.last_value = self.evaluate_expr(expr)?;
        Ok(ControlFlow::Normal)
    }

    /// `print EXPR`: one line holding the value's textual form
    pub(crate) fn execute_print(&mut self, expr: &Expr) -> Result<ControlFlow, RuntimeError> {
        let value = self.evaluate_expr(expr)?;
        let location = Self::expr_location(expr);

        self.terminal
            .write_line(&value.to_string())
            .map_err(|e| RuntimeError::io(e, location))?;

        self.last_value = value;
        Ok(ControlFlow::Normal)
    }

    /// Bind a name in the current scope; a missing initializer binds absent
    pub(crate) fn execute_var(
        &mut self,
        name: &Token,
        initializer: Option<&Expr>,
    ) -> Result<ControlFlow, RuntimeError> {
        let value = match initializer {
            Some(expr) => self.evaluate_expr(expr)?,
            None => Value::Absent,
        };

        self.environment.define(&name.lexeme, value.clone());
        self.last_value = value;
        Ok(ControlFlow::Normal)
    }

    pub(crate) fn execute_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: Option<&Stmt>,
    ) -> Result<ControlFlow, RuntimeError> {
        if self.evaluate_expr(condition)?.is_truthy() {
            self.execute_statement(then_branch)
        } else if let Some(else_stmt) = else_branch {
            self.execute_statement(else_stmt)
        } else {
            Ok(ControlFlow::Normal)
        }
    }
}
