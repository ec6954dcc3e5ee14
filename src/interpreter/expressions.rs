//! Expression evaluation implementation
//!
//! This module handles evaluation of all MiniLang expression types, including:
//!
//! - Literals and variables
//! - Assignment (updating the nearest binding or defining a new one)
//! - Short-circuit `and` / `or`
//! - Function calls, both user-defined and native
//!
//! Arithmetic, comparison and unary operators are implemented in `ops`.
//!
//! # Calls
//!
//! A user-function call runs its body in a fresh scope chained to the scope
//! the function was declared in. The call depth is bounded by
//! [`InterpreterOptions::max_call_depth`](crate::interpreter::engine::InterpreterOptions),
//! so runaway recursion becomes a runtime error instead of exhausting the host stack.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{Callable, Function, Value};
use crate::parser::ast::{Expr, Literal, SourceLocation};
use crate::parser::lexer::{Token, TokenKind};
use std::rc::Rc;
use tracing::trace;

impl Interpreter {
    /// Evaluate an expression and return its value
    pub(crate) fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(Self::literal_value(literal)),

            Expr::Variable { name } => {
                self.environment
                    .get(&name.lexeme)
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.lexeme.clone(),
                        location: name.location,
                    })
            }

            Expr::Assign { name, value } => {
                let value = self.evaluate_expr(value)?;
                self.environment.assign(&name.lexeme, value.clone());
                self.last_value = value.clone();
                Ok(value)
            }

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),
        }
    }

    fn literal_value(literal: &Literal) -> Value {
        match literal {
            Literal::Integer(n) => Value::Integer(*n),
            Literal::Str(s) => Value::from(s.as_str()),
            Literal::Boolean(b) => Value::Boolean(*b),
            Literal::Absent => Value::Absent,
        }
    }

    /// `or` yields `true` as soon as the left side is truthy and `and` yields
    /// `false` as soon as it is falsy; otherwise the right side's value is the result
    fn evaluate_logical(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate_expr(left)?;

        match operator.kind {
            TokenKind::Or if left.is_truthy() => Ok(Value::Boolean(true)),
            TokenKind::And if !left.is_truthy() => Ok(Value::Boolean(false)),
            TokenKind::Or | TokenKind::And => self.evaluate_expr(right),
            _ => Err(RuntimeError::UnsupportedOperator {
                operator: operator.lexeme.clone(),
                location: operator.location,
            }),
        }
    }

    fn evaluate_call(
        &mut self,
        callee: &Expr,
        paren: &Token,
        arguments: &[Expr],
    ) -> Result<Value, RuntimeError> {
        let callee = self.evaluate_expr(callee)?;

        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.evaluate_expr(argument)?);
        }

        match callee {
            Value::Callable(callable) => self.call_value(&callable, args, paren.location),
            other => Err(RuntimeError::NotCallable {
                type_name: other.type_name(),
                location: paren.location,
            }),
        }
    }

    /// Invoke `callable` with already-evaluated arguments
    pub(crate) fn call_value(
        &mut self,
        callable: &Callable,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if args.len() != callable.arity() {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: callable.name().to_string(),
                expected: callable.arity(),
                got: args.len(),
                location,
            });
        }

        match callable {
            Callable::Native(native) => (native.func)(self, &args, location),
            Callable::Function(function) => self.call_function(function, args, location),
        }
    }

    fn call_function(
        &mut self,
        function: &Rc<Function>,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.call_depth >= self.options.max_call_depth {
            return Err(RuntimeError::StackOverflow {
                limit: self.options.max_call_depth,
                location,
            });
        }

        let scope = function.closure.enclosed();
        for (param, arg) in function.declaration.params.iter().zip(args) {
            scope.define(&param.lexeme, arg);
        }

        trace!(function = function.name(), depth = self.call_depth + 1, "call");
        self.call_depth += 1;
        let result = self.execute_block(&function.declaration.body, scope);
        self.call_depth -= 1;

        // Falling off the end of the body yields the most recent statement value
        let value = match result? {
            ControlFlow::Return(value) => value,
            ControlFlow::Normal => self.last_value.clone(),
        };
        trace!(function = function.name(), %value, "return");
        Ok(value)
    }

    /// Best available source position for an expression
    pub(crate) fn expr_location(expr: &Expr) -> SourceLocation {
        match expr {
            Expr::Binary { operator, .. }
            | Expr::Unary { operator, .. }
            | Expr::Logical { operator, .. } => operator.location,
            Expr::Variable { name } | Expr::Assign { name, .. } => name.location,
            Expr::Call { paren, .. } => paren.location,
            Expr::Literal(_) => SourceLocation::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::{Interpreter, InterpreterOptions};
    use crate::interpreter::errors::RuntimeError;
    use crate::memory::value::Value;
    use crate::parser::parse::Parser;
    use crate::terminal::Terminal;

    fn interpret(source: &str) -> Result<Interpreter, RuntimeError> {
        interpret_with(source, InterpreterOptions::default())
    }

    fn interpret_with(
        source: &str,
        options: InterpreterOptions,
    ) -> Result<Interpreter, RuntimeError> {
        let program = Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap();
        let mut interpreter = Interpreter::with_options(Terminal::captured(), options);
        interpreter.interpret(&program.statements)?;
        Ok(interpreter)
    }

    fn last(source: &str) -> Value {
        interpret(source).unwrap().last_value().clone()
    }

    #[test]
    fn test_precedence_evaluates_to_seven() {
        assert_eq!(last("1 + 2 * 3"), Value::Integer(7));
    }

    #[test]
    fn test_assignment_is_an_expression() {
        let interpreter = interpret("a = b = 3").unwrap();
        assert_eq!(interpreter.globals().get("a"), Some(Value::Integer(3)));
        assert_eq!(interpreter.globals().get("b"), Some(Value::Integer(3)));
    }

    #[test]
    fn test_logical_results() {
        assert_eq!(last("1 or 2"), Value::Boolean(true));
        assert_eq!(last("0 or \"x\""), Value::from("x"));
        assert_eq!(last("0 and 2"), Value::Boolean(false));
        assert_eq!(last("1 and 2"), Value::Integer(2));
    }

    #[test]
    fn test_short_circuit_skips_right_side() {
        // `missing` is undefined, so evaluating it would fail
        assert_eq!(last("true or missing"), Value::Boolean(true));
        assert_eq!(last("false and missing"), Value::Boolean(false));
    }

    #[test]
    fn test_return_without_value_is_absent() {
        assert_eq!(last("function f() { return }\nf()"), Value::Absent);
    }

    #[test]
    fn test_fallthrough_yields_last_statement_value() {
        assert_eq!(last("function f(n) { n * 3 }\nf(5)"), Value::Integer(15));
    }

    #[test]
    fn test_arguments_evaluated_left_to_right() {
        let interpreter =
            interpret("function pair(a, b) { return a }\npair(print(1), print(2))").unwrap();
        assert_eq!(interpreter.terminal().output(), vec!["1", "2"]);
        assert_eq!(interpreter.last_value(), &Value::Absent);
    }

    #[test]
    fn test_undefined_variable() {
        let err = interpret("print nope").err().unwrap();
        assert!(matches!(
            err,
            RuntimeError::UndefinedVariable { ref name, .. } if name == "nope"
        ));
        assert_eq!(err.location().line, 1);
    }

    #[test]
    fn test_calling_non_function() {
        let err = interpret("x = 3\nx(1)").err().unwrap();
        assert!(matches!(
            err,
            RuntimeError::NotCallable {
                type_name: "integer",
                ..
            }
        ));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = interpret("function add(a, b) { return a + b }\nadd(1)")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RuntimeError::ArgumentCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));

        let err = interpret("show = print\nshow(1, 2)").err().unwrap();
        assert!(matches!(err, RuntimeError::ArgumentCountMismatch { .. }));
    }

    #[test]
    fn test_call_depth_limit() {
        let options = InterpreterOptions {
            max_call_depth: 50,
            ..InterpreterOptions::default()
        };
        let err = interpret_with("function down(n) { return down(n + 1) }\ndown(0)", options)
            .err()
            .unwrap();
        assert!(matches!(err, RuntimeError::StackOverflow { limit: 50, .. }));
    }

    #[test]
    fn test_depth_is_restored_after_error() {
        let options = InterpreterOptions {
            max_call_depth: 10,
            ..InterpreterOptions::default()
        };
        let program = Parser::from_source("function f() { return missing }\nf()")
            .unwrap()
            .parse_program()
            .unwrap();
        let mut interpreter = Interpreter::with_options(Terminal::captured(), options);
        assert!(interpreter.interpret(&program.statements).is_err());
        assert_eq!(interpreter.call_depth, 0);
        assert!(interpreter.environment.ptr_eq(interpreter.globals()));
    }

    #[test]
    fn test_top_level_return_is_an_error() {
        let err = interpret("print 1\nreturn 2").err().unwrap();
        assert!(matches!(err, RuntimeError::ReturnOutsideFunction { .. }));
    }

    #[test]
    fn test_function_values_compare_by_identity() {
        assert_eq!(last("function f() { }\ng = f\nf == g"), Value::Boolean(true));
        assert_eq!(
            last("function f() { }\nfunction h() { }\nf == h"),
            Value::Boolean(false)
        );
        assert_eq!(last("p = print\np == print"), Value::Boolean(true));
        assert_eq!(last("p = print\np == input"), Value::Boolean(false));
    }
}
