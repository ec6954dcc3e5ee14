//! Loop statement execution (`while`).
//!
//! The body runs in the current environment; a block body opens its own scope
//! each iteration through the normal block rules. A `return` inside the body
//! ends the loop and is passed up unchanged.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{Expr, Stmt};
use tracing::trace;

impl Interpreter {
    /// Executes a `while COND do BODY` loop.
    ///
    /// The condition is evaluated before each iteration using truthiness.
    pub(crate) fn execute_while(
        &mut self,
        condition: &Expr,
        body: &Stmt,
    ) -> Result<ControlFlow, RuntimeError> {
        let mut iterations: u64 = 0;

        while self.evaluate_expr(condition)?.is_truthy() {
            iterations += 1;
            if let flow @ ControlFlow::Return(_) = self.execute_statement(body)? {
                trace!(iterations, "loop left by return");
                return Ok(flow);
            }
        }

        trace!(iterations, "loop finished");
        Ok(ControlFlow::Normal)
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::memory::value::Value;
    use crate::parser::parse::Parser;
    use crate::terminal::Terminal;

    fn interpret(source: &str) -> Interpreter {
        let program = Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap();
        let mut interpreter = Interpreter::new(Terminal::captured());
        interpreter.interpret(&program.statements).unwrap();
        interpreter
    }

    #[test]
    fn test_condition_false_initially() {
        let interpreter = interpret("i = 5\nwhile i < 3 do { print i }");
        assert!(interpreter.terminal().output().is_empty());
    }

    #[test]
    fn test_countdown() {
        let interpreter = interpret("n = 3\nwhile n do { print n\nn = n - 1 }");
        assert_eq!(interpreter.terminal().output(), vec!["3", "2", "1"]);
        assert_eq!(interpreter.globals().get("n"), Some(Value::Integer(0)));
    }

    #[test]
    fn test_return_exits_loop_and_function() {
        let interpreter = interpret(
            "function firstOver(limit) { i = 0\nwhile true do { if i > limit then return i\ni = i + 1 } }\nprint firstOver(4)",
        );
        assert_eq!(interpreter.terminal().output(), vec!["5"]);
    }
}
