use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::Expr;
use crate::parser::lexer::Token;

impl Interpreter {
    /// `return [EXPR]`: unwinds to the innermost active call with the value,
    /// or absent when there is none
    pub(crate) fn execute_return(
        &mut self,
        keyword: &Token,
        value: Option<&Expr>,
    ) -> Result<ControlFlow, RuntimeError> {
        if self.call_depth == 0 {
            return Err(RuntimeError::ReturnOutsideFunction {
                location: keyword.location,
            });
        }

        let value = match value {
            Some(expr) => self.evaluate_expr(expr)?,
            None => Value::Absent,
        };
        Ok(ControlFlow::Return(value))
    }
}
