//! Unary operator evaluation

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::Expr;
use crate::parser::lexer::{Token, TokenKind};

impl Interpreter {
    pub(crate) fn evaluate_unary(
        &mut self,
        operator: &Token,
        operand: &Expr,
    ) -> Result<Value, RuntimeError> {
        let value = self.evaluate_expr(operand)?;

        match operator.kind {
            TokenKind::Not => Ok(Value::Boolean(!value.is_truthy())),
            TokenKind::Minus => Self::negate(operator, value),
            _ => Err(RuntimeError::UnsupportedOperator {
                operator: operator.lexeme.clone(),
                location: operator.location,
            }),
        }
    }

    fn negate(operator: &Token, value: Value) -> Result<Value, RuntimeError> {
        match value {
            Value::Integer(n) => n
                .checked_neg()
                .ok_or(RuntimeError::IntegerOverflow {
                    operation: format!("-({})", n),
                    location: operator.location,
                })
                .map(Value::Integer),
            other => Err(RuntimeError::TypeError {
                operator: operator.lexeme.clone(),
                got: other.type_name().to_string(),
                location: operator.location,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::Interpreter;
    use crate::interpreter::errors::RuntimeError;
    use crate::memory::value::Value;
    use crate::parser::parse::Parser;
    use crate::terminal::Terminal;

    fn eval(source: &str) -> Result<Value, RuntimeError> {
        let program = Parser::from_source(source)
            .unwrap()
            .parse_program()
            .unwrap();
        let mut interpreter = Interpreter::new(Terminal::captured());
        interpreter.interpret(&program.statements)?;
        Ok(interpreter.last_value().clone())
    }

    #[test]
    fn test_negation() {
        assert_eq!(eval("-5").unwrap(), Value::Integer(-5));
        assert_eq!(eval("--5").unwrap(), Value::Integer(5));
        assert_eq!(eval("-(2 - 9)").unwrap(), Value::Integer(7));
    }

    #[test]
    fn test_not_uses_truthiness() {
        assert_eq!(eval("not 0").unwrap(), Value::Boolean(true));
        assert_eq!(eval("not \"\"").unwrap(), Value::Boolean(false));
        assert_eq!(eval("not not 3").unwrap(), Value::Boolean(true));
    }

    #[test]
    fn test_negating_a_string_is_a_type_error() {
        let err = eval("-\"abc\"").unwrap_err();
        assert!(matches!(err, RuntimeError::TypeError { ref got, .. } if got == "string"));
    }

    #[test]
    fn test_negation_overflow() {
        let err = eval("x = 0 - 9223372036854775807 - 1;\n-x").unwrap_err();
        assert!(matches!(err, RuntimeError::IntegerOverflow { .. }));
    }
}
