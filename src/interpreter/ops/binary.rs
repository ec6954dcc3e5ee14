//! Binary operator evaluation
//!
//! Arithmetic and ordering require two integers and use checked math, so
//! overflow and division by zero surface as runtime errors. Equality accepts
//! any pair of values.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::Expr;
use crate::parser::lexer::{Token, TokenKind};

impl Interpreter {
    pub(crate) fn evaluate_binary(
        &mut self,
        left: &Expr,
        operator: &Token,
        right: &Expr,
    ) -> Result<Value, RuntimeError> {
        let left = self.evaluate_expr(left)?;
        let right = self.evaluate_expr(right)?;

        match operator.kind {
            TokenKind::EqualEqual => Ok(Value::Boolean(left == right)),
            TokenKind::NotEqual => Ok(Value::Boolean(left != right)),
            _ => {
                let (a, b) = Self::integer_operands(operator, &left, &right)?;
                Self::apply_integer_op(operator, a, b)
            }
        }
    }

    fn integer_operands(
        operator: &Token,
        left: &Value,
        right: &Value,
    ) -> Result<(i64, i64), RuntimeError> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok((*a, *b)),
            _ => Err(RuntimeError::TypeError {
                operator: operator.lexeme.clone(),
                got: format!("{} and {}", left.type_name(), right.type_name()),
                location: operator.location,
            }),
        }
    }

    #[inline]
    fn apply_integer_op(operator: &Token, a: i64, b: i64) -> Result<Value, RuntimeError> {
        let location = operator.location;
        let overflow = |symbol: &str| RuntimeError::IntegerOverflow {
            operation: format!("{} {} {}", a, symbol, b),
            location,
        };

        match operator.kind {
            TokenKind::Plus => a.checked_add(b).map(Value::Integer).ok_or_else(|| overflow("+")),
            TokenKind::Minus => a.checked_sub(b).map(Value::Integer).ok_or_else(|| overflow("-")),
            TokenKind::Star => a.checked_mul(b).map(Value::Integer).ok_or_else(|| overflow("*")),
            TokenKind::Slash => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { location });
                }
                // i64::MIN / -1 is the only remaining failure
                a.checked_div(b).map(Value::Integer).ok_or_else(|| overflow("/"))
            }
            TokenKind::Less => Ok(Value::Boolean(a < b)),
            TokenKind::LessEqual => Ok(Value::Boolean(a <= b)),
            TokenKind::Greater => Ok(Value::Boolean(a > b)),
            TokenKind::GreaterEqual => Ok(Value::Boolean(a >= b)),
            _ => Err(RuntimeError::UnsupportedOperator {
                operator: operator.lexeme.clone(),
                location,
            }),
        }
    }
}
