//! Expression parsing implementation
//!
//! Binary operators are parsed by precedence climbing, one method per level,
//! from lowest to highest:
//!
//! ```text
//! assignment  ::= IDENT "=" assignment | or
//! or          ::= and ( "or" and )*
//! and         ::= equality ( "and" equality )*
//! equality    ::= comparison ( ( "==" | "!=" ) comparison )*
//! comparison  ::= term ( ( "<" | "<=" | ">" | ">=" ) term )*
//! term        ::= factor ( ( "+" | "-" ) factor )*
//! factor      ::= unary ( ( "*" | "/" ) unary )*
//! unary       ::= ( "not" | "-" ) unary | call
//! call        ::= primary ( "(" arguments? ")" )*
//! primary     ::= NUMBER | STRING | "true" | "false" | IDENT
//!               | "print" | "input" | "(" expression ")"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser, MAX_ARGUMENTS};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_assignment)
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_logical_or()?;

        if !self.match_kind(TokenKind::Assign) {
            return Ok(expr);
        }

        let equals = self.previous().clone();
        let value = self.parse_expression()?;

        match expr {
            Expr::Variable { name } => Ok(Expr::Assign {
                name,
                value: Box::new(value),
            }),
            other => {
                self.report(ParseError::at(&equals, "Invalid assignment target."));
                Ok(other)
            }
        }
    }

    /// Parse logical OR (`or`)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;

        while self.match_kind(TokenKind::Or) {
            let operator = self.previous().clone();
            let right = self.parse_logical_and()?;
            left = Expr::Logical {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse logical AND (`and`)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;

        while self.match_kind(TokenKind::And) {
            let operator = self.previous().clone();
            let right = self.parse_equality()?;
            left = Expr::Logical {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[TokenKind::EqualEqual, TokenKind::NotEqual],
            Self::parse_comparison,
        )
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::parse_term,
        )
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::parse_factor)
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary_level(&[TokenKind::Star, TokenKind::Slash], Self::parse_unary)
    }

    /// One left-associative binary precedence level
    fn parse_binary_level(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let mut left = operand(self)?;

        while self.match_any(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// Parse prefix `not` and `-`
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.match_any(&[TokenKind::Not, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.nested(Self::parse_unary)?;
            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.parse_call()
    }

    /// Parse a primary expression followed by any number of call suffixes
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        while self.match_kind(TokenKind::LeftParen) {
            expr = self.finish_call(expr)?;
        }

        Ok(expr)
    }

    /// Parse call arguments after the opening parenthesis
    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let mut arguments = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                if arguments.len() == MAX_ARGUMENTS {
                    let error = self.error_at_current(format!(
                        "Can't have more than {} arguments.",
                        MAX_ARGUMENTS
                    ));
                    self.report(error);
                }
                arguments.push(self.parse_expression()?);

                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.expect_token(TokenKind::RightParen, "Expected ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            arguments,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek().clone();

        let expr = match token.kind {
            TokenKind::False => Expr::Literal(Literal::Boolean(false)),
            TokenKind::True => Expr::Literal(Literal::Boolean(true)),
            TokenKind::Number => {
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    ParseError::at(
                        &token,
                        format!("Integer literal '{}' is out of range.", token.lexeme),
                    )
                })?;
                Expr::Literal(Literal::Integer(value))
            }
            TokenKind::String => Expr::Literal(Literal::Str(token.lexeme.clone())),
            // `print` and `input` name the native functions when used as values
            TokenKind::Identifier | TokenKind::Print | TokenKind::Input => {
                Expr::Variable { name: token }
            }
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_token(TokenKind::RightParen, "Expected ')' after expression.")?;
                return Ok(expr);
            }
            _ => return Err(self.error_at_current("Expected expression.")),
        };

        self.advance();
        Ok(expr)
    }
}
