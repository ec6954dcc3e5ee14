//! Declaration parsing implementation
//!
//! A declaration is either a function definition or any statement:
//!
//! ```text
//! declaration ::= "function" IDENT "(" params? ")" "{" declaration* "}"
//!               | statement
//! params      ::= IDENT ( "," IDENT )*
//! ```
//!
//! Declarations are the unit of error recovery: a non-fatal [`ParseError`]
//! raised anywhere inside one is recorded, the parser resynchronizes, and a
//! placeholder statement is returned so parsing continues with the next
//! declaration.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseError, Parser, MAX_ARGUMENTS};
use std::rc::Rc;

impl Parser {
    /// Parse one declaration, recovering from non-fatal errors
    pub(crate) fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let result = if self.match_kind(TokenKind::Function) {
            self.nested_statement(Self::parse_function_declaration)
        } else {
            self.parse_statement()
        };

        match result {
            Ok(stmt) => Ok(stmt),
            Err(error) if error.fatal => Err(error),
            Err(error) => {
                self.report(error);
                self.synchronize();
                Ok(Stmt::placeholder())
            }
        }
    }

    /// Parse `NAME ( params ) { body }`; the `function` keyword is already consumed
    fn parse_function_declaration(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_token(TokenKind::Identifier, "Expected function name.")?;
        self.expect_token(TokenKind::LeftParen, "Expected '(' after function name.")?;
        let params = self.parse_parameter_list()?;
        self.expect_token(TokenKind::RightParen, "Expected ')' after parameters.")?;
        self.expect_token(TokenKind::LeftBrace, "Expected '{' before function body.")?;
        let body = self.parse_block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    /// Parse parameter names up to (not including) the closing parenthesis
    fn parse_parameter_list(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut params = Vec::new();

        if self.check(TokenKind::RightParen) {
            return Ok(params);
        }

        loop {
            if params.len() == MAX_ARGUMENTS {
                let error = self.error_at_current(format!(
                    "Can't have more than {} parameters.",
                    MAX_ARGUMENTS
                ));
                self.report(error);
            }
            params.push(self.expect_token(TokenKind::Identifier, "Expected parameter name.")?);

            if !self.match_kind(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }
}
