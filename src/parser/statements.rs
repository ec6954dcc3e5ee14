//! Statement parsing implementation
//!
//! # Grammar
//!
//! ```text
//! statement ::= "print" expr ";"?
//!             | "return" expr? ";"?
//!             | "{" declaration* "}"
//!             | "if" expr "then" statement ( "else" statement )?
//!             | "while" expr "do" statement
//!             | expr ";"?
//! ```
//!
//! Semicolons are accepted after simple statements but never required.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.nested_statement(|parser| {
            if parser.match_kind(TokenKind::Return) {
                return parser.parse_return_statement();
            }
            if parser.match_kind(TokenKind::Print) {
                return parser.parse_print_statement();
            }
            if parser.match_kind(TokenKind::LeftBrace) {
                return Ok(Stmt::Block(parser.parse_block()?));
            }
            if parser.match_kind(TokenKind::If) {
                return parser.parse_if_statement();
            }
            if parser.match_kind(TokenKind::While) {
                return parser.parse_while_statement();
            }
            parser.parse_expression_statement()
        })
    }

    /// Parse block statements after the opening brace, consuming the closing one
    pub(crate) fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_declaration()?);
        }

        self.expect_token(TokenKind::RightBrace, "Expected '}' after block.")?;
        Ok(statements)
    }

    fn parse_return_statement(&mut self) -> Result<Stmt, ParseError> {
        let keyword = self.previous().clone();

        let value = if self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RightBrace)
            || self.is_at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };

        self.optional_semicolon();
        Ok(Stmt::Return { keyword, value })
    }

    fn parse_print_statement(&mut self) -> Result<Stmt, ParseError> {
        let value = self.parse_expression()?;
        self.optional_semicolon();
        Ok(Stmt::Print(value))
    }

    fn parse_if_statement(&mut self) -> Result<Stmt, ParseError> {
        let condition = self.parse_expression()?;
        self.expect_token(TokenKind::Then, "Expected 'then' after if condition.")?;
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.match_kind(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let condition = self.parse_expression()?;
        self.expect_token(TokenKind::Do, "Expected 'do' after while condition.")?;
        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::While { condition, body })
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        self.optional_semicolon();
        Ok(Stmt::Expression(expr))
    }
}
