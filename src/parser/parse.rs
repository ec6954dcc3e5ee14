//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the main parse entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, recovery, and coordination
//! - `declarations`: function declarations and per-declaration error recovery
//! - `statements`: `print`, `return`, blocks, `if`, `while`, expression statements
//! - `expressions`: expressions with precedence climbing
//!
//! # Error Recovery
//!
//! A syntax error inside a declaration does not stop the parse. The error is
//! recorded in [`Parser::diagnostics`], tokens are skipped up to the next
//! statement boundary, and a placeholder statement takes the broken one's
//! place. Only nesting deeper than [`MAX_NESTING_DEPTH`] aborts parsing.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token, TokenKind};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Maximum nesting of expressions before the parse is aborted
pub const MAX_NESTING_DEPTH: usize = 100;

/// Maximum nesting of statements (blocks, branches, loop bodies, functions)
/// before the parse is aborted
pub const MAX_STATEMENT_DEPTH: usize = 512;

/// Maximum number of parameters or call arguments
pub const MAX_ARGUMENTS: usize = 255;

/// Where a parse error happened, relative to the token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSite {
    Lexeme(String),
    End,
}

impl fmt::Display for ErrorSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSite::Lexeme(lexeme) => write!(f, " at '{}'", lexeme),
            ErrorSite::End => write!(f, " at end"),
        }
    }
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Parse] line {}{site}: {message}", .location.line)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
    pub site: ErrorSite,
    /// Fatal errors escape statement-level recovery and abort the parse
    pub fatal: bool,
}

impl ParseError {
    pub fn at(token: &Token, message: impl Into<String>) -> Self {
        let site = if token.kind == TokenKind::EndOfInput {
            ErrorSite::End
        } else {
            ErrorSite::Lexeme(token.lexeme.clone())
        };
        ParseError {
            message: message.into(),
            location: token.location,
            site,
            fatal: false,
        }
    }
}

/// Recursive descent parser for MiniLang
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) diagnostics: Vec<ParseError>,
    pub(crate) depth: usize,
    pub(crate) statement_depth: usize,
}

impl Parser {
    /// Create a parser over an already-lexed token sequence.
    ///
    /// An end-of-input token is appended if the sequence lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndOfInput) {
            let location = tokens.last().map(|t| t.location).unwrap_or_default();
            tokens.push(Token::new(TokenKind::EndOfInput, "", location));
        }
        Self {
            tokens,
            position: 0,
            diagnostics: Vec::new(),
            depth: 0,
            statement_depth: 0,
        }
    }

    /// Lex `source` and create a parser over the result
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        Ok(Self::new(Lexer::new(source).tokenize()?))
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let stmt = self.parse_declaration()?;
            program.statements.push(stmt);
        }

        debug!(
            statements = program.len(),
            recovered_errors = self.diagnostics.len(),
            "parsed program"
        );
        Ok(program)
    }

    /// Errors that were reported and recovered from while parsing
    pub fn diagnostics(&self) -> &[ParseError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.diagnostics)
    }

    // ===== Error reporting and recovery =====

    /// Record a non-fatal error without unwinding
    pub(crate) fn report(&mut self, error: ParseError) {
        debug!(%error, "recorded parse error");
        self.diagnostics.push(error);
    }

    pub(crate) fn error_at_current(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(self.peek(), message)
    }

    /// Skip tokens until a likely statement boundary
    pub(crate) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Run `parse` one expression level deeper, failing fatally past the limit
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.fatal_error(format!(
                "Nesting exceeds the limit of {} levels.",
                MAX_NESTING_DEPTH
            )));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// Run `parse` one statement level deeper, failing fatally past the limit
    pub(crate) fn nested_statement<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.statement_depth >= MAX_STATEMENT_DEPTH {
            return Err(self.fatal_error(format!(
                "Statement nesting exceeds the limit of {} levels.",
                MAX_STATEMENT_DEPTH
            )));
        }

        self.statement_depth += 1;
        let result = parse(self);
        self.statement_depth -= 1;
        result
    }

    fn fatal_error(&self, message: String) -> ParseError {
        let mut error = self.error_at_current(message);
        error.fatal = true;
        error
    }

    // ===== Helper methods =====

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|&kind| self.match_kind(kind))
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::EndOfInput
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        message: &str,
    ) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Consume a `;` if present; semicolons are never required
    pub(crate) fn optional_semicolon(&mut self) {
        self.match_kind(TokenKind::Semicolon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Program, Vec<ParseError>) {
        let mut parser = Parser::from_source(source).unwrap();
        let program = parser.parse_program().unwrap();
        let diagnostics = parser.take_diagnostics();
        (program, diagnostics)
    }

    fn single_expression(source: &str) -> Expr {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "unexpected errors: {:?}", diagnostics);
        assert_eq!(program.len(), 1);
        match program.statements.into_iter().next() {
            Some(Stmt::Expression(expr)) => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence_tree() {
        match single_expression("1 + 2 * 3") {
            Expr::Binary {
                operator, right, ..
            } => {
                assert_eq!(operator.kind, TokenKind::Plus);
                assert!(matches!(
                    *right,
                    Expr::Binary { ref operator, .. } if operator.kind == TokenKind::Star
                ));
            }
            other => panic!("Expected binary expression, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment_is_right_associative() {
        match single_expression("a = b = 3") {
            Expr::Assign { name, value } => {
                assert_eq!(name.lexeme, "a");
                assert!(matches!(*value, Expr::Assign { ref name, .. } if name.lexeme == "b"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_assignment_target_keeps_left_side() {
        let (program, diagnostics) = parse("1 + 2 = 3");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("Invalid assignment target"));
        assert_eq!(diagnostics[0].site, ErrorSite::Lexeme("=".to_string()));
        assert!(matches!(
            &program.statements[0],
            Stmt::Expression(Expr::Binary { .. })
        ));
    }

    #[test]
    fn test_logical_and_binds_tighter_than_or() {
        match single_expression("a or b and c") {
            Expr::Logical {
                operator, right, ..
            } => {
                assert_eq!(operator.kind, TokenKind::Or);
                assert!(matches!(*right, Expr::Logical { ref operator, .. } if operator.kind == TokenKind::And));
            }
            other => panic!("Expected logical expression, got {:?}", other),
        }
    }

    #[test]
    fn test_chained_calls() {
        match single_expression("make(1)(2, 3)") {
            Expr::Call {
                callee, arguments, ..
            } => {
                assert_eq!(arguments.len(), 2);
                assert!(matches!(*callee, Expr::Call { ref arguments, .. } if arguments.len() == 1));
            }
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_statements_with_optional_semicolons() {
        let source = "
            x = 0;
            while x < 3 do x = x + 1
            if x == 3 then print x else print 0;
            function f(a, b) { return a }
            { print f(1, 2) }
        ";
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty());
        assert_eq!(program.len(), 5);
        assert!(matches!(program.statements[1], Stmt::While { .. }));
        assert!(matches!(
            program.statements[2],
            Stmt::If {
                else_branch: Some(_),
                ..
            }
        ));
        match &program.statements[3] {
            Stmt::Function(decl) => {
                assert_eq!(decl.name.lexeme, "f");
                assert_eq!(decl.params.len(), 2);
                assert_eq!(decl.body.len(), 1);
            }
            other => panic!("Expected function, got {:?}", other),
        }
        assert!(matches!(program.statements[4], Stmt::Block(ref body) if body.len() == 1));
    }

    #[test]
    fn test_bare_return_before_brace() {
        let (program, diagnostics) = parse("function f() { return }");
        assert!(diagnostics.is_empty());
        match &program.statements[0] {
            Stmt::Function(decl) => {
                assert!(matches!(decl.body[0], Stmt::Return { value: None, .. }));
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_recovery_continues_after_bad_statement() {
        let (program, diagnostics) = parse("print (1 + ; print 2\nprint 3");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].site, ErrorSite::Lexeme(";".to_string()));
        assert_eq!(program.len(), 3);
        assert_eq!(program.statements[0], Stmt::placeholder());
        assert!(matches!(program.statements[1], Stmt::Print(_)));
        assert!(matches!(program.statements[2], Stmt::Print(_)));
    }

    #[test]
    fn test_error_at_end() {
        let (_, diagnostics) = parse("print (1 + 2");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].site, ErrorSite::End);
        assert_eq!(
            diagnostics[0].to_string(),
            "[Parse] line 1 at end: Expected ')' after expression."
        );
    }

    #[test]
    fn test_argument_limit_is_reported_not_fatal() {
        let args = vec!["1"; 300].join(", ");
        let source = format!("f({})\nprint 1", args);
        let (program, diagnostics) = parse(&source);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("255"));
        assert_eq!(program.len(), 2);
        match &program.statements[0] {
            Stmt::Expression(Expr::Call { arguments, .. }) => assert_eq!(arguments.len(), 300),
            other => panic!("Expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_parameter_limit_is_reported_not_fatal() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("function f({}) {{ return 1 }}\nprint 2", params.join(", "));
        let (program, diagnostics) = parse(&source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.len(), 2);
        assert!(matches!(program.statements[0], Stmt::Function(ref decl) if decl.params.len() == 256));
    }

    #[test]
    fn test_excessive_nesting_is_fatal() {
        let source = format!("{}1{}", "(".repeat(150), ")".repeat(150));
        let mut parser = Parser::from_source(&source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.fatal);
        assert!(err.message.contains("Nesting"));
    }

    #[test]
    fn test_long_else_if_chain_parses() {
        let mut source = String::from("x = 150\n");
        for i in 0..200 {
            source.push_str(&format!("if x == {} then print {} else ", i, i));
        }
        source.push_str("print 0 - 1");

        let (program, diagnostics) = parse(&source);
        assert!(diagnostics.is_empty(), "unexpected errors: {:?}", diagnostics);
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_excessive_statement_nesting_is_fatal() {
        let depth = MAX_STATEMENT_DEPTH + 10;
        let source = format!("{}print 1{}", "{ ".repeat(depth), " }".repeat(depth));
        let mut parser = Parser::from_source(&source).unwrap();
        let err = parser.parse_program().unwrap_err();
        assert!(err.fatal);
        assert!(err.message.contains("Statement nesting"));
    }

    #[test]
    fn test_recovered_errors_survive_fatal_error() {
        let source = format!("print (1 + ;\nprint {}1{}", "(".repeat(150), ")".repeat(150));
        let mut parser = Parser::from_source(&source).unwrap();
        assert!(parser.parse_program().unwrap_err().fatal);
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(parser.diagnostics()[0].location.line, 1);
    }

    #[test]
    fn test_number_out_of_range() {
        let (program, diagnostics) = parse("x = 99999999999999999999;\nprint 1");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("out of range"));
        assert_eq!(program.len(), 2);
    }

    #[test]
    fn test_native_keywords_in_expression_position() {
        match single_expression("name = input(\"? \")") {
            Expr::Assign { value, .. } => match *value {
                Expr::Call { callee, .. } => {
                    assert!(matches!(*callee, Expr::Variable { ref name } if name.lexeme == "input"));
                }
                other => panic!("Expected call, got {:?}", other),
            },
            other => panic!("Expected assignment, got {:?}", other),
        }
    }
}
