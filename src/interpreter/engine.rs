// Execution engine for the MiniLang interpreter

use crate::interpreter::builtins;
use crate::interpreter::constants::{DEFAULT_MAX_CALL_DEPTH, DUMP_ECHO_PREFIX};
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::memory::value::{Callable, Function, Value};
use crate::parser::ast::{SourceLocation, Stmt};
use crate::terminal::Terminal;
use std::rc::Rc;
use tracing::{debug, trace};

/// Interpreter settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Echo the value of every top-level expression statement
    pub dump: bool,
    /// Deepest allowed nesting of user-function calls
    pub max_call_depth: usize,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        InterpreterOptions {
            dump: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// How a statement finished
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    Normal,
    /// A `return` is unwinding to the nearest call site
    Return(Value),
}

/// Tree-walking interpreter for MiniLang programs
pub struct Interpreter {
    /// Outermost scope, holding the natives and top-level names
    globals: Environment,

    /// Scope that statements currently execute in
    pub(crate) environment: Environment,

    /// Where `print` writes and `input` reads
    pub(crate) terminal: Terminal,

    pub(crate) options: InterpreterOptions,

    /// Value of the most recent expression statement, print, declaration or assignment
    pub(crate) last_value: Value,

    /// Number of user-function calls currently executing
    pub(crate) call_depth: usize,
}

impl Interpreter {
    pub fn new(terminal: Terminal) -> Self {
        Self::with_options(terminal, InterpreterOptions::default())
    }

    pub fn with_options(terminal: Terminal, options: InterpreterOptions) -> Self {
        let globals = Environment::new();
        builtins::install(&globals);

        Interpreter {
            environment: globals.clone(),
            globals,
            terminal,
            options,
            last_value: Value::Absent,
            call_depth: 0,
        }
    }

    /// Run top-level statements in order, stopping at the first runtime error.
    ///
    /// Global state persists between calls, so a program can be fed in pieces.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        debug!(statements = statements.len(), "interpreting program");

        for stmt in statements {
            self.execute_statement(stmt)?;

            if self.options.dump && matches!(stmt, Stmt::Expression(_)) {
                let echo = format!("{}{}", DUMP_ECHO_PREFIX, self.last_value);
                self.terminal
                    .write_line(&echo)
                    .map_err(|e| RuntimeError::io(e, SourceLocation::default()))?;
            }
        }

        self.terminal
            .flush()
            .map_err(|e| RuntimeError::io(e, SourceLocation::default()))
    }

    /// Execute one statement in the current environment
    pub(crate) fn execute_statement(&mut self, stmt: &Stmt) -> Result<ControlFlow, RuntimeError> {
        match stmt {
            Stmt::Expression(expr) => self.execute_expression_statement(expr),
            Stmt::Print(expr) => self.execute_print(expr),
            Stmt::Var { name, initializer } => self.execute_var(name, initializer.as_ref()),
            Stmt::Block(statements) => {
                let scope = self.environment.enclosed();
                self.execute_block(statements, scope)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => self.execute_if(condition, then_branch, else_branch.as_deref()),
            Stmt::While { condition, body } => self.execute_while(condition, body),
            Stmt::Function(declaration) => {
                let function = Function::new(Rc::clone(declaration), self.environment.clone());
                self.environment.define(
                    &declaration.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
                Ok(ControlFlow::Normal)
            }
            Stmt::Return { keyword, value } => self.execute_return(keyword, value.as_ref()),
        }
    }

    /// Execute `statements` in `scope`, restoring the previous scope afterwards.
    ///
    /// Stops at the first `return` and hands it to the caller.
    pub(crate) fn execute_block(
        &mut self,
        statements: &[Stmt],
        scope: Environment,
    ) -> Result<ControlFlow, RuntimeError> {
        trace!(depth = scope.depth(), "entering scope");
        let previous = std::mem::replace(&mut self.environment, scope);

        let mut result = Ok(ControlFlow::Normal);
        for stmt in statements {
            match self.execute_statement(stmt) {
                Ok(ControlFlow::Normal) => {}
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    /// Value of the last evaluated expression statement, print, declaration or assignment
    pub fn last_value(&self) -> &Value {
        &self.last_value
    }

    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;

    fn run(source: &str) -> Interpreter {
        let mut parser = Parser::from_source(source).unwrap();
        let program = parser.parse_program().unwrap();
        assert!(parser.diagnostics().is_empty(), "{:?}", parser.diagnostics());
        let mut interpreter = Interpreter::new(Terminal::captured());
        interpreter.interpret(&program.statements).unwrap();
        interpreter
    }

    #[test]
    fn test_last_value_tracks_expression_statements() {
        let interpreter = run("x = 4\nx * 10");
        assert_eq!(interpreter.last_value(), &Value::Integer(40));
        assert!(interpreter.terminal().output().is_empty());
    }

    #[test]
    fn test_block_scope_is_restored() {
        let interpreter = run("x = 1\n{ y = 2\nx = 3 }");
        let globals = interpreter.globals();
        assert_eq!(globals.get("x"), Some(Value::Integer(3)));
        assert_eq!(globals.get("y"), None);
        assert!(interpreter.environment.ptr_eq(globals));
    }

    #[test]
    fn test_globals_hold_natives() {
        let interpreter = run("");
        assert!(matches!(
            interpreter.globals().get("print"),
            Some(Value::Callable(Callable::Native(_)))
        ));
        assert!(interpreter.globals().get("input").is_some());
    }

    #[test]
    fn test_dump_echoes_top_level_expressions() {
        let mut parser = Parser::from_source("1 + 1\nprint 5\nif true then 7").unwrap();
        let program = parser.parse_program().unwrap();
        let options = InterpreterOptions {
            dump: true,
            ..InterpreterOptions::default()
        };
        let mut interpreter = Interpreter::with_options(Terminal::captured(), options);
        interpreter.interpret(&program.statements).unwrap();
        assert_eq!(interpreter.terminal().output(), vec![">> 2", "5"]);
    }

    #[test]
    fn test_state_persists_across_interpret_calls() {
        let mut interpreter = Interpreter::new(Terminal::captured());
        for source in ["function twice(n) { return n * 2 }", "print twice(21)"] {
            let program = Parser::from_source(source)
                .unwrap()
                .parse_program()
                .unwrap();
            interpreter.interpret(&program.statements).unwrap();
        }
        assert_eq!(interpreter.terminal().output(), vec!["42"]);
    }
}
