//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all possible runtime
//! values in a MiniLang program. Values are dynamically typed at the language
//! level but form a closed set here, so every operator matches exhaustively.
//!
//! # Value Types
//!
//! - [`Value::Integer`]: 64-bit signed integer
//! - [`Value::Str`]: immutable UTF-8 string, shared on clone
//! - [`Value::Boolean`]: `true` / `false`
//! - [`Value::Absent`]: the missing value (uninitialized variables, bare `return`)
//! - [`Value::Callable`]: user functions and native functions

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::parser::ast::{FunctionDecl, SourceLocation};
use std::fmt;
use std::rc::Rc;

/// Runtime values in the interpreter
#[derive(Debug, Clone, Default)]
pub enum Value {
    Integer(i64),
    Str(Rc<str>),
    Boolean(bool),
    #[default]
    Absent,
    Callable(Callable),
}

impl Value {
    /// Language-level truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Absent => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Str(_) | Value::Callable(_) => true,
        }
    }

    /// Name of the value's kind, used in runtime error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Str(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Absent => "absent",
            Value::Callable(_) => "function",
        }
    }
}

/// Structural equality across all kinds; different kinds are never equal
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Absent, Value::Absent) => true,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Absent => Ok(()),
            Value::Callable(callable) => write!(f, "{}", callable),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

/// Host implementation of a native function
pub type NativeFn = fn(&mut Interpreter, &[Value], SourceLocation) -> Result<Value, RuntimeError>;

/// Anything that can appear on the left of a call
#[derive(Clone)]
pub enum Callable {
    Function(Rc<Function>),
    Native(NativeFunction),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Function(function) => function.arity(),
            Callable::Native(native) => native.arity,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Function(function) => function.name(),
            Callable::Native(native) => native.name,
        }
    }
}

/// User functions compare by identity, natives by name
impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            (Callable::Native(a), Callable::Native(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(function) => write!(f, "<fn {}>", function.name()),
            Callable::Native(_) => write!(f, "<native fn>"),
        }
    }
}

// Closures can reach themselves through their environment, so Debug stays shallow.
impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Function(function) => f
                .debug_struct("Function")
                .field("name", &function.name())
                .field("arity", &function.arity())
                .finish(),
            Callable::Native(native) => f
                .debug_struct("Native")
                .field("name", &native.name)
                .field("arity", &native.arity)
                .finish(),
        }
    }
}

/// A user-defined function together with the environment it was declared in
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Environment,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Environment) -> Self {
        Function {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

/// A function implemented by the host
#[derive(Clone, Copy)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}
