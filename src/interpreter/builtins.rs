//! Built-in function implementations
//!
//! This module provides the native functions every global environment starts
//! with. They are ordinary callable values, so user code may pass them
//! around, compare them, or shadow them.
//!
//! # Supported Built-ins
//!
//! - `print(value)`: Writes the value's textual form as one line, returns absent
//! - `input(prompt)`: Writes the prompt without a line break, returns the next
//!   input line (absent once input is exhausted)

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::environment::Environment;
use crate::memory::value::{Callable, NativeFunction, Value};
use crate::parser::ast::SourceLocation;
use tracing::debug;

const NATIVES: &[NativeFunction] = &[
    NativeFunction {
        name: "print",
        arity: 1,
        func: native_print,
    },
    NativeFunction {
        name: "input",
        arity: 1,
        func: native_input,
    },
];

/// Define every native function in `globals`
pub(crate) fn install(globals: &Environment) {
    for native in NATIVES {
        globals.define(native.name, Value::Callable(Callable::Native(*native)));
    }
}

fn native_print(
    interpreter: &mut Interpreter,
    args: &[Value],
    _location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let text = args.first().map(Value::to_string).unwrap_or_default();

    // A closed output sink does not stop the program
    if let Err(error) = interpreter.terminal.write_line(&text) {
        debug!(%error, "print output dropped");
    }

    Ok(Value::Absent)
}

fn native_input(
    interpreter: &mut Interpreter,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let prompt = args.first().map(Value::to_string).unwrap_or_default();

    interpreter
        .terminal
        .write_prompt(&prompt)
        .map_err(|e| RuntimeError::io(e, location))?;

    let line = interpreter
        .terminal
        .read_line()
        .map_err(|e| RuntimeError::io(e, location))?;

    Ok(line.map(Value::from).unwrap_or(Value::Absent))
}
