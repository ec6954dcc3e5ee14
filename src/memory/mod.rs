//! Memory model for the MiniLang interpreter
//!
//! This module provides the core runtime data:
//! - [`value`]: Runtime value representation (Integer, Str, Boolean, Absent, Callable)
//! - [`environment`]: Shared, nested scopes holding variable bindings
//!
//! There is no explicit heap: strings and closures are reference counted, and
//! a scope lives exactly as long as the blocks, calls and closures using it.

pub mod environment;
pub mod value;
