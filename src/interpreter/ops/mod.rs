pub mod binary;
pub mod unary;

// Operators are `impl Interpreter` blocks; nothing to re-export
