// Constants for the MiniLang interpreter

/// Default limit on nested user-function calls.
///
/// Sized so that recursion this deep stays within a default 2 MiB thread
/// stack in unoptimized builds. Callers running the interpreter on a larger
/// stack can raise it through `InterpreterOptions::max_call_depth`.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 128;

/// Prefix of each top-level expression value echoed in dump mode
pub const DUMP_ECHO_PREFIX: &str = ">> ";
