// ABOUTME: Version info and REPL text constants

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "rx interpreter v1.0";
pub const PROMPT: &str = "rx> ";

/// Safety cap on `while`-loop iterations, active only in debug builds — see
/// `eval::Interpreter` for where it is enforced. It exists solely to guard
/// accidental infinite loops while testing; release builds run unbounded,
/// matching the language's own semantics.
#[cfg(debug_assertions)]
pub const WHILE_SAFETY_CAP: u64 = 1_000_000;
