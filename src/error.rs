// ABOUTME: Error types for lexing, parsing, and evaluation failures

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unterminated string at line {line}")]
    UnterminatedString { line: usize },

    #[error("unexpected character '{ch}' at line {line}")]
    InvalidCharacter { ch: char, line: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, got {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("line {line}: invalid number literal '{text}'")]
    InvalidNumber { text: String, line: usize },

    #[error("line {line}: {message}")]
    Other { message: String, line: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Undefined function: {0}")]
    UndefinedFunction(String),

    #[error("Property '{property}' not found")]
    MissingProperty { property: String },

    #[error("{function}: expected {expected} argument(s), got {actual}")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("{context}: expected {expected}, got {actual}")]
    TypeError {
        context: String,
        expected: String,
        actual: String,
    },

    #[error("array index {index} out of bounds for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("{function}: {message}")]
    InvalidArgument { function: String, message: String },
}

impl EvalError {
    pub fn type_error(context: &str, expected: &str, actual: &str) -> Self {
        EvalError::TypeError {
            context: context.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn arity(function: &str, expected: usize, actual: usize) -> Self {
        EvalError::ArityMismatch {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    pub fn invalid_argument(function: &str, message: impl Into<String>) -> Self {
        EvalError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// Top-level error surfaced by `run_source`: either the source failed to
/// load (lex/parse, fatal) or a runtime error occurred during evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RxError {
    #[error("{0}")]
    Lex(#[from] LexError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Runtime error: {0}")]
    Eval(#[from] EvalError),
}
