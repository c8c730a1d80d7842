// ABOUTME: Standard library surface, gated behind the imported-libraries set

pub mod colors;
pub mod math;
pub mod system;
pub mod time;

use crate::error::EvalError;
use crate::value::Value;

/// Returned by a library's dispatch function to distinguish "not my name"
/// (the caller should try the next candidate) from a real failure.
pub enum Dispatch {
    Handled(Result<Value, EvalError>),
    NotFound,
}

pub(crate) fn arity(function: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() != expected {
        Err(EvalError::arity(function, expected, args.len()))
    } else {
        Ok(())
    }
}
