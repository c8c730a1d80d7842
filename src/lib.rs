// ABOUTME: Library module exposing internal components for embedding and testing

pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod libraries;
pub mod parser;
pub mod repl;
pub mod value;

use error::RxError;
use eval::Interpreter;
use lexer::Lexer;
use parser::Parser;

/// Lexes, parses, and evaluates a chunk of source against an existing
/// interpreter. Used by both file mode and each REPL line.
pub fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<(), RxError> {
    let tokens = Lexer::new(source).tokenize()?;
    let program = Parser::new(tokens).parse_program()?;
    interpreter.interpret(&program)?;
    Ok(())
}
