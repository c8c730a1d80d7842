// ABOUTME: Interactive REPL: read a line, evaluate it, print errors, loop

use crate::config::{PROMPT, WELCOME_MESSAGE};
use crate::error::RxError;
use crate::eval::Interpreter;
use crate::run_source;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// `RxError::Eval` already renders as `Runtime error: ...`; lex/parse
/// failures need the `Error:` prefix applied here, matching the original's
/// split between the top-level load catch and the evaluator's own catch.
pub fn report(err: &RxError) {
    match err {
        RxError::Eval(_) => eprintln!("{err}"),
        RxError::Lex(_) | RxError::Parse(_) => eprintln!("Error: {err}"),
    }
}

/// Runs the interactive loop until the user types `exit` or sends EOF.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{WELCOME_MESSAGE}");
    let mut editor = DefaultEditor::new()?;
    let mut interpreter = Interpreter::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed)?;
                if trimmed == "exit" {
                    break;
                }
                if let Err(err) = run_source(&mut interpreter, trimmed) {
                    report(&err);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }
    Ok(())
}
