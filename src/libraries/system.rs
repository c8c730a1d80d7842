// ABOUTME: system library — always available, no import required

use super::{arity, Dispatch};
use crate::error::EvalError;
use crate::value::{to_display_string, Value};
use std::io::{self, Write};
use std::process::Command;

const NAMES: &[&str] = &["print", "ifu", "ec"];

pub fn dispatch(name: &str, args: &[Value]) -> Dispatch {
    if !NAMES.contains(&name) {
        return Dispatch::NotFound;
    }
    Dispatch::Handled(call(name, args))
}

fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    match name {
        "print" => {
            let line: Vec<String> = args.iter().map(to_display_string).collect();
            println!("{}", line.join(" "));
            Ok(Value::Number(0.0))
        }
        "ifu" => {
            if let Some(prompt) = args.first() {
                print!("{}", to_display_string(prompt));
                io::stdout().flush().ok();
            }
            let mut line = String::new();
            io::stdin().read_line(&mut line).map_err(|e| {
                EvalError::invalid_argument("ifu", format!("failed to read input: {e}"))
            })?;
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            Ok(Value::String(line))
        }
        "ec" => {
            arity("ec", args, 1)?;
            let cmd = to_display_string(&args[0]);
            let status = Command::new("sh").arg("-c").arg(&cmd).status();
            let code = status.ok().and_then(|s| s.code()).unwrap_or(-1);
            Ok(Value::Number(code as f64))
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_runs_shell_and_returns_status() {
        let result = call("ec", &[Value::String("exit 0".into())]).unwrap();
        assert_eq!(result, Value::Number(0.0));
    }

    #[test]
    fn test_ec_nonzero_status() {
        let result = call("ec", &[Value::String("exit 7".into())]).unwrap();
        assert_eq!(result, Value::Number(7.0));
    }
}
