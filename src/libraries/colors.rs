// ABOUTME: colors library — gated behind `^colors`

use super::{arity, Dispatch};
use crate::error::EvalError;
use crate::value::{to_display_string, Value};

const RESET: &str = "\x1b[0m";

const COLOR_TABLE: &[(&str, &str)] = &[
    ("red", "\x1b[31m"),
    ("green", "\x1b[32m"),
    ("yellow", "\x1b[33m"),
    ("blue", "\x1b[34m"),
    ("magenta", "\x1b[35m"),
    ("cyan", "\x1b[36m"),
    ("white", "\x1b[37m"),
    ("black", "\x1b[30m"),
    ("bright_red", "\x1b[91m"),
    ("bright_green", "\x1b[92m"),
    ("bright_yellow", "\x1b[93m"),
    ("bright_blue", "\x1b[94m"),
    ("bright_magenta", "\x1b[95m"),
    ("bright_cyan", "\x1b[96m"),
    ("bright_white", "\x1b[97m"),
];

/// Looks up a color name for the `c@<color>"text"` literal. Unknown colors
/// fall back to the raw text with a trailing reset, matching the original.
pub fn code_for(name: &str) -> Option<&'static str> {
    COLOR_TABLE.iter().find(|(n, _)| *n == name).map(|(_, code)| *code)
}

pub fn render_color_literal(color: &str, text: &str) -> String {
    match code_for(color) {
        Some(code) => format!("{code}{text}{RESET}"),
        None => format!("{text}{RESET}"),
    }
}

const NAMES: &[&str] = &["print", "colorize", "list_colors", "supports_color"];

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
        "colorize" => {
            arity("colorize", args, 2)?;
            let color = to_display_string(&args[0]);
            let text = to_display_string(&args[1]);
            Ok(Value::String(render_color_literal(&color, &text)))
        }
        "list_colors" => {
            arity("list_colors", args, 0)?;
            for (name, _) in COLOR_TABLE {
                println!("{name}");
            }
            Ok(Value::Number(0.0))
        }
        "supports_color" => {
            arity("supports_color", args, 0)?;
            Ok(Value::Number(if terminal_supports_color() { 1.0 } else { 0.0 }))
        }
        _ => unreachable!(),
    }
}

fn terminal_supports_color() -> bool {
    std::env::var("COLORTERM").is_ok()
        || std::env::var("TERM").map(|t| t != "dumb" && !t.is_empty()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_color_lookup() {
        assert_eq!(code_for("red"), Some("\x1b[31m"));
        assert_eq!(code_for("bright_white"), Some("\x1b[97m"));
    }

    #[test]
    fn test_unknown_color_falls_back_to_raw_text() {
        assert_eq!(render_color_literal("nope", "hi"), "hi\x1b[0m");
    }

    #[test]
    fn test_colorize_wraps_text() {
        let result = call("colorize", &[Value::String("red".into()), Value::String("hi".into())]).unwrap();
        assert_eq!(result, Value::String("\x1b[31mhi\x1b[0m".into()));
    }
}
