// ABOUTME: math library — gated behind `^math`

use super::{arity, Dispatch};
use crate::error::EvalError;
use crate::value::{to_number, Value};
use rand::Rng;

const NAMES: &[&str] = &[
    "sqrt", "pow", "sin", "cos", "tan", "abs", "floor", "ceil", "round", "min", "max", "random",
    "log", "log10", "exp",
];

pub fn dispatch(name: &str, args: &[Value]) -> Dispatch {
    if !NAMES.contains(&name) {
        return Dispatch::NotFound;
    }
    Dispatch::Handled(call(name, args))
}

fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let num = |i: usize| to_number(&args[i]);
    match name {
        "sqrt" => {
            arity("sqrt", args, 1)?;
            Ok(Value::Number(num(0).sqrt()))
        }
        "pow" => {
            arity("pow", args, 2)?;
            Ok(Value::Number(num(0).powf(num(1))))
        }
        "sin" => {
            arity("sin", args, 1)?;
            Ok(Value::Number(num(0).sin()))
        }
        "cos" => {
            arity("cos", args, 1)?;
            Ok(Value::Number(num(0).cos()))
        }
        "tan" => {
            arity("tan", args, 1)?;
            Ok(Value::Number(num(0).tan()))
        }
        "abs" => {
            arity("abs", args, 1)?;
            Ok(Value::Number(num(0).abs()))
        }
        "floor" => {
            arity("floor", args, 1)?;
            Ok(Value::Number(num(0).floor()))
        }
        "ceil" => {
            arity("ceil", args, 1)?;
            Ok(Value::Number(num(0).ceil()))
        }
        "round" => {
            arity("round", args, 1)?;
            Ok(Value::Number(num(0).round()))
        }
        "min" => {
            arity("min", args, 2)?;
            Ok(Value::Number(num(0).min(num(1))))
        }
        "max" => {
            arity("max", args, 2)?;
            Ok(Value::Number(num(0).max(num(1))))
        }
        "random" => {
            arity("random", args, 0)?;
            Ok(Value::Number(rand::thread_rng().gen_range(0.0..1.0)))
        }
        "log" => {
            arity("log", args, 1)?;
            Ok(Value::Number(num(0).ln()))
        }
        "log10" => {
            arity("log10", args, 1)?;
            Ok(Value::Number(num(0).log10()))
        }
        "exp" => {
            arity("exp", args, 1)?;
            Ok(Value::Number(num(0).exp()))
        }
        _ => unreachable!(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_ok(name: &str, args: &[Value]) -> f64 {
        match call(name, args).unwrap() {
            Value::Number(n) => n,
            _ => panic!("expected number"),
        }
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(call_ok("sqrt", &[Value::Number(9.0)]), 3.0);
    }

    #[test]
    fn test_pow() {
        assert_eq!(call_ok("pow", &[Value::Number(2.0), Value::Number(10.0)]), 1024.0);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(call_ok("min", &[Value::Number(3.0), Value::Number(5.0)]), 3.0);
        assert_eq!(call_ok("max", &[Value::Number(3.0), Value::Number(5.0)]), 5.0);
    }

    #[test]
    fn test_random_is_in_unit_range() {
        let n = call_ok("random", &[]);
        assert!((0.0..1.0).contains(&n));
    }

    #[test]
    fn test_arity_mismatch() {
        let err = call("sqrt", &[]).unwrap_err();
        assert!(matches!(err, EvalError::ArityMismatch { .. }));
    }
}
