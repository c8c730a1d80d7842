// ABOUTME: time library — gated behind `^time`

use super::{arity, Dispatch};
use crate::error::EvalError;
use crate::value::{to_display_string, to_number, RxObject, Value};
use chrono::{Datelike, Local, TimeZone, Timelike};
use std::time::{SystemTime, UNIX_EPOCH};

const NAMES: &[&str] = &[
    "now",
    "timestamp",
    "format",
    "diff",
    "sleep",
    "date_parts",
    "add",
    "subtract",
    "is_leap_year",
    "days_in_month",
];

pub fn dispatch(name: &str, args: &[Value]) -> Dispatch {
    if !NAMES.contains(&name) {
        return Dispatch::NotFound;
    }
    Dispatch::Handled(call(name, args))
}

fn call(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    match name {
        "now" => {
            arity("now", args, 0)?;
            let ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
            Ok(Value::Number(ms as f64))
        }
        "timestamp" => {
            arity("timestamp", args, 0)?;
            let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
            Ok(Value::Number(secs as f64))
        }
        "format" => format(args),
        "diff" => {
            arity("diff", args, 2)?;
            Ok(Value::Number(to_number(&args[1]) - to_number(&args[0])))
        }
        "sleep" => {
            arity("sleep", args, 1)?;
            let ms = to_number(&args[0]).max(0.0) as u64;
            std::thread::sleep(std::time::Duration::from_millis(ms));
            Ok(Value::Number(0.0))
        }
        "date_parts" => date_parts(args),
        "add" => add_subtract(args, 1.0),
        "subtract" => add_subtract(args, -1.0),
        "is_leap_year" => {
            arity("is_leap_year", args, 1)?;
            let year = to_number(&args[0]) as i64;
            Ok(Value::Number(if is_leap_year(year) { 1.0 } else { 0.0 }))
        }
        "days_in_month" => {
            arity("days_in_month", args, 2)?;
            let year = to_number(&args[0]) as i64;
            let month = to_number(&args[1]) as i64;
            Ok(Value::Number(days_in_month(year, month)? as f64))
        }
        _ => unreachable!(),
    }
}

fn local_at(epoch_secs: i64) -> chrono::DateTime<Local> {
    Local.timestamp_opt(epoch_secs, 0).single().unwrap_or_else(|| Local.timestamp_opt(0, 0).unwrap())
}

fn format(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() || args.len() > 2 {
        return Err(EvalError::invalid_argument(
            "format",
            "expects 1 or 2 arguments: [timestamp], format_string",
        ));
    }
    let (ts, fmt) = if args.len() == 1 {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64;
        (now, to_display_string(&args[0]))
    } else {
        (to_number(&args[0]) as i64, to_display_string(&args[1]))
    };
    let rendered = local_at(ts).format(&fmt).to_string();
    Ok(Value::String(rendered))
}

fn date_parts(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() > 1 {
        return Err(EvalError::invalid_argument("date_parts", "expects 0 or 1 arguments"));
    }
    let ts = if args.is_empty() {
        SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64
    } else {
        to_number(&args[0]) as i64
    };
    let dt = local_at(ts);
    let mut obj = RxObject::new();
    obj.insert("year".into(), Value::Number(dt.year() as f64));
    obj.insert("month".into(), Value::Number(dt.month() as f64));
    obj.insert("day".into(), Value::Number(dt.day() as f64));
    obj.insert("hour".into(), Value::Number(dt.hour() as f64));
    obj.insert("minute".into(), Value::Number(dt.minute() as f64));
    obj.insert("second".into(), Value::Number(dt.second() as f64));
    obj.insert("weekday".into(), Value::Number(dt.weekday().num_days_from_sunday() as f64));
    obj.insert("yearday".into(), Value::Number(dt.ordinal() as f64));
    Ok(Value::object(obj))
}

fn add_subtract(args: &[Value], sign: f64) -> Result<Value, EvalError> {
    let function = if sign > 0.0 { "add" } else { "subtract" };
    arity(function, args, 3)?;
    let ts = to_number(&args[0]) as i64;
    let amount = (to_number(&args[1]) * sign) as i64;
    let unit = to_display_string(&args[2]);

    let dt = local_at(ts);
    let mut year = dt.year();
    let mut month = dt.month() as i64;

    let new_dt = match unit.as_str() {
        "year" | "years" => Local.with_ymd_and_hms(year + amount as i32, dt.month(), dt.day(), dt.hour(), dt.minute(), dt.second()),
        "month" | "months" => {
            month += amount;
            while month > 12 {
                month -= 12;
                year += 1;
            }
            while month < 1 {
                month += 12;
                year -= 1;
            }
            Local.with_ymd_and_hms(year, month as u32, dt.day(), dt.hour(), dt.minute(), dt.second())
        }
        "day" | "days" => return Ok(Value::Number((ts + amount * 86_400) as f64)),
        "hour" | "hours" => return Ok(Value::Number((ts + amount * 3_600) as f64)),
        "minute" | "minutes" => return Ok(Value::Number((ts + amount * 60) as f64)),
        "second" | "seconds" => return Ok(Value::Number((ts + amount) as f64)),
        other => {
            return Err(EvalError::invalid_argument(function, format!("unknown time unit: {other}")))
        }
    };

    match new_dt.single() {
        Some(dt) => Ok(Value::Number(dt.timestamp() as f64)),
        None => Err(EvalError::invalid_argument(function, "resulting date is invalid")),
    }
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> Result<u32, EvalError> {
    if !(1..=12).contains(&month) {
        return Err(EvalError::invalid_argument("days_in_month", "month must be between 1 and 12"));
    }
    const DAYS: [u32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut days = DAYS[month as usize];
    if month == 2 && is_leap_year(year) {
        days = 29;
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
        assert_eq!(days_in_month(2023, 4).unwrap(), 30);
    }

    #[test]
    fn test_days_in_month_out_of_range() {
        assert!(days_in_month(2023, 13).is_err());
    }

    #[test]
    fn test_diff() {
        let result = call("diff", &[Value::Number(10.0), Value::Number(25.0)]).unwrap();
        assert_eq!(result, Value::Number(15.0));
    }

    #[test]
    fn test_add_days_is_simple_offset() {
        let result = call(
            "add",
            &[Value::Number(0.0), Value::Number(2.0), Value::String("days".into())],
        )
        .unwrap();
        assert_eq!(result, Value::Number(172_800.0));
    }
}
