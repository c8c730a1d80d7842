// ABOUTME: End-to-end scripted scenarios run through the public run_source entry point

use rx_lang::eval::Interpreter;
use rx_lang::run_source;

fn run(src: &str, interp: &mut Interpreter) {
    run_source(interp, src).expect("source should evaluate without error");
}

#[test]
fn test_hello_world() {
    let mut interp = Interpreter::new();
    run("^sc\nnew x = \"hello\"\nnew result = x\n", &mut interp);
    assert_eq!(
        interp.environment_value("result"),
        Some(rx_lang::value::Value::String("hello".into()))
    );
}

#[test]
fn test_interpolation() {
    let mut interp = Interpreter::new();
    run(
        "new n = 42\nnew result = \"n = \" << n >> \"!\"",
        &mut interp,
    );
    assert_eq!(
        interp.environment_value("result"),
        Some(rx_lang::value::Value::String("n = 42!".into()))
    );
}

#[test]
fn test_arithmetic_precedence() {
    let mut interp = Interpreter::new();
    run("new result = 2 + 3 * 4", &mut interp);
    assert_eq!(interp.environment_value("result"), Some(rx_lang::value::Value::Number(14.0)));
}

#[test]
fn test_while_loop_and_function() {
    let mut interp = Interpreter::new();
    run(
        r#"
        ef add(a, b) { ret a + b }
        new i = 0
        new s = 0
        while (i < 5) { s = add(s, i); i = i + 1 }
        new result = s
        "#,
        &mut interp,
    );
    assert_eq!(interp.environment_value("result"), Some(rx_lang::value::Value::Number(10.0)));
}

#[test]
fn test_method_call_with_this_by_name() {
    let mut interp = Interpreter::new();
    run(
        r#"
        new obj = { x: 10, bump: ef() { ret x + 1 } }
        new result = obj.bump()
        "#,
        &mut interp,
    );
    assert_eq!(interp.environment_value("result"), Some(rx_lang::value::Value::Number(11.0)));
}

#[test]
fn test_typeof_and_coercion() {
    let mut interp = Interpreter::new();
    run(
        r#"
        new a = typeof(1)
        new b = typeof(1.5)
        new c = typeof("a")
        new d = "n=" + 2
        "#,
        &mut interp,
    );
    assert_eq!(
        interp.environment_value("a"),
        Some(rx_lang::value::Value::String("int".into()))
    );
    assert_eq!(
        interp.environment_value("b"),
        Some(rx_lang::value::Value::String("float".into()))
    );
    assert_eq!(
        interp.environment_value("c"),
        Some(rx_lang::value::Value::String("string".into()))
    );
    assert_eq!(interp.environment_value("d"), Some(rx_lang::value::Value::String("n=2".into())));
}

#[test]
fn test_import_gating_quantified_invariant() {
    let mut interp = Interpreter::new();
    let err = run_source(&mut interp, "new a = sqrt(4)").unwrap_err();
    assert!(matches!(err, rx_lang::error::RxError::Eval(rx_lang::error::EvalError::UndefinedFunction(_))));

    run_source(&mut interp, "^math").unwrap();
    run_source(&mut interp, "new a = sqrt(4)").unwrap();
    assert_eq!(interp.environment_value("a"), Some(rx_lang::value::Value::Number(2.0)));
}

#[test]
fn test_sqrt_round_trip_invariant() {
    let mut interp = Interpreter::with_libraries(&["math"]);
    run_source(&mut interp, "new x = sqrt(2) * sqrt(2)").unwrap();
    let rx_lang::value::Value::Number(n) = interp.environment_value("x").unwrap() else {
        panic!("expected number");
    };
    assert!((n - 2.0).abs() < 1e-9);
}

#[test]
fn test_equality_quantified_invariant() {
    let mut interp = Interpreter::new();
    run_source(&mut interp, r#"new a = (5 == 5) new b = ("hi" == "hi")"#).unwrap();
    assert_eq!(interp.environment_value("a"), Some(rx_lang::value::Value::Number(1.0)));
    assert_eq!(interp.environment_value("b"), Some(rx_lang::value::Value::Number(1.0)));
}

#[test]
fn test_array_bounds_quantified_invariant() {
    let mut interp = Interpreter::new();
    run_source(&mut interp, "new a = [10, 20, 30]").unwrap();
    run_source(&mut interp, "new ok = a[2]").unwrap();
    assert_eq!(interp.environment_value("ok"), Some(rx_lang::value::Value::Number(30.0)));

    let err = run_source(&mut interp, "new bad = a[3]").unwrap_err();
    assert!(matches!(
        err,
        rx_lang::error::RxError::Eval(rx_lang::error::EvalError::IndexOutOfBounds { .. })
    ));
}
